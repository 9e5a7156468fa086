use serde::{Deserialize, Serialize};

/// Running progress total in percent. Each platform contributes exactly two
/// increments (file-select, consent-or-equivalent); retry iterations reuse the
/// value from the last increment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressTracker {
    step_percentage: f64,
    total: f64,
}

impl ProgressTracker {
    pub fn new(platform_count: usize) -> Self {
        let platforms = platform_count.max(1) as f64;
        Self {
            step_percentage: (100.0 / platforms) / 2.0,
            total: 0.0,
        }
    }

    pub fn advance(&mut self) -> f64 {
        self.total += self.step_percentage;
        self.total
    }

    pub fn current(&self) -> f64 {
        self.total
    }

    pub fn step_percentage(&self) -> f64 {
        self.step_percentage
    }
}
