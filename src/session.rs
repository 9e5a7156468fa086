use crate::util::{new_session_id, now_rfc3339};
use serde::{Deserialize, Serialize};

/// Per-execution state: the id namespacing log donations plus the record of
/// how each platform turn resolved.
#[derive(Debug, Clone)]
pub struct FlowSession {
    id: String,
    started: String,
    turns: Vec<PlatformTurn>,
}

impl FlowSession {
    pub fn new() -> Self {
        Self::with_id(new_session_id())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            started: now_rfc3339(),
            turns: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Key under which this session's log donations are filed.
    pub fn tracking_key(&self) -> String {
        format!("{}-tracking", self.id)
    }

    pub fn record_turn(&mut self, platform: &str, outcome: TurnOutcome, retries: u32) {
        self.turns.push(PlatformTurn {
            platform: platform.to_string(),
            outcome,
            retries,
        });
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            session_id: self.id.clone(),
            started: self.started.clone(),
            finished: now_rfc3339(),
            turns: self.turns.clone(),
        }
    }
}

impl Default for FlowSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    Donated,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformTurn {
    pub platform: String,
    pub outcome: TurnOutcome,
    pub retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub started: String,
    pub finished: String,
    pub turns: Vec<PlatformTurn>,
}
