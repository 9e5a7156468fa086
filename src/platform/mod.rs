pub mod facebook;
pub mod instagram;
pub mod package;
pub mod twitter;
pub mod youtube;

use crate::model::{NamedTables, ValidationResult};
use anyhow::Result;

pub use facebook::Facebook;
pub use instagram::Instagram;
pub use twitter::Twitter;
pub use youtube::YouTube;

/// One per-platform pipeline. `extract` runs validation and extraction in one
/// pass over the raw upload; it is synchronous, deterministic for identical
/// input bytes, and never suspends.
pub trait Platform {
    fn name(&self) -> &str;
    fn extract(&self, raw: &[u8]) -> Result<(ValidationResult, NamedTables)>;
}

pub fn all() -> Vec<Box<dyn Platform>> {
    vec![
        Box::new(Twitter),
        Box::new(Instagram),
        Box::new(Facebook),
        Box::new(YouTube),
    ]
}

pub fn by_name(name: &str) -> Option<Box<dyn Platform>> {
    all().into_iter().find(|p| p.name().eq_ignore_ascii_case(name))
}

/// Pipelines for the configured platform names, in configured order. Unknown
/// names are skipped.
pub fn registry(names: &[String]) -> Vec<Box<dyn Platform>> {
    names.iter().filter_map(|n| by_name(n)).collect()
}
