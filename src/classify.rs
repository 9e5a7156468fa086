use crate::model::{NamedTables, ValidationResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    HasData,
    ValidEmpty,
    InvalidPackage,
    AbortRetry,
}

/// Classify one validate+extract attempt. Rules are evaluated in order; any
/// combination outside the contract falls through to `InvalidPackage` so a
/// platform turn is never silently dropped.
pub fn classify(validation: &ValidationResult, tables: &NamedTables) -> Outcome {
    if !tables.is_empty() {
        return Outcome::HasData;
    }

    if validation.status_code == 0 && validation.ddp_category.is_some() {
        return Outcome::ValidEmpty;
    }

    if validation.ddp_category.is_none() {
        return Outcome::InvalidPackage;
    }

    Outcome::InvalidPackage
}
