use crate::model::{DataFrame, NamedTables, Translatable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentFormSpec {
    pub tables: Vec<ConsentTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentTable {
    pub key: String,
    pub title: Translatable,
    pub data: DataFrame,
}

/// One descriptor per extracted table, keyed `"<platform>_<key>"` so keys stay
/// unique across platforms within one consent form. Order follows the tables'
/// iteration order.
pub fn build_consent_form(platform_name: &str, tables: &NamedTables) -> ConsentFormSpec {
    let tables = tables
        .iter()
        .map(|record| ConsentTable {
            key: format!("{}_{}", platform_name, record.key),
            title: record.title.clone(),
            data: record.data.clone(),
        })
        .collect();
    ConsentFormSpec { tables }
}
