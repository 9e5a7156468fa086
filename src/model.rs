use serde::{Deserialize, Serialize};

/// Outcome of structural recognition of a data download package (DDP).
///
/// `ddp_category` is `None` exactly when the package was not recognized as
/// belonging to the platform that produced this result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status_code: u32,
    pub ddp_category: Option<DdpCategory>,
}

impl ValidationResult {
    pub fn recognized(language: Language, ddp_filetype: DdpFiletype) -> Self {
        Self {
            status_code: 0,
            ddp_category: Some(DdpCategory {
                language,
                ddp_filetype,
            }),
        }
    }

    pub fn unrecognized() -> Self {
        Self {
            status_code: 1,
            ddp_category: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdpCategory {
    pub language: Language,
    pub ddp_filetype: DdpFiletype,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    En,
    Nl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DdpFiletype {
    Json,
    Csv,
    Html,
}

/// Bilingual UI label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translatable {
    pub en: String,
    pub nl: String,
}

impl Translatable {
    pub fn new(en: impl Into<String>, nl: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            nl: nl.into(),
        }
    }
}

/// A small rectangular dataset: column headers plus string rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataFrame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// One-column frame with one row per value.
    pub fn single_column(column: &str, values: Vec<String>) -> Self {
        Self {
            columns: vec![column.to_string()],
            rows: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRecord {
    pub key: String,
    pub title: Translatable,
    pub data: DataFrame,
}

/// Named extraction result for one platform: unique lowercase keys, insertion
/// order preserved. Empty datasets are suppressed on insert so a present key
/// always maps to a non-empty table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedTables {
    records: Vec<TableRecord>,
}

impl NamedTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, title: Translatable, data: DataFrame) {
        if data.is_empty() {
            return;
        }
        if self.records.iter().any(|r| r.key == key) {
            return;
        }
        self.records.push(TableRecord {
            key: key.to_string(),
            title,
            data,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, key: &str) -> Option<&TableRecord> {
        self.records.iter().find(|r| r.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableRecord> {
        self.records.iter()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.key.as_str()).collect()
    }
}
