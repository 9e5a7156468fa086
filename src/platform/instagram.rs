use super::package::{read_json, DdpPackage};
use super::Platform;
use crate::catalog::TableTitleCatalog;
use crate::model::{DataFrame, DdpFiletype, Language, NamedTables, ValidationResult};
use anyhow::Result;
use tracing::debug;

const KNOWN_FILES: [&str; 3] = [
    "ads_interests.json",
    "your_topics.json",
    "signup_information.json",
];

pub struct Instagram;

impl Platform for Instagram {
    fn name(&self) -> &str {
        "Instagram"
    }

    fn extract(&self, raw: &[u8]) -> Result<(ValidationResult, NamedTables)> {
        let mut tables = NamedTables::new();
        let package = match DdpPackage::parse(raw) {
            Ok(p) => p,
            Err(err) => {
                debug!("instagram package rejected: {err:#}");
                return Ok((ValidationResult::unrecognized(), tables));
            }
        };

        let validation = validate(&package);
        if validation.ddp_category.is_none() {
            return Ok((validation, tables));
        }

        if let Some(content) = package.file("ads_interests.json") {
            let interests = string_map_values(content, "ads_interests.json", "inferred_data_ig_interest", "Interest");
            tables.insert(
                "interests",
                TableTitleCatalog::title("instagram_interests"),
                DataFrame::single_column("Interests", interests),
            );
        }

        if let Some(content) = package.file("your_topics.json") {
            let topics = string_map_values(content, "your_topics.json", "topics_your_topics", "Name");
            tables.insert(
                "your_topics",
                TableTitleCatalog::title("instagram_your_topics"),
                DataFrame::single_column("Your Topics", topics),
            );
        }

        if let Some(content) = package.file("signup_information.json") {
            let created = signup_times(content);
            tables.insert(
                "account_created_at",
                TableTitleCatalog::title("instagram_account_created_at"),
                DataFrame::single_column("Account created at", created),
            );
        }

        Ok((validation, tables))
    }
}

fn validate(package: &DdpPackage) -> ValidationResult {
    if KNOWN_FILES.iter().any(|f| package.contains(f)) {
        ValidationResult::recognized(Language::En, DdpFiletype::Json)
    } else {
        ValidationResult::unrecognized()
    }
}

/// Meta exports wrap values as `{"<list>": [{"string_map_data": {"<field>":
/// {"value": ...}}}]}`.
fn string_map_values(content: &str, name: &str, list_key: &str, field: &str) -> Vec<String> {
    let Some(value) = read_json(name, content) else {
        return Vec::new();
    };

    value
        .get(list_key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|i| {
                    i.pointer(&format!("/string_map_data/{field}/value"))
                        .and_then(|v| v.as_str())
                        .map(|s| s.to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

fn signup_times(content: &str) -> Vec<String> {
    let Some(value) = read_json("signup_information.json", content) else {
        return Vec::new();
    };

    value
        .get("account_history_registration_info")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|i| {
                    let entry = i.pointer("/string_map_data/Time")?;
                    if let Some(ts) = entry.get("timestamp").and_then(|t| t.as_i64()) {
                        return Some(ts.to_string());
                    }
                    entry
                        .get("value")
                        .and_then(|v| v.as_str())
                        .map(|s| s.to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}
