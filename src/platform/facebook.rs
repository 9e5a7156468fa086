use super::package::{read_json, DdpPackage};
use super::Platform;
use crate::catalog::TableTitleCatalog;
use crate::model::{DataFrame, DdpFiletype, Language, NamedTables, ValidationResult};
use anyhow::Result;
use tracing::debug;

const KNOWN_FILES: [&str; 3] = [
    "ads_interests.json",
    "your_topics.json",
    "profile_information.json",
];

pub struct Facebook;

impl Platform for Facebook {
    fn name(&self) -> &str {
        "Facebook"
    }

    fn extract(&self, raw: &[u8]) -> Result<(ValidationResult, NamedTables)> {
        let mut tables = NamedTables::new();
        let package = match DdpPackage::parse(raw) {
            Ok(p) => p,
            Err(err) => {
                debug!("facebook package rejected: {err:#}");
                return Ok((ValidationResult::unrecognized(), tables));
            }
        };

        let validation = validate(&package);
        if validation.ddp_category.is_none() {
            return Ok((validation, tables));
        }

        if let Some(content) = package.file("ads_interests.json") {
            let interests = string_list(content, "ads_interests.json", "topics_v2");
            tables.insert(
                "interests",
                TableTitleCatalog::title("facebook_interests"),
                DataFrame::single_column("Interests", interests),
            );
        }

        if let Some(content) = package.file("your_topics.json") {
            let topics = string_list(content, "your_topics.json", "inferred_topics_v2");
            tables.insert(
                "your_topics",
                TableTitleCatalog::title("facebook_your_topics"),
                DataFrame::single_column("Your Topics", topics),
            );
        }

        if let Some(content) = package.file("profile_information.json") {
            tables.insert(
                "account_created_at",
                TableTitleCatalog::title("facebook_account_created_at"),
                DataFrame::single_column("Account created at", registration_time(content)),
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

fn string_list(content: &str, name: &str, key: &str) -> Vec<String> {
    let Some(value) = read_json(name, content) else {
        return Vec::new();
    };

    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn registration_time(content: &str) -> Vec<String> {
    let Some(value) = read_json("profile_information.json", content) else {
        return Vec::new();
    };

    value
        .pointer("/profile_v2/registration_timestamp")
        .and_then(|v| v.as_i64())
        .map(|ts| vec![ts.to_string()])
        .unwrap_or_default()
}
