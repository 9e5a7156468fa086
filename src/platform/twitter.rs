use super::package::{read_js_value, DdpPackage};
use super::Platform;
use crate::catalog::TableTitleCatalog;
use crate::model::{DataFrame, DdpFiletype, Language, NamedTables, ValidationResult};
use anyhow::Result;
use tracing::debug;

const KNOWN_FILES: [&str; 4] = ["manifest.js", "account.js", "personalization.js", "tweets.js"];

pub struct Twitter;

impl Platform for Twitter {
    fn name(&self) -> &str {
        "Twitter"
    }

    fn extract(&self, raw: &[u8]) -> Result<(ValidationResult, NamedTables)> {
        let mut tables = NamedTables::new();
        let package = match DdpPackage::parse(raw) {
            Ok(p) => p,
            Err(err) => {
                debug!("twitter package rejected: {err:#}");
                return Ok((ValidationResult::unrecognized(), tables));
            }
        };

        let validation = validate(&package);
        if validation.ddp_category.is_none() {
            return Ok((validation, tables));
        }

        if let Some(content) = package.file("personalization.js") {
            tables.insert(
                "interests",
                TableTitleCatalog::title("twitter_interests"),
                DataFrame::single_column("Interests", interests_to_list(content)),
            );
        }

        if let Some(content) = package.file("account.js") {
            tables.insert(
                "account_created_at",
                TableTitleCatalog::title("twitter_account_created_at"),
                DataFrame::single_column("Account created at", account_created_at_to_list(content)),
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

fn interests_to_list(content: &str) -> Vec<String> {
    let Some(value) = read_js_value("personalization.js", content) else {
        return Vec::new();
    };

    value
        .pointer("/0/p13nData/interests/interests")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.get("name").and_then(|n| n.as_str()))
                .map(|n| n.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn account_created_at_to_list(content: &str) -> Vec<String> {
    let Some(value) = read_js_value("account.js", content) else {
        return Vec::new();
    };

    value
        .pointer("/0/account/createdAt")
        .and_then(|v| v.as_str())
        .map(|s| vec![s.to_string()])
        .unwrap_or_default()
}
