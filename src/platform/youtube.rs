use super::package::{csv_rows, html_list_items, read_json, DdpPackage};
use super::Platform;
use crate::catalog::TableTitleCatalog;
use crate::model::{DataFrame, DdpCategory, DdpFiletype, Language, NamedTables, ValidationResult};
use anyhow::Result;
use tracing::debug;

struct FileNames {
    subscriptions: &'static str,
    watch_history_json: &'static str,
    watch_history_html: &'static str,
    comments: &'static str,
}

const EN_FILES: FileNames = FileNames {
    subscriptions: "subscriptions.csv",
    watch_history_json: "watch-history.json",
    watch_history_html: "watch-history.html",
    comments: "my-comments.html",
};

const NL_FILES: FileNames = FileNames {
    subscriptions: "abonnementen.csv",
    watch_history_json: "kijkgeschiedenis.json",
    watch_history_html: "kijkgeschiedenis.html",
    comments: "mijn-reacties.html",
};

pub struct YouTube;

impl Platform for YouTube {
    fn name(&self) -> &str {
        "YouTube"
    }

    fn extract(&self, raw: &[u8]) -> Result<(ValidationResult, NamedTables)> {
        let mut tables = NamedTables::new();
        let package = match DdpPackage::parse(raw) {
            Ok(p) => p,
            Err(err) => {
                debug!("youtube package rejected: {err:#}");
                return Ok((ValidationResult::unrecognized(), tables));
            }
        };

        let validation = validate(&package);
        let Some(category) = validation.ddp_category.as_ref() else {
            return Ok((validation, tables));
        };

        let names = match category.language {
            Language::En => &EN_FILES,
            Language::Nl => &NL_FILES,
        };

        if let Some(content) = package.file(names.subscriptions) {
            tables.insert(
                "subscriptions",
                TableTitleCatalog::title("youtube_subscriptions"),
                subscriptions_to_df(content),
            );
        }

        // Takeout emits watch history as JSON or HTML depending on the
        // export settings; the detected filetype picks the parser.
        let watch_history = match category.ddp_filetype {
            DdpFiletype::Html => package
                .file(names.watch_history_html)
                .map(watch_history_html_to_df),
            _ => package
                .file(names.watch_history_json)
                .map(watch_history_json_to_df),
        };
        if let Some(df) = watch_history {
            tables.insert(
                "watch_history",
                TableTitleCatalog::title("youtube_watch_history"),
                df,
            );
        }

        if let Some(content) = package.file(names.comments) {
            tables.insert(
                "comments",
                TableTitleCatalog::title("youtube_comments"),
                DataFrame::single_column("Comments", html_list_items(content)),
            );
        }

        Ok((validation, tables))
    }
}

fn validate(package: &DdpPackage) -> ValidationResult {
    for (language, names) in [(Language::En, &EN_FILES), (Language::Nl, &NL_FILES)] {
        let has_json_history = package.contains(names.watch_history_json);
        let has_html_history = package.contains(names.watch_history_html);
        let recognized = has_json_history
            || has_html_history
            || package.contains(names.subscriptions)
            || package.contains(names.comments);

        if recognized {
            let ddp_filetype = if has_html_history && !has_json_history {
                DdpFiletype::Html
            } else {
                DdpFiletype::Json
            };
            return ValidationResult {
                status_code: 0,
                ddp_category: Some(DdpCategory {
                    language,
                    ddp_filetype,
                }),
            };
        }
    }
    ValidationResult::unrecognized()
}

/// First CSV row is the header; the rest are records.
fn subscriptions_to_df(content: &str) -> DataFrame {
    let mut rows = csv_rows(content);
    if rows.is_empty() {
        return DataFrame::default();
    }
    let columns = rows.remove(0);
    DataFrame::new(columns, rows)
}

fn watch_history_json_to_df(content: &str) -> DataFrame {
    let Some(value) = read_json("watch-history.json", content) else {
        return DataFrame::default();
    };

    let rows = value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|i| {
                    let title = i.get("title").and_then(|t| t.as_str())?;
                    let time = i.get("time").and_then(|t| t.as_str()).unwrap_or("");
                    Some(vec![title.to_string(), time.to_string()])
                })
                .collect()
        })
        .unwrap_or_default();

    DataFrame::new(vec!["Title".into(), "Time".into()], rows)
}

fn watch_history_html_to_df(content: &str) -> DataFrame {
    DataFrame::single_column("Title", html_list_items(content))
}
