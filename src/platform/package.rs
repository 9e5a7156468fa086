use anyhow::{Context, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Unpacked data download package: export filenames mapped to file contents.
///
/// Archive unpacking happens outside the flow core; uploads arrive here as a
/// JSON object keyed by filename. Non-string values are kept as their JSON
/// text so exports that inline structured content still resolve.
pub struct DdpPackage {
    files: BTreeMap<String, String>,
}

impl DdpPackage {
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_slice(raw).with_context(|| "parsing package envelope")?;
        let map = value
            .as_object()
            .context("package envelope is not a JSON object")?;

        let mut files = BTreeMap::new();
        for (name, content) in map {
            let content = match content {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            files.insert(name.clone(), content);
        }
        Ok(Self { files })
    }

    /// Look up a file by exact name or path suffix; exports nest their files
    /// under per-platform folders.
    pub fn file(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(k, _)| k.as_str() == name || k.ends_with(&format!("/{name}")))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.file(name).is_some()
    }
}

/// Parse file content as JSON, logging and discarding failures. A file that
/// does not parse simply contributes no table.
pub fn read_json(name: &str, content: &str) -> Option<serde_json::Value> {
    match serde_json::from_str(content) {
        Ok(v) => Some(v),
        Err(err) => {
            debug!("discarding {name}: not valid JSON: {err}");
            None
        }
    }
}

/// Twitter export `.js` files are JSON behind a `window.YTD.* = ` assignment.
/// Strip the prefix and trailing semicolon, then parse.
pub fn read_js_value(name: &str, content: &str) -> Option<serde_json::Value> {
    let start = content.find(['[', '{'])?;
    let body = content[start..].trim().trim_end_matches(';');
    read_json(name, body)
}

/// Minimal CSV reader for well-formed export files: header row plus records,
/// double-quoted fields with embedded commas supported.
pub fn csv_rows(content: &str) -> Vec<Vec<String>> {
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(csv_fields)
        .collect()
}

fn csv_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Text content of every `<li>` element, tags stripped.
pub fn html_list_items(content: &str) -> Vec<String> {
    let item = regex::Regex::new(r"(?s)<li[^>]*>(.*?)</li>").ok();
    let tag = regex::Regex::new(r"<[^>]+>").ok();
    let (Some(item), Some(tag)) = (item, tag) else {
        return Vec::new();
    };

    item.captures_iter(content)
        .map(|c| tag.replace_all(&c[1], "").trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
