use crate::util::{ensure_dir, now_rfc3339};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Receiver for donated payloads. Keys are either the platform display name
/// (data donations) or `"<session>-tracking"` (log donations). Callers treat
/// donation as fire-and-forget; errors are reported but never acted on.
pub trait DonationSink {
    fn donate(&self, key: &str, payload: &str) -> Result<()>;
}

/// Appends one JSON record per donation to `donations.jsonl` in `out_dir`.
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(out_dir: &Path) -> Result<Self> {
        ensure_dir(out_dir)?;
        Ok(Self {
            path: out_dir.join("donations.jsonl"),
        })
    }
}

impl DonationSink for JsonlSink {
    fn donate(&self, key: &str, payload: &str) -> Result<()> {
        let record = serde_json::json!({
            "key": key,
            "payload": payload,
            "donated_at": now_rfc3339(),
        });
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open donation file: {}", self.path.display()))?;
        writeln!(file, "{}", record).with_context(|| "write donation record")?;
        Ok(())
    }
}

/// Prints each donation record to stdout.
pub struct StdoutSink;

impl DonationSink for StdoutSink {
    fn donate(&self, key: &str, payload: &str) -> Result<()> {
        let record = serde_json::json!({
            "key": key,
            "payload": payload,
            "donated_at": now_rfc3339(),
        });
        println!("{}", record);
        Ok(())
    }
}
