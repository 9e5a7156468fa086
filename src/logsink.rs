use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Process-wide buffer of formatted log lines for one flow execution.
///
/// A fmt layer writes into it through `MakeWriter`; the orchestrator snapshots
/// it at every transition. Snapshots are non-destructive: each one returns
/// everything written so far.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines written so far.
    pub fn lines(&self) -> Vec<String> {
        let buf = match self.buf.lock() {
            Ok(buf) => buf,
            Err(poisoned) => poisoned.into_inner(),
        };
        String::from_utf8_lossy(&buf)
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    /// Snapshot for a log donation. Never empty: an empty sink yields the
    /// `["no logs"]` placeholder.
    pub fn donation_payload(&self) -> Vec<String> {
        let lines = self.lines();
        if lines.is_empty() {
            vec!["no logs".to_string()]
        } else {
            lines
        }
    }
}

pub struct LogSinkWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for LogSinkWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let mut buf = match self.buf.lock() {
            Ok(buf) => buf,
            Err(poisoned) => poisoned.into_inner(),
        };
        buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogSinkWriter {
            buf: Arc::clone(&self.buf),
        }
    }
}
