//! Destinations for access lines.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Receives one complete, newline-terminated line per request.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes lines to stdout, one `write_all` per line under the stdout lock.
#[derive(Debug, Default)]
pub struct StdoutSink {
    failed: AtomicBool,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let result = handle
            .write_all(line.as_bytes())
            .and_then(|_| handle.flush());

        // Best effort: report the first failure, drop the rest.
        if let Err(e) = result {
            if !self.failed.swap(true, Ordering::Relaxed) {
                tracing::warn!(error = %e, "Access log write to stdout failed");
            }
        }
    }
}

/// Emits lines as `info` events on the `request_log` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, line: &str) {
        tracing::info!(target: "request_log", "{}", line.trim_end_matches('\n'));
    }
}

/// Keeps lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}
