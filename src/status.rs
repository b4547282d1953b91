//! Error channel of the appender.
//!
//! Delivery failures never reach the code that emitted the log call; they are
//! handed to a [`StatusSink`] instead.

use parking_lot::Mutex;
use std::error::Error;
use std::sync::Arc;

/// Target used for the appender's own diagnostics. Events under this target
/// are never forwarded to Slack.
pub const STATUS_TARGET: &str = "slack_log_appender::status";

pub trait StatusSink: Send + Sync {
    fn add_error(&self, message: &str, cause: Option<&(dyn Error + 'static)>);
}

/// Reports failures as `tracing` errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn add_error(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        match cause {
            Some(cause) => tracing::error!(target: STATUS_TARGET, error = %cause, "{message}"),
            None => tracing::error!(target: STATUS_TARGET, "{message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub message: String,
    pub cause: Option<String>,
}

/// In-memory recorder of reported failures.
///
/// Clones share the same buffer, so one handle can be given to the notifier
/// while another is polled.
#[derive(Debug, Clone, Default)]
pub struct StatusBuffer {
    entries: Arc<Mutex<Vec<StatusEntry>>>,
}

impl StatusBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<StatusEntry> {
        self.entries.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn last_message(&self) -> Option<String> {
        self.entries.lock().last().map(|entry| entry.message.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl StatusSink for StatusBuffer {
    fn add_error(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        self.entries.lock().push(StatusEntry {
            message: message.to_string(),
            cause: cause.map(|cause| cause.to_string()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_buffer_shares_entries_between_clones() {
        let buffer = StatusBuffer::new();
        let handle = buffer.clone();

        let cause = std::io::Error::other("connection reset");
        handle.add_error("first", None);
        handle.add_error("second", Some(&cause));

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.last_message().as_deref(), Some("second"));
        assert_eq!(buffer.entries()[1].cause.as_deref(), Some("connection reset"));

        buffer.clear();
        assert!(handle.is_empty());
    }
}
