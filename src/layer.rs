//! `tracing` integration.

use crate::event::{Level, LogEvent};
use crate::notifier::SlackNotifier;
use crate::transport::{HttpTransport, Transport};
use std::cell::Cell;
use std::fmt::{self, Write as _};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Targets that are never forwarded: our own diagnostics and the HTTP stack
/// the notifier runs on.
const DEFAULT_IGNORED_TARGETS: &[&str] = &[
    "slack_log_appender",
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
    "tokio",
    "mio",
    "want",
];

thread_local! {
    static DELIVERING: Cell<bool> = const { Cell::new(false) };
}

/// Forwards every event it sees to Slack.
///
/// Combine with a per-layer filter to choose which levels are posted:
///
/// ```ignore
/// registry().with(SlackLayer::new(notifier).with_filter(LevelFilter::ERROR))
/// ```
pub struct SlackLayer<T = HttpTransport> {
    notifier: Arc<SlackNotifier<T>>,
    ignored_targets: Vec<String>,
}

impl<T: Transport> SlackLayer<T> {
    pub fn new(notifier: SlackNotifier<T>) -> Self {
        Self::from_shared(Arc::new(notifier))
    }

    pub fn from_shared(notifier: Arc<SlackNotifier<T>>) -> Self {
        Self {
            notifier,
            ignored_targets: DEFAULT_IGNORED_TARGETS
                .iter()
                .map(|target| target.to_string())
                .collect(),
        }
    }

    /// Stops events whose target starts with `prefix` from being posted.
    pub fn ignore_target(mut self, prefix: impl Into<String>) -> Self {
        self.ignored_targets.push(prefix.into());
        self
    }

    pub fn notifier(&self) -> &SlackNotifier<T> {
        &self.notifier
    }

    fn is_ignored(&self, target: &str) -> bool {
        self.ignored_targets.iter().any(|prefix| {
            target == prefix
                || target
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with("::"))
        })
    }
}

impl<S, T> Layer<S> for SlackLayer<T>
where
    S: Subscriber,
    T: Transport + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if self.is_ignored(metadata.target()) {
            return;
        }
        // Events raised while this thread is already posting would recurse.
        if DELIVERING.with(Cell::get) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let log_event = LogEvent::new(
            Level::from(*metadata.level()),
            metadata.target(),
            visitor.finish(),
        );

        DELIVERING.with(|flag| flag.set(true));
        self.notifier.deliver(&log_event);
        DELIVERING.with(|flag| flag.set(false));
    }
}

/// Collects the `message` field plus any other fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppenderConfig;
    use crate::status::StatusBuffer;
    use crate::transport::MockTransport;

    fn layer() -> SlackLayer<MockTransport> {
        let notifier = SlackNotifier::with_parts(
            AppenderConfig::default(),
            MockTransport::new(),
            Arc::new(StatusBuffer::new()),
        );
        SlackLayer::new(notifier)
    }

    #[test]
    fn test_default_ignored_targets() {
        let layer = layer();
        assert!(layer.is_ignored("slack_log_appender::status"));
        assert!(layer.is_ignored("hyper"));
        assert!(layer.is_ignored("hyper_util::client::legacy"));
        assert!(layer.is_ignored("reqwest::blocking::wait"));
        assert!(!layer.is_ignored("hyperion"));
        assert!(!layer.is_ignored("my_app::db"));
    }

    #[test]
    fn test_custom_ignored_target() {
        let layer = layer().ignore_target("my_app::noisy");
        assert!(layer.is_ignored("my_app::noisy::inner"));
        assert!(!layer.is_ignored("my_app::db"));
    }
}
