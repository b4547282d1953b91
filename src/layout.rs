use crate::event::LogEvent;

/// Renders an event into the text posted to Slack.
///
/// The first line of the output becomes the message text; anything after the
/// first newline is sent as an attachment.
pub trait Layout: Send + Sync {
    fn render(&self, event: &LogEvent) -> String;
}

impl<F> Layout for F
where
    F: Fn(&LogEvent) -> String + Send + Sync,
{
    fn render(&self, event: &LogEvent) -> String {
        self(event)
    }
}

/// `-- [LEVEL]logger - message`, continuation lines indented by a tab.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLayout;

impl Layout for DefaultLayout {
    fn render(&self, event: &LogEvent) -> String {
        format!(
            "-- [{}]{} - {}",
            event.level(),
            event.logger_name(),
            event.formatted_message().replace('\n', "\n\t")
        )
    }
}
