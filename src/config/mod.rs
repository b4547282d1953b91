mod env;
mod settings;
mod validation;

use crate::layout::{DefaultLayout, Layout};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub use settings::AppenderSettings;

/// Endpoint used in token mode.
pub const SLACK_API_URL: &str = "https://slack.com/api/chat.postMessage";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    File(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    Env(String),
}

/// Appender settings, read by every delivery.
///
/// Populated once at startup; the setters normalize their input so that a
/// configured value is always one the notifier can use as-is.
#[derive(Clone)]
pub struct AppenderConfig {
    webhook_uri: Option<String>,
    token: Option<String>,
    channel: Option<String>,
    username: Option<String>,
    icon_emoji: Option<String>,
    icon_url: Option<String>,
    color_coding: bool,
    timeout: Duration,
    api_url: String,
    layout: Arc<dyn Layout>,
}

impl Default for AppenderConfig {
    fn default() -> Self {
        Self {
            webhook_uri: None,
            token: None,
            channel: None,
            username: None,
            icon_emoji: None,
            icon_url: None,
            color_coding: false,
            timeout: DEFAULT_TIMEOUT,
            api_url: SLACK_API_URL.to_string(),
            layout: Arc::new(DefaultLayout),
        }
    }
}

impl AppenderConfig {
    pub fn webhook_uri(&self) -> Option<&str> {
        self.webhook_uri.as_deref()
    }

    /// Stores the webhook only if it parses as an absolute URI. Anything else,
    /// such as an unexpanded `${SLACK_WEBHOOK}` placeholder, leaves webhook
    /// mode unconfigured.
    pub fn set_webhook_uri(&mut self, webhook_uri: impl Into<String>) {
        let webhook_uri = webhook_uri.into();
        self.webhook_uri = match Url::parse(&webhook_uri) {
            Ok(_) => Some(webhook_uri),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring webhook URI without a scheme");
                None
            }
        };
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn set_channel(&mut self, channel: impl Into<String>) {
        self.channel = Some(channel.into());
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    pub fn icon_emoji(&self) -> Option<&str> {
        self.icon_emoji.as_deref()
    }

    /// `:smile` is completed to `:smile:`.
    pub fn set_icon_emoji(&mut self, icon_emoji: impl Into<String>) {
        let mut icon_emoji = icon_emoji.into();
        if icon_emoji.starts_with(':') && !icon_emoji.ends_with(':') {
            icon_emoji.push(':');
        }
        self.icon_emoji = Some(icon_emoji);
    }

    pub fn icon_url(&self) -> Option<&str> {
        self.icon_url.as_deref()
    }

    pub fn set_icon_url(&mut self, icon_url: impl Into<String>) {
        self.icon_url = Some(icon_url.into());
    }

    pub fn color_coding(&self) -> bool {
        self.color_coding
    }

    pub fn set_color_coding(&mut self, color_coding: bool) {
        self.color_coding = color_coding;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn set_api_url(&mut self, api_url: impl Into<String>) {
        self.api_url = api_url.into();
    }

    pub fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    pub fn set_layout(&mut self, layout: impl Layout + 'static) {
        self.layout = Arc::new(layout);
    }

    /// Webhook wins over token when both are present.
    pub(crate) fn active_webhook(&self) -> Option<&str> {
        self.webhook_uri().filter(|uri| !uri.is_empty())
    }

    pub(crate) fn active_token(&self) -> Option<&str> {
        self.token().filter(|token| !token.is_empty())
    }
}

impl fmt::Debug for AppenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppenderConfig")
            .field("webhook_uri", &self.webhook_uri.as_ref().map(|_| "<redacted>"))
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("channel", &self.channel)
            .field("username", &self.username)
            .field("icon_emoji", &self.icon_emoji)
            .field("icon_url", &self.icon_url)
            .field("color_coding", &self.color_coding)
            .field("timeout", &self.timeout)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Level, LogEvent};

    #[test]
    fn test_icon_emoji_normalization() {
        let mut config = AppenderConfig::default();

        config.set_icon_emoji(":smile");
        assert_eq!(config.icon_emoji(), Some(":smile:"));

        config.set_icon_emoji(":smile:");
        assert_eq!(config.icon_emoji(), Some(":smile:"));

        config.set_icon_emoji("smile");
        assert_eq!(config.icon_emoji(), Some("smile"));

        config.set_icon_emoji("");
        assert_eq!(config.icon_emoji(), Some(""));
    }

    #[test]
    fn test_single_colon_emoji_is_left_alone() {
        let mut config = AppenderConfig::default();
        config.set_icon_emoji(":");
        assert_eq!(config.icon_emoji(), Some(":"));
    }

    #[test]
    fn test_webhook_uri_requires_scheme() {
        let mut config = AppenderConfig::default();

        config.set_webhook_uri("https://hooks.slack.com/x");
        assert_eq!(config.webhook_uri(), Some("https://hooks.slack.com/x"));

        config.set_webhook_uri("${UNRESOLVED_VAR}");
        assert_eq!(config.webhook_uri(), None);

        config.set_webhook_uri("hooks.slack.com/services/x");
        assert_eq!(config.webhook_uri(), None);

        config.set_webhook_uri("");
        assert_eq!(config.webhook_uri(), None);
    }

    #[test]
    fn test_defaults() {
        let config = AppenderConfig::default();
        assert!(!config.color_coding());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.api_url(), SLACK_API_URL);
        assert!(config.active_webhook().is_none());
        assert!(config.active_token().is_none());

        let event = LogEvent::new(Level::Info, "app", "up");
        assert_eq!(config.layout().render(&event), "-- [INFO]app - up");
    }

    #[test]
    fn test_empty_token_is_inactive() {
        let mut config = AppenderConfig::default();
        config.set_token("");
        assert_eq!(config.token(), Some(""));
        assert!(config.active_token().is_none());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let mut config = AppenderConfig::default();
        config.set_token("xoxb-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("xoxb-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
