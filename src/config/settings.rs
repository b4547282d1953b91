use super::env::{load_env_string_opt, load_env_var};
use super::{AppenderConfig, ConfigError, DEFAULT_TIMEOUT, SLACK_API_URL};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Externally supplied appender options, as found in a TOML file or the
/// environment.
///
/// ```toml
/// webhookUri = "https://hooks.slack.com/services/T000/B000/XXXX"
/// channel = "#alerts"
/// iconEmoji = ":rotating_light"
/// colorCoding = true
/// timeout = 5000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AppenderSettings {
    pub webhook_uri: Option<String>,
    pub token: Option<String>,
    pub channel: Option<String>,
    pub username: Option<String>,
    pub icon_emoji: Option<String>,
    pub icon_url: Option<String>,
    pub color_coding: bool,
    /// Connect and read timeout in milliseconds, 0 for none
    pub timeout: u64,
    pub api_url: String,
}

impl Default for AppenderSettings {
    fn default() -> Self {
        Self {
            webhook_uri: None,
            token: None,
            channel: None,
            username: None,
            icon_emoji: None,
            icon_url: None,
            color_coding: false,
            timeout: DEFAULT_TIMEOUT.as_millis() as u64,
            api_url: SLACK_API_URL.to_string(),
        }
    }
}

impl AppenderSettings {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        settings.apply_env()?;
        Ok(settings)
    }

    /// Overrides fields with any `SLACK_*` variables that are set.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        load_env_string_opt("SLACK_WEBHOOK_URI", &mut self.webhook_uri);
        load_env_string_opt("SLACK_TOKEN", &mut self.token);
        load_env_string_opt("SLACK_CHANNEL", &mut self.channel);
        load_env_string_opt("SLACK_USERNAME", &mut self.username);
        load_env_string_opt("SLACK_ICON_EMOJI", &mut self.icon_emoji);
        load_env_string_opt("SLACK_ICON_URL", &mut self.icon_url);
        load_env_var("SLACK_COLOR_CODING", &mut self.color_coding)?;
        load_env_var("SLACK_TIMEOUT_MS", &mut self.timeout)?;
        if let Ok(api_url) = std::env::var("SLACK_API_URL") {
            self.api_url = api_url;
        }
        Ok(())
    }

    /// Builds the runtime configuration, running every setter so that the
    /// normalization rules apply to file and environment input alike.
    pub fn into_config(self) -> Result<AppenderConfig, ConfigError> {
        self.validate()?;

        let mut config = AppenderConfig::default();
        if let Some(webhook_uri) = self.webhook_uri {
            config.set_webhook_uri(webhook_uri);
        }
        if let Some(token) = self.token {
            config.set_token(token);
        }
        if let Some(channel) = self.channel {
            config.set_channel(channel);
        }
        if let Some(username) = self.username {
            config.set_username(username);
        }
        if let Some(icon_emoji) = self.icon_emoji {
            config.set_icon_emoji(icon_emoji);
        }
        if let Some(icon_url) = self.icon_url {
            config.set_icon_url(icon_url);
        }
        config.set_color_coding(self.color_coding);
        config.set_timeout(Duration::from_millis(self.timeout));
        config.set_api_url(self.api_url);
        Ok(config)
    }
}
