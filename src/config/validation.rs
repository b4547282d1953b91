use super::{AppenderSettings, ConfigError};
use url::Url;

impl AppenderSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid API URL '{}': {}", self.api_url, e))
        })?;

        // An unusable webhook only disables webhook mode.

        Ok(())
    }
}
