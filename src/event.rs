use clap::ValueEnum;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::TRACE => Level::Trace,
        }
    }
}

/// A single log call, as handed over by the logging framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    level: Level,
    logger_name: String,
    formatted_message: String,
}

impl LogEvent {
    pub fn new(
        level: Level,
        logger_name: impl Into<String>,
        formatted_message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            logger_name: logger_name.into(),
            formatted_message: formatted_message.into(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    pub fn formatted_message(&self) -> &str {
        &self.formatted_message
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.formatted_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_tracing() {
        assert_eq!(Level::from(tracing::Level::ERROR), Level::Error);
        assert_eq!(Level::from(tracing::Level::WARN), Level::Warn);
        assert_eq!(Level::from(tracing::Level::TRACE), Level::Trace);
    }

    #[test]
    fn test_event_display() {
        let event = LogEvent::new(Level::Warn, "app::db", "pool exhausted");
        assert_eq!(event.to_string(), "[WARN] pool exhausted");
        assert_eq!(event.logger_name(), "app::db");
    }
}
