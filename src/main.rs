use anyhow::Context as _;
use clap::Parser;
use slack_log_appender::{AppenderSettings, Delivery, Level, LogEvent, SlackNotifier};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Post a single log event to Slack using the appender configuration.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML file with appender settings; SLACK_* variables override it
    #[arg(long, env = "SLACK_APPENDER_CONFIG")]
    config: Option<PathBuf>,

    /// Level of the event
    #[arg(long, default_value = "info")]
    level: Level,

    /// Logger name shown in the message
    #[arg(long, default_value = "slack-log-appender")]
    logger: String,

    /// Message text
    #[arg(required = true)]
    message: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_target(true).compact())
        .init();

    let mut settings = match &cli.config {
        Some(path) => AppenderSettings::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => AppenderSettings::default(),
    };
    settings.apply_env()?;

    let notifier = SlackNotifier::new(settings.into_config()?)?;
    let event = LogEvent::new(cli.level, cli.logger, cli.message.join(" "));

    match notifier.try_deliver(&event)? {
        Delivery::Skipped => {
            tracing::warn!("No webhookUri or token configured, nothing sent");
        }
        delivery => {
            tracing::info!(?delivery, "Event posted to Slack");
        }
    }

    Ok(())
}
