#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::missing_errors_doc,      // Errors are reported through the status sink
    clippy::module_name_repetitions, // e.g. ConfigError in config module
    clippy::must_use_candidate,      // Annotated selectively on critical APIs
    clippy::doc_markdown
)]

//! Forwards log events to Slack, either through an incoming-webhook URL or
//! through `chat.postMessage` with an API token.
//!
//! The appender plugs into `tracing` as a [`SlackLayer`]:
//!
//! ```no_run
//! use slack_log_appender::{AppenderConfig, SlackLayer, SlackNotifier};
//! use tracing_subscriber::{filter::LevelFilter, prelude::*};
//!
//! # fn main() -> Result<(), slack_log_appender::DeliveryError> {
//! let mut config = AppenderConfig::default();
//! config.set_webhook_uri("https://hooks.slack.com/services/T000/B000/XXXX");
//! config.set_channel("#alerts");
//!
//! tracing_subscriber::registry()
//!     .with(SlackLayer::new(SlackNotifier::new(config)?).with_filter(LevelFilter::WARN))
//!     .init();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod layer;
pub mod layout;
pub mod message;
pub mod notifier;
pub mod status;
pub mod transport;

pub use config::{AppenderConfig, AppenderSettings, ConfigError};
pub use error::DeliveryError;
pub use event::{Level, LogEvent};
pub use layer::SlackLayer;
pub use layout::{DefaultLayout, Layout};
pub use notifier::{Delivery, SlackNotifier};
pub use status::{StatusBuffer, StatusEntry, StatusSink, TracingStatusSink};
pub use transport::{HttpTransport, PostResponse, Transport};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
