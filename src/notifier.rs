use crate::config::AppenderConfig;
use crate::error::DeliveryError;
use crate::event::LogEvent;
use crate::message::{FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, OutboundMessage};
use crate::status::{StatusSink, TracingStatusSink};
use crate::transport::{HttpTransport, Transport};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Which path a delivery took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// No credential configured, nothing was sent.
    Skipped,
    Webhook,
    Token,
}

/// Posts log events to Slack.
///
/// Holds no mutable state; one notifier can be shared by every logging thread.
pub struct SlackNotifier<T = HttpTransport> {
    config: AppenderConfig,
    transport: T,
    status: Arc<dyn StatusSink>,
}

impl SlackNotifier<HttpTransport> {
    pub fn new(config: AppenderConfig) -> Result<Self, DeliveryError> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_parts(config, transport, Arc::new(TracingStatusSink)))
    }
}

impl<T: Transport> SlackNotifier<T> {
    pub fn with_parts(config: AppenderConfig, transport: T, status: Arc<dyn StatusSink>) -> Self {
        Self {
            config,
            transport,
            status,
        }
    }

    pub fn with_status(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }

    pub fn config(&self) -> &AppenderConfig {
        &self.config
    }

    /// Sends the event and reports any failure to the status sink. Never
    /// fails the caller.
    pub fn deliver(&self, event: &LogEvent) {
        match self.try_deliver(event) {
            Ok(_) => {}
            Err(e) if e.is_rejected() => self.status.add_error(&e.to_string(), None),
            Err(e) => {
                let message = format!(
                    "Error posting log to Slack.com ({}): {}",
                    self.config.channel().unwrap_or("<no channel>"),
                    event
                );
                self.status.add_error(&message, Some(&e as &(dyn std::error::Error + 'static)));
            }
        }
    }

    /// Same as [`deliver`](Self::deliver), but hands the outcome back instead
    /// of reporting it.
    pub fn try_deliver(&self, event: &LogEvent) -> Result<Delivery, DeliveryError> {
        if let Some(webhook_uri) = self.config.active_webhook() {
            let message = self.render(event)?;
            let body = message.to_webhook_json(&self.config)?;
            self.post(webhook_uri, JSON_CONTENT_TYPE, body)?;
            Ok(Delivery::Webhook)
        } else if let Some(token) = self.config.active_token() {
            let message = self.render(event)?;
            let body = message.to_token_form(token, &self.config)?;
            self.post(self.config.api_url(), FORM_CONTENT_TYPE, body.into_bytes())?;
            Ok(Delivery::Token)
        } else {
            Ok(Delivery::Skipped)
        }
    }

    fn render(&self, event: &LogEvent) -> Result<OutboundMessage, DeliveryError> {
        let rendered = panic::catch_unwind(AssertUnwindSafe(|| self.config.layout().render(event)))
            .map_err(|payload| {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "layout panicked".to_string());
                DeliveryError::Render(reason)
            })?;

        Ok(OutboundMessage::from_rendered(
            &rendered,
            event.level(),
            self.config.color_coding(),
        ))
    }

    fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> Result<(), DeliveryError> {
        let length = body.len();
        let response = self.transport.post(url, content_type, body)?;
        tracing::debug!(status = response.status, bytes = length, content_type, "Slack POST completed");

        if response.is_ok() {
            Ok(())
        } else {
            Err(DeliveryError::Rejected {
                status: response.status,
                body: response.body,
            })
        }
    }
}
