//! Turns a rendered event into the two Slack wire formats.

use crate::config::AppenderConfig;
use crate::event::Level;
use serde::Serialize;
use url::form_urlencoded;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

/// What gets posted for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl OutboundMessage {
    /// Splits the layout output on the first newline. The remainder, if not
    /// empty, becomes the attachment.
    pub fn from_rendered(rendered: &str, level: Level, color_coding: bool) -> Self {
        let (text, rest) = rendered.split_once('\n').unwrap_or((rendered, ""));
        let attachment = (!rest.is_empty()).then(|| Attachment {
            text: rest.to_string(),
            color: color_coding.then(|| color_for_level(level)),
        });

        Self {
            text: text.to_string(),
            attachment,
        }
    }

    /// Body for an incoming webhook. Unset options are written as `null`.
    pub fn to_webhook_json(&self, config: &AppenderConfig) -> Result<Vec<u8>, serde_json::Error> {
        let payload = WebhookPayload {
            channel: config.channel(),
            username: config.username(),
            icon_emoji: config.icon_emoji(),
            icon_url: config.icon_url(),
            text: &self.text,
            attachments: self.attachment.as_ref().map(std::slice::from_ref),
        };
        serde_json::to_vec(&payload)
    }

    /// Body for `chat.postMessage`.
    pub fn to_token_form(
        &self,
        token: &str,
        config: &AppenderConfig,
    ) -> Result<String, serde_json::Error> {
        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("token", token);
        form.append_pair("text", &self.text);
        if let Some(attachment) = &self.attachment {
            let attachments = serde_json::to_string(std::slice::from_ref(attachment))?;
            form.append_pair("attachments", &attachments);
        }

        let optional = [
            ("channel", config.channel()),
            ("username", config.username()),
            ("icon_emoji", config.icon_emoji()),
            ("icon_url", config.icon_url()),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                form.append_pair(name, value);
            }
        }

        Ok(form.finish())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    channel: Option<&'a str>,
    username: Option<&'a str>,
    icon_emoji: Option<&'a str>,
    icon_url: Option<&'a str>,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachments: Option<&'a [Attachment]>,
}

pub fn color_for_level(level: Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warn => "warning",
        Level::Info => "good",
        Level::Debug | Level::Trace => "",
    }
}
