use crate::error::DeliveryError;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use std::io::Read;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

/// Status and fully drained body of a POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostResponse {
    pub status: u16,
    pub body: String,
}

impl PostResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[cfg_attr(test, automock)]
pub trait Transport: Send + Sync {
    fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> Result<PostResponse, DeliveryError>;
}

/// Blocking HTTP transport.
///
/// Redirects are not followed. The body is always sent with a fixed
/// `Content-Length`, and the response body is always read to the end: Slack
/// may drop a message whose connection closes before it has answered.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// A zero `timeout` disables both the connect and the request timeout.
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let mut builder = Client::builder()
            .redirect(Policy::none())
            .user_agent(concat!("slack-log-appender/", env!("CARGO_PKG_VERSION")));

        builder = if timeout.is_zero() {
            builder.timeout(None)
        } else {
            builder.connect_timeout(timeout).timeout(timeout)
        };

        let client = builder.build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> Result<PostResponse, DeliveryError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| DeliveryError::InvalidEndpoint(format!("{url}: {e}")))?;

        let mut response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()?;

        let status = response.status().as_u16();

        // The status already arrived; a body cut short must not hide it.
        let mut raw = Vec::new();
        if let Err(e) = response.read_to_end(&mut raw) {
            tracing::debug!(status, error = %e, "Slack response body ended early");
        }
        let body = String::from_utf8_lossy(&raw).into_owned();

        Ok(PostResponse { status, body })
    }
}
