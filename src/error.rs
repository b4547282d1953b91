use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Layout failed to render event: {0}")]
    Render(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Slack POST request failed: {status}, {body}")]
    Rejected { status: u16, body: String },
}

impl DeliveryError {
    /// Slack answered, but not with 200.
    pub fn is_rejected(&self) -> bool {
        matches!(self, DeliveryError::Rejected { .. })
    }
}
