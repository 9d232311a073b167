use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Discord API error ({status}) on {endpoint}: {body}")]
    Upstream {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed payload from {endpoint}: {detail}")]
    Malformed { endpoint: String, detail: String },

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
