use reblog_discord::SourceError;
use reblog_persist::PersistError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CuratorError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to fetch selected messages: {0}")]
    Upstream(#[from] SourceError),

    #[error("Failed to store reblog entry: {0}")]
    Store(PersistError),
}

impl From<PersistError> for CuratorError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::Validation(msg) => CuratorError::Validation(msg),
            other => CuratorError::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, CuratorError>;
