use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Upload error: {0}")]
    UploadError(String),
    #[error("Upload exceeds the {0} byte limit")]
    UploadTooLarge(usize),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Gemini service error: {0}")]
    ServiceError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Server error: {0}")]
    ServerError(String),
}

impl From<std::io::Error> for RelayError {
    fn from(e: std::io::Error) -> Self {
        RelayError::ServerError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
