/// Error types for the assist service client
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("Request failed: {0}")]
    Http(String),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, AssistError>;
