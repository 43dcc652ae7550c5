// src/errors.rs

use thiserror::Error;

pub type AskmeResult<T> = Result<T, AskmeError>;

#[derive(Debug, Error)]
pub enum AskmeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response format: {0}")]
    MalformedResponse(String),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("logger setup failed: {0}")]
    Logger(#[from] flexi_logger::FlexiLoggerError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AskmeError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        AskmeError::Config(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        AskmeError::MalformedResponse(msg.into())
    }

    pub fn clipboard_error(msg: impl Into<String>) -> Self {
        AskmeError::Clipboard(msg.into())
    }

    /// True for failures of the question-answering call itself, as opposed
    /// to local problems.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AskmeError::Transport(_) | AskmeError::Status { .. } | AskmeError::MalformedResponse(_)
        )
    }
}
