//! Error types for netagent

use thiserror::Error;

/// Result type alias for netagent operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in netagent
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Max iterations ({0}) reached without a final answer")]
    MaxIterations(usize),

    #[error("Agent run timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Please enter a question before submitting.")]
    EmptyInput,

    #[error("Invalid conversation: {0}")]
    InvalidConversation(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error ends a run without an answer (as opposed to
    /// being rejected before the run started).
    pub fn is_run_failure(&self) -> bool {
        !matches!(self, Error::EmptyInput | Error::InvalidConversation(_))
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
