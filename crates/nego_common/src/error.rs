//! Error types for the negotiation result layer.

use thiserror::Error;

/// Process exit code for errors without a dedicated code
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Process exit code when a result payload cannot be normalized
pub const EXIT_MALFORMED_PAYLOAD: i32 = 65;

/// Process exit code when the requested task has no outcome
pub const EXIT_NOT_FOUND: i32 = 66;

/// Process exit code when the backend is unreachable
pub const EXIT_BACKEND_UNAVAILABLE: i32 = 70;

#[derive(Error, Debug)]
pub enum NegoError {
    #[error("Malformed negotiation payload: {0}")]
    MalformedPayload(String),

    #[error("No negotiation outcome for task {0}")]
    NotFound(String),

    #[error("Negotiation backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Backend returned {status}: {detail}")]
    Backend { status: u16, detail: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NegoError {
    /// Exit status a CLI should end with for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            NegoError::MalformedPayload(_) => EXIT_MALFORMED_PAYLOAD,
            NegoError::NotFound(_) => EXIT_NOT_FOUND,
            NegoError::BackendUnavailable(_) => EXIT_BACKEND_UNAVAILABLE,
            NegoError::Backend { .. }
            | NegoError::Config(_)
            | NegoError::Io(_)
            | NegoError::Json(_) => EXIT_GENERAL_ERROR,
        }
    }

    /// `NotFound` is informational ("no details"), not a failure banner.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NegoError::NotFound(_))
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        NegoError::MalformedPayload(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, NegoError>;
