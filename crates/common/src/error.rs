//! Error types shared across HandMouse crates.

use std::path::PathBuf;

/// Top-level error type for HandMouse operations.
#[derive(Debug, thiserror::Error)]
pub enum HandmouseError {
    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error("Detection error: {message}")]
    Detection { message: String },

    #[error("Dispatch error: {message}")]
    Dispatch { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Platform error: {message}")]
    Platform { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Recording error: {message}")]
    Recording { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using HandmouseError.
pub type HandmouseResult<T> = Result<T, HandmouseError>;

impl HandmouseError {
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn recording(msg: impl Into<String>) -> Self {
        Self::Recording {
            message: msg.into(),
        }
    }

    /// Whether the error is scoped to a single hand and the loop may continue.
    pub fn is_per_hand(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
