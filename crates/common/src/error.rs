//! Error types shared across LevelCam crates.

use std::path::PathBuf;

use levelcam_frame_model::ModelError;

/// Top-level error type for LevelCam operations.
#[derive(Debug, thiserror::Error)]
pub enum LevelcamError {
    /// A caller broke a documented precondition (empty region, zero
    /// center distance, mismatched profiles). Never recovered by defaulting.
    #[error("Precondition violated: {message}")]
    Precondition { message: String },

    #[error("Frame source error: {message}")]
    Source { message: String },

    #[error("Display sink error: {message}")]
    Sink { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using LevelcamError.
pub type LevelcamResult<T> = Result<T, LevelcamError>;

impl LevelcamError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition {
            message: msg.into(),
        }
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
        }
    }

    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error is a precondition violation.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }
}

impl From<ModelError> for LevelcamError {
    fn from(err: ModelError) -> Self {
        Self::precondition(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_errors_become_preconditions() {
        let err: LevelcamError = ModelError::InvalidSearchRange { start: 3, end: 3 }.into();
        assert!(err.is_precondition());
        assert!(err.to_string().contains("[3, 3)"));
    }
}
