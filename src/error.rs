//! Error taxonomy shared by every engine adapter.
//!
//! Adapters translate native failures into one of these variants so callers
//! branch on `ErrorKind`, never on the host platform.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OcrError>;

/// Why a recognition call did not produce a result.
#[derive(Debug, Error)]
pub enum OcrError {
    /// Path missing, unreadable, or not a decodable image.
    #[error("invalid image{}: {reason}", path_suffix(.path))]
    InvalidImage {
        path: Option<PathBuf>,
        reason: String,
    },

    /// No usable native engine on this host.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The native engine reported an error. The message is the engine's own.
    #[error("OCR engine failure: {0}")]
    EngineFailure(String),

    /// The call was aborted before the engine completed.
    #[error("OCR request cancelled")]
    Cancelled,
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" '{}'", p.display()))
        .unwrap_or_default()
}

/// Platform-independent classification of an [`OcrError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidImage,
    UnsupportedPlatform,
    EngineFailure,
    Cancelled,
}

impl OcrError {
    pub fn invalid_image(path: Option<PathBuf>, reason: impl Into<String>) -> Self {
        OcrError::InvalidImage {
            path,
            reason: reason.into(),
        }
    }

    pub fn engine(message: impl Into<String>) -> Self {
        OcrError::EngineFailure(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            OcrError::InvalidImage { .. } => ErrorKind::InvalidImage,
            OcrError::UnsupportedPlatform(_) => ErrorKind::UnsupportedPlatform,
            OcrError::EngineFailure(_) => ErrorKind::EngineFailure,
            OcrError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Only engine faults can plausibly succeed on a second attempt.
    /// Retrying is the caller's decision; nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OcrError::EngineFailure(_))
    }
}
