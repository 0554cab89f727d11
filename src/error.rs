use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// How far an import got before its source became unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Fetch,
    ModelExtraction,
    VideoMetadata,
    Captions,
    Audio,
    Transcription,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportStage::Fetch => "fetch",
            ImportStage::ModelExtraction => "model_extraction",
            ImportStage::VideoMetadata => "video_metadata",
            ImportStage::Captions => "captions",
            ImportStage::Audio => "audio",
            ImportStage::Transcription => "transcription",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during recipe import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// Network, access, transcription or model failure. Never retried here.
    #[error("Source unavailable for {url} at {stage}: {message}")]
    SourceUnavailable {
        url: String,
        stage: ImportStage,
        message: String,
    },

    /// The URL could not be parsed or has no host
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl ImportError {
    pub(crate) fn unavailable(url: &str, stage: ImportStage, message: impl fmt::Display) -> Self {
        ImportError::SourceUnavailable {
            url: url.to_string(),
            stage,
            message: message.to_string(),
        }
    }
}

/// Errors surfaced by grocery list generation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroceryError {
    /// The list changed underneath this call; retry the whole generation
    #[error("Grocery list {list_id} was modified concurrently")]
    Conflict { list_id: Uuid },

    /// The persistence layer failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),
}
