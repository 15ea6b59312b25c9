//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Emotion classification failed: {0}")]
    ClassificationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Selection error: {0}")]
    Selection(#[from] sclip_select::SelectionError),

    #[error("Malformed persisted record: {0}")]
    MalformedRecord(#[from] sclip_models::RecordError),

    #[error("Segment ordering error: {0}")]
    SegmentIndex(#[from] sclip_models::SegmentIndexError),

    #[error("Media error: {0}")]
    Media(#[from] sclip_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn processing_failed(msg: impl Into<String>) -> Self {
        Self::ProcessingFailed(msg.into())
    }

    pub fn transcription_failed(msg: impl Into<String>) -> Self {
        Self::TranscriptionFailed(msg.into())
    }

    pub fn classification_failed(msg: impl Into<String>) -> Self {
        Self::ClassificationFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether a retry with the same inputs could plausibly succeed.
    ///
    /// Selection and record parsing are deterministic, so their failures
    /// are terminal; external model invocations are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WorkerError::TranscriptionFailed(_) | WorkerError::ClassificationFailed(_)
        )
    }
}
