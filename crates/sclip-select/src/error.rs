//! Selection error types.

use thiserror::Error;

/// Result type for selection operations.
pub type SelectionResult<T> = Result<T, SelectionError>;

/// Errors from the highlight selection core.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// No candidate window satisfied the duration bounds. Terminal for the
    /// job: retrying with identical inputs yields the identical outcome.
    #[error("no segment window satisfies the duration bounds")]
    NoSuitableSegment,

    #[error("invalid selection parameters: {0}")]
    InvalidParams(String),
}
