//! Video-to-shorts processing pipeline.
//!
//! This crate provides:
//! - The per-job pipeline: audio, transcript, emotions, selection,
//!   reframing, rendering, subtitles
//! - External transcriber/classifier contracts
//! - Progress event emission
//! - Retry with exponential backoff
//! - Env-driven configuration

pub mod artifacts;
pub mod classify;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod retry;
pub mod transcribe;

pub use classify::{CommandClassifier, EmotionClassifier};
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use pipeline::VideoPipeline;
pub use progress::{JobEvent, JobId, JobStage, ProgressSender};
pub use retry::{retry_with_backoff, RetryConfig};
pub use transcribe::{CommandTranscriber, Transcriber};
