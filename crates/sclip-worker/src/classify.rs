//! Emotion classification contract.
//!
//! Mirrors the transcription seam: the classifier is an external
//! capability that reads a transcript and persists per-word emotion
//! records (`start - end - label - score - text` per line).

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use sclip_models::{parse_emotion_records, TimedSegment};

use crate::error::{WorkerError, WorkerResult};

/// External emotion classifier producing labeled, scored segments.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classify the segments in `transcript`, persisting the records at
    /// `emotions`.
    async fn classify(&self, transcript: &Path, emotions: &Path)
        -> WorkerResult<Vec<TimedSegment>>;
}

/// Classifier that invokes an external command as
/// `<cmd> <transcript-path> <emotions-path>`.
pub struct CommandClassifier {
    command: String,
}

impl CommandClassifier {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl EmotionClassifier for CommandClassifier {
    async fn classify(
        &self,
        transcript: &Path,
        emotions: &Path,
    ) -> WorkerResult<Vec<TimedSegment>> {
        if !emotions.exists() {
            info!(command = %self.command, transcript = %transcript.display(), "running emotion classifier");

            let output = tokio::process::Command::new(&self.command)
                .arg(transcript)
                .arg(emotions)
                .output()
                .await
                .map_err(|e| {
                    WorkerError::classification_failed(format!(
                        "failed to run {}: {}",
                        self.command, e
                    ))
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(WorkerError::classification_failed(format!(
                    "{} exited with {:?}: {}",
                    self.command,
                    output.status.code(),
                    stderr.trim()
                )));
            }
        } else {
            info!(emotions = %emotions.display(), "reusing existing emotion records");
        }

        let content = tokio::fs::read_to_string(emotions).await?;
        let segments = parse_emotion_records(&content)?;
        if segments.is_empty() {
            return Err(WorkerError::classification_failed(
                "classifier produced no emotion records",
            ));
        }
        Ok(segments)
    }
}
