//! Speech-to-text contract.
//!
//! Transcription is an external capability; the pipeline only depends on
//! this trait plus the persisted transcript format. The command-backed
//! implementation shells out to a configured executable that writes the
//! transcript file (one `[start - end] text` segment per line).

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use sclip_models::{parse_transcript, TimedSegment};

use crate::error::{WorkerError, WorkerResult};

/// External speech-to-text capability producing word-level segments.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe `audio`, persisting the transcript at `transcript`.
    async fn transcribe(&self, audio: &Path, transcript: &Path) -> WorkerResult<Vec<TimedSegment>>;
}

/// Transcriber that invokes an external command as
/// `<cmd> <audio-path> <transcript-path>`.
///
/// An already-present transcript file is reused without running the
/// command; artifacts are hash-keyed so stale reuse cannot happen.
pub struct CommandTranscriber {
    command: String,
}

impl CommandTranscriber {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl Transcriber for CommandTranscriber {
    async fn transcribe(&self, audio: &Path, transcript: &Path) -> WorkerResult<Vec<TimedSegment>> {
        if !transcript.exists() {
            info!(command = %self.command, audio = %audio.display(), "running transcriber");

            let output = tokio::process::Command::new(&self.command)
                .arg(audio)
                .arg(transcript)
                .output()
                .await
                .map_err(|e| {
                    WorkerError::transcription_failed(format!(
                        "failed to run {}: {}",
                        self.command, e
                    ))
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(WorkerError::transcription_failed(format!(
                    "{} exited with {:?}: {}",
                    self.command,
                    output.status.code(),
                    stderr.trim()
                )));
            }
        } else {
            info!(transcript = %transcript.display(), "reusing existing transcript");
        }

        let content = tokio::fs::read_to_string(transcript).await?;
        let segments = parse_transcript(&content)?;
        if segments.is_empty() {
            return Err(WorkerError::transcription_failed(
                "transcriber produced an empty transcript",
            ));
        }
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reuses_existing_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = dir.path().join("t.txt");
        tokio::fs::write(&transcript, "[0.000 - 1.000] hello\n[1.000 - 2.000] world.\n")
            .await
            .unwrap();

        // Command would fail if executed; the cache hit avoids it.
        let transcriber = CommandTranscriber::new("/nonexistent/transcriber");
        let segments = transcriber
            .transcribe(Path::new("/nonexistent/audio.mp3"), &transcript)
            .await
            .unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].text, "world.");
    }

    #[tokio::test]
    async fn test_malformed_transcript_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = dir.path().join("t.txt");
        tokio::fs::write(&transcript, "garbage line\n").await.unwrap();

        let transcriber = CommandTranscriber::new("/nonexistent/transcriber");
        let err = transcriber
            .transcribe(Path::new("/nonexistent/audio.mp3"), &transcript)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::MalformedRecord(_)));
    }

    #[tokio::test]
    async fn test_missing_command_fails() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = dir.path().join("t.txt");

        let transcriber = CommandTranscriber::new("/nonexistent/transcriber");
        let err = transcriber
            .transcribe(Path::new("/nonexistent/audio.mp3"), &transcript)
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
