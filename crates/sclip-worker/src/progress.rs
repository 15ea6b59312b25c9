//! Per-job progress events.
//!
//! The pipeline emits [`JobEvent`] values on a channel; the enclosing
//! orchestrator decides what to do with them (log, forward, drop). The
//! core stays free of shared mutable progress state.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipeline phase a job is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    Preparing,
    ExtractingAudio,
    Transcribing,
    AnalyzingEmotions,
    SelectingChunks,
    Reframing,
    Rendering,
    Subtitling,
    Finalizing,
    Completed,
    Failed,
}

impl JobStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::Preparing => "preparing",
            JobStage::ExtractingAudio => "extracting_audio",
            JobStage::Transcribing => "transcribing",
            JobStage::AnalyzingEmotions => "analyzing_emotions",
            JobStage::SelectingChunks => "selecting_chunks",
            JobStage::Reframing => "reframing",
            JobStage::Rendering => "rendering",
            JobStage::Subtitling => "subtitling",
            JobStage::Finalizing => "finalizing",
            JobStage::Completed => "completed",
            JobStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStage::Completed | JobStage::Failed)
    }
}

/// A progress update for one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEvent {
    pub job_id: JobId,
    pub stage: JobStage,
    /// Coarse completion estimate, 0-100
    pub percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Sending half of a job's progress channel. Emission never fails: a
/// dropped receiver just means nobody is listening.
#[derive(Debug, Clone)]
pub struct ProgressSender {
    job_id: JobId,
    tx: mpsc::UnboundedSender<JobEvent>,
}

impl ProgressSender {
    /// Create a sender and its receiving half for a new job.
    pub fn channel(job_id: JobId) -> (Self, mpsc::UnboundedReceiver<JobEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { job_id, tx }, rx)
    }

    /// The job this sender reports for.
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Emit a stage/percent update.
    pub fn emit(&self, stage: JobStage, percent: u8) {
        self.send(JobEvent {
            job_id: self.job_id.clone(),
            stage,
            percent: percent.min(100),
            detail: None,
        });
    }

    /// Emit an update with a human-readable detail.
    pub fn emit_detail(&self, stage: JobStage, percent: u8, detail: impl Into<String>) {
        self.send(JobEvent {
            job_id: self.job_id.clone(),
            stage,
            percent: percent.min(100),
            detail: Some(detail.into()),
        });
    }

    fn send(&self, event: JobEvent) {
        self.tx.send(event).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (progress, mut rx) = ProgressSender::channel(JobId::new());
        progress.emit(JobStage::Preparing, 0);
        progress.emit(JobStage::Transcribing, 40);
        progress.emit_detail(JobStage::Completed, 100, "2 clips");

        assert_eq!(rx.recv().await.unwrap().stage, JobStage::Preparing);
        assert_eq!(rx.recv().await.unwrap().percent, 40);
        let last = rx.recv().await.unwrap();
        assert!(last.stage.is_terminal());
        assert_eq!(last.detail.as_deref(), Some("2 clips"));
    }

    #[test]
    fn test_emit_with_dropped_receiver_is_silent() {
        let (progress, rx) = ProgressSender::channel(JobId::new());
        drop(rx);
        progress.emit(JobStage::Preparing, 0); // must not panic
    }

    #[test]
    fn test_percent_is_capped() {
        let (progress, mut rx) = ProgressSender::channel(JobId::new());
        progress.emit(JobStage::Rendering, 250);
        assert_eq!(rx.try_recv().unwrap().percent, 100);
    }
}
