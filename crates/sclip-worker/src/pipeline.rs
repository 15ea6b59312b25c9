//! End-to-end video processing pipeline.
//!
//! Stages: probe, audio extraction, transcription, emotion
//! classification, highlight selection, face-centered reframing,
//! rendering and subtitle burning. Intermediate artifacts are keyed by
//! the source hash so a repeated run skips completed stages.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use sclip_media::{
    burn_subtitles, extract_audio, probe_video, render_cropped_clip, write_srt, FaceDetector,
    FfmpegRunner, MediaError, ReframeTracker, RenderSettings, SubtitleEntry,
};
use sclip_models::{Chunk, SegmentIndex, TimedSegment};
use sclip_select::ChunkSelector;

use crate::artifacts::{file_sha256, JobArtifacts};
use crate::classify::EmotionClassifier;
use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::progress::{JobStage, ProgressSender};
use crate::retry::{retry_with_backoff, RetryConfig};
use crate::transcribe::Transcriber;

/// Orchestrates one video through every stage and writes the finished
/// clips into the configured output directory.
pub struct VideoPipeline {
    config: WorkerConfig,
    transcriber: Arc<dyn Transcriber>,
    classifier: Arc<dyn EmotionClassifier>,
}

impl VideoPipeline {
    pub fn new(
        config: WorkerConfig,
        transcriber: Arc<dyn Transcriber>,
        classifier: Arc<dyn EmotionClassifier>,
    ) -> Self {
        Self {
            config,
            transcriber,
            classifier,
        }
    }

    /// Process one video into up to `top_clips` portrait clips.
    ///
    /// Chunks without a detectable face are skipped, not fatal; the job
    /// fails only when no clip at all could be produced. The input video
    /// is never modified or deleted.
    pub async fn process_video(
        &self,
        video_path: &Path,
        detector: &dyn FaceDetector,
        progress: &ProgressSender,
        cancel: &watch::Receiver<bool>,
    ) -> WorkerResult<Vec<PathBuf>> {
        progress.emit(JobStage::Preparing, 0);

        tokio::fs::create_dir_all(&self.config.work_dir).await?;
        tokio::fs::create_dir_all(&self.config.finished_dir).await?;

        let hash = file_sha256(video_path).await?;
        let artifacts = JobArtifacts::new(&self.config.work_dir, &hash);
        info!(video = %video_path.display(), hash = %hash, "processing video");

        let media_info = probe_video(video_path).await?;
        info!(
            duration = media_info.duration,
            width = media_info.width,
            height = media_info.height,
            "probed source"
        );

        let runner = FfmpegRunner::new()
            .with_cancel(cancel.clone())
            .with_timeout(self.config.encode_timeout.as_secs());

        progress.emit(JobStage::ExtractingAudio, 5);
        if !artifacts.audio.exists() {
            extract_audio(video_path, &artifacts.audio, &runner).await?;
        }

        progress.emit(JobStage::Transcribing, 15);
        let retry = RetryConfig::new("transcribe").with_max_retries(self.config.transcribe_retries);
        retry_with_backoff(&retry, || {
            self.transcriber
                .transcribe(&artifacts.audio, &artifacts.transcript)
        })
        .await?;

        progress.emit(JobStage::AnalyzingEmotions, 35);
        let retry = RetryConfig::new("classify").with_max_retries(self.config.transcribe_retries);
        let emotions = retry_with_backoff(&retry, || {
            self.classifier
                .classify(&artifacts.transcript, &artifacts.emotions)
        })
        .await?;

        progress.emit(JobStage::SelectingChunks, 45);
        let index = SegmentIndex::new(emotions)?;
        let selector = ChunkSelector::new(self.config.selection.clone())?;
        let chunks = selector.select_with_cancel(&index, cancel)?;
        info!(candidates = chunks.len(), "highlight chunks selected");

        let tracker = ReframeTracker::new(media_info.width, media_info.height);
        let settings = RenderSettings::default();
        let mut produced = Vec::new();

        for (n, chunk) in chunks.iter().take(self.config.top_clips).enumerate() {
            if *cancel.borrow() {
                return Err(WorkerError::Media(MediaError::Cancelled));
            }

            progress.emit_detail(
                JobStage::Reframing,
                50,
                format!("chunk {:.1}s-{:.1}s", chunk.start_time, chunk.end_time),
            );

            let crop = match tracker
                .select_crop_window(detector, chunk.start_time, chunk.end_time)
                .await
            {
                Ok(crop) => crop,
                Err(MediaError::NoFaceDetected) => {
                    warn!(
                        start = chunk.start_time,
                        end = chunk.end_time,
                        "no face found in chunk, skipping"
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            progress.emit(JobStage::Rendering, 60);
            let clip_path = artifacts.clip(n);
            render_cropped_clip(
                video_path,
                &clip_path,
                chunk.start_time,
                chunk.end_time,
                &crop,
                &settings,
                &runner,
            )
            .await?;

            progress.emit(JobStage::Subtitling, 80);
            let entries = subtitle_entries(index.as_slice(), chunk);
            let srt_path = artifacts.srt(n);
            write_srt(&entries, &srt_path).await?;

            let subtitled = artifacts.subtitled_clip(n);
            burn_subtitles(&clip_path, &srt_path, &subtitled, &runner).await?;

            progress.emit(JobStage::Finalizing, 90);
            let final_path = self.finished_path(video_path, n);
            tokio::fs::copy(&subtitled, &final_path).await?;
            info!(clip = %final_path.display(), score = chunk.score, "clip finished");
            produced.push(final_path);
        }

        if !self.config.keep_intermediates {
            artifacts.cleanup(self.config.top_clips).await;
        }

        if produced.is_empty() {
            progress.emit(JobStage::Failed, 100);
            return Err(WorkerError::processing_failed(
                "no clip produced: every selected chunk was skipped",
            ));
        }

        progress.emit_detail(
            JobStage::Completed,
            100,
            format!("{} clip(s)", produced.len()),
        );
        Ok(produced)
    }

    fn finished_path(&self, video_path: &Path, n: usize) -> PathBuf {
        let stem = video_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "video".to_string());
        Path::new(&self.config.finished_dir).join(format!("{}_short_{}.mp4", stem, n))
    }
}

/// Build clip-relative subtitle cues from the segments a chunk covers.
/// Musical note markers the transcriber uses for non-speech are replaced
/// since the burn-in font cannot render them.
fn subtitle_entries(segments: &[TimedSegment], chunk: &Chunk) -> Vec<SubtitleEntry> {
    segments
        .iter()
        .filter(|s| s.start < chunk.end_time && s.end > chunk.start_time)
        .map(|s| {
            SubtitleEntry::new(
                (s.start - chunk.start_time).max(0.0),
                (s.end - chunk.start_time).min(chunk.end_time - chunk.start_time),
                s.text.replace('♪', "*"),
            )
        })
        .collect()
}
