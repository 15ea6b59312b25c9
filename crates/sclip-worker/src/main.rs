//! Video processing worker binary.
//!
//! Takes one or more video paths on the command line and produces
//! portrait highlight clips in the finished directory. Ctrl-C cancels
//! in-flight FFmpeg work.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sclip_worker::{
    CommandClassifier, CommandTranscriber, JobId, ProgressSender, VideoPipeline, WorkerConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("sclip=info".parse().unwrap())
        .add_directive("ffmpeg=warn".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting sclip-worker");

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let videos: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if videos.is_empty() {
        anyhow::bail!("usage: sclip-worker <video> [<video> ...]");
    }

    let (cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal, cancelling");
        cancel_tx.send(true).ok();
    });

    let pipeline = VideoPipeline::new(
        config.clone(),
        Arc::new(CommandTranscriber::new(&config.transcriber_cmd)),
        Arc::new(CommandClassifier::new(&config.classifier_cmd)),
    );

    let mut failures = 0usize;
    for video in videos {
        let job_id = JobId::new();
        let (progress, mut events) = ProgressSender::channel(job_id.clone());

        let log_id = job_id.clone();
        let event_log = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                info!(
                    job_id = %log_id,
                    stage = event.stage.as_str(),
                    percent = event.percent,
                    detail = event.detail.as_deref().unwrap_or(""),
                    "progress"
                );
            }
        });

        let detector = build_detector(&video, &config)?;
        match pipeline
            .process_video(&video, detector.as_ref(), &progress, &cancel_rx)
            .await
        {
            Ok(clips) => {
                info!(job_id = %job_id, video = %video.display(), clips = clips.len(), "job finished");
                for clip in clips {
                    println!("{}", clip.display());
                }
            }
            Err(e) => {
                error!(job_id = %job_id, video = %video.display(), "job failed: {}", e);
                failures += 1;
            }
        }

        drop(progress);
        event_log.await.ok();

        if *cancel_rx.borrow() {
            break;
        }
    }

    if failures > 0 {
        anyhow::bail!("{} job(s) failed", failures);
    }
    Ok(())
}

#[cfg(feature = "opencv")]
fn build_detector(
    video: &std::path::Path,
    config: &WorkerConfig,
) -> anyhow::Result<Box<dyn sclip_media::FaceDetector>> {
    use anyhow::Context;

    let detector = sclip_media::HaarFaceDetector::new(video, &config.face_cascade)
        .with_context(|| format!("loading cascade {}", config.face_cascade))?;
    Ok(Box::new(detector))
}

#[cfg(not(feature = "opencv"))]
fn build_detector(
    _video: &std::path::Path,
    _config: &WorkerConfig,
) -> anyhow::Result<Box<dyn sclip_media::FaceDetector>> {
    anyhow::bail!("built without a face detector; rebuild with --features opencv")
}
