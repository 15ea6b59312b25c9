//! Worker configuration.

use std::time::Duration;

use sclip_select::SelectionParams;

/// Worker configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Work directory for temporary artifacts
    pub work_dir: String,
    /// Directory finished clips are copied to
    pub finished_dir: String,
    /// How many of the top-scored chunks to render per job
    pub top_clips: usize,
    /// Wall-clock timeout for a single FFmpeg invocation
    pub encode_timeout: Duration,
    /// Transcription retry attempts (not counting the first)
    pub transcribe_retries: u32,
    /// External transcriber executable (audio path, transcript path)
    pub transcriber_cmd: String,
    /// External emotion classifier executable (transcript path, emotion path)
    pub classifier_cmd: String,
    /// Haar cascade XML for the built-in face detector
    pub face_cascade: String,
    /// Keep intermediate artifacts after a job instead of deleting them
    pub keep_intermediates: bool,
    /// Highlight selection parameters
    pub selection: SelectionParams,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            work_dir: "/tmp/sclip".to_string(),
            finished_dir: "finished_videos".to_string(),
            top_clips: 1,
            encode_timeout: Duration::from_secs(900),
            transcribe_retries: 2,
            transcriber_cmd: "sclip-transcribe".to_string(),
            classifier_cmd: "sclip-emotions".to_string(),
            face_cascade: "haarcascade_frontalface_default.xml".to_string(),
            keep_intermediates: false,
            selection: SelectionParams::default(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let selection = SelectionParams {
            target_duration: env_parse("SCLIP_TARGET_DURATION", 59.0),
            min_duration: env_parse("SCLIP_MIN_DURATION", 25.0),
            max_duration: env_parse("SCLIP_MAX_DURATION", 59.0),
            ..SelectionParams::default()
        };

        Self {
            work_dir: env_string("SCLIP_WORK_DIR", &defaults.work_dir),
            finished_dir: env_string("SCLIP_FINISHED_DIR", &defaults.finished_dir),
            top_clips: env_parse("SCLIP_TOP_CLIPS", defaults.top_clips),
            encode_timeout: Duration::from_secs(env_parse(
                "SCLIP_ENCODE_TIMEOUT",
                defaults.encode_timeout.as_secs(),
            )),
            transcribe_retries: env_parse("SCLIP_TRANSCRIBE_RETRIES", defaults.transcribe_retries),
            transcriber_cmd: env_string("SCLIP_TRANSCRIBER_CMD", &defaults.transcriber_cmd),
            classifier_cmd: env_string("SCLIP_CLASSIFIER_CMD", &defaults.classifier_cmd),
            face_cascade: env_string("SCLIP_FACE_CASCADE", &defaults.face_cascade),
            keep_intermediates: env_parse("SCLIP_KEEP_INTERMEDIATES", false),
            selection,
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
