//! SRT subtitle writing and burning.

use std::path::Path;

use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Maximum characters per subtitle line.
const MAX_LINE_CHARS: usize = 40;

/// Maximum lines per subtitle cue.
const MAX_LINES: usize = 3;

/// Minimum on-screen duration for a cue in seconds.
const MIN_CUE_SECS: f64 = 1.0;

/// A subtitle cue with clip-relative timestamps.
#[derive(Debug, Clone)]
pub struct SubtitleEntry {
    /// Start in seconds, relative to the clip
    pub start: f64,
    /// End in seconds, relative to the clip
    pub end: f64,
    /// Cue text
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
fn format_timestamp(seconds: f64) -> String {
    let total_millis = (seconds * 1000.0).round().max(0.0) as u64;
    let hrs = total_millis / 3_600_000;
    let mins = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hrs, mins, secs, millis)
}

/// Render entries to SRT text: wrapped to 40 characters, at most three
/// lines, every cue on screen for at least one second.
pub fn format_srt(entries: &[SubtitleEntry]) -> String {
    let mut out = String::new();

    for (i, entry) in entries.iter().enumerate() {
        let end = if entry.end - entry.start < MIN_CUE_SECS {
            entry.start + MIN_CUE_SECS
        } else {
            entry.end
        };

        let lines: Vec<_> = textwrap::wrap(&entry.text, MAX_LINE_CHARS)
            .into_iter()
            .take(MAX_LINES)
            .collect();

        out.push_str(&format!("{}\n", i + 1));
        out.push_str(&format!(
            "{} --> {}\n",
            format_timestamp(entry.start),
            format_timestamp(end)
        ));
        out.push_str(&lines.join("\n"));
        out.push_str("\n\n");
    }

    out
}

/// Write entries to an SRT file.
pub async fn write_srt(entries: &[SubtitleEntry], path: impl AsRef<Path>) -> MediaResult<()> {
    tokio::fs::write(path.as_ref(), format_srt(entries)).await?;
    Ok(())
}

/// Burn an SRT file onto a video with the house caption style.
pub async fn burn_subtitles(
    video: impl AsRef<Path>,
    srt: impl AsRef<Path>,
    output: impl AsRef<Path>,
    runner: &FfmpegRunner,
) -> MediaResult<()> {
    let video = video.as_ref();
    let srt = srt.as_ref();
    let output = output.as_ref();

    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }
    if !srt.exists() {
        return Err(MediaError::FileNotFound(srt.to_path_buf()));
    }

    // The subtitles filter wants forward slashes even on Windows.
    let srt_arg = srt.to_string_lossy().replace('\\', "/");
    let filter = format!(
        "subtitles={}:force_style='FontName=Impact,Alignment=2,MarginV=65'",
        srt_arg
    );

    let cmd = FfmpegCommand::new(video, output)
        .video_filter(filter)
        .video_codec("libx264")
        .audio_codec("copy");

    runner.run(&cmd).await?;
    info!(output = %output.display(), "subtitles burned");
    Ok(())
}
