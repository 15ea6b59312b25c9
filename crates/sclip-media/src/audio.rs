//! Audio extraction for transcription.

use std::path::Path;

use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Extract the audio track of a video to an MP3 file (44.1 kHz stereo),
/// the format the transcriber consumes.
pub async fn extract_audio(
    video_path: impl AsRef<Path>,
    audio_path: impl AsRef<Path>,
    runner: &FfmpegRunner,
) -> MediaResult<()> {
    let video_path = video_path.as_ref();
    let audio_path = audio_path.as_ref();

    if !video_path.exists() {
        return Err(MediaError::FileNotFound(video_path.to_path_buf()));
    }

    let cmd = FfmpegCommand::new(video_path, audio_path)
        .output_arg("-vn")
        .audio_codec("libmp3lame")
        .output_args(["-ar", "44100", "-ac", "2"]);

    runner.run(&cmd).await?;
    info!(audio = %audio_path.display(), "audio extracted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_extract_audio_missing_input() {
        let err = extract_audio("/nonexistent.mp4", "/tmp/out.mp3", &FfmpegRunner::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
