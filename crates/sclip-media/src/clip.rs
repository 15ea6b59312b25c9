//! Cropped clip rendering.

use std::path::Path;

use tracing::info;

use sclip_models::CropRect;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Output encoding settings for rendered clips.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Output width after scaling
    pub output_width: u32,
    /// Output height after scaling
    pub output_height: u32,
    /// x264 CRF quality
    pub crf: u8,
    /// x264 preset
    pub preset: String,
    /// AAC audio bitrate
    pub audio_bitrate: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            output_width: 1080,
            output_height: 1920,
            crf: 23,
            preset: "fast".to_string(),
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// Cut `[start, end]` out of the source, apply the crop rectangle, scale
/// to the portrait output size and re-encode. The source audio track is
/// mapped when present.
pub async fn render_cropped_clip(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    start: f64,
    end: f64,
    crop: &CropRect,
    settings: &RenderSettings,
    runner: &FfmpegRunner,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    let filter = format!(
        "crop={}:{}:{}:{},scale={}:{}",
        crop.width, crop.height, crop.x, crop.y, settings.output_width, settings.output_height
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(start)
        .until(end)
        .video_filter(filter)
        .video_codec("libx264")
        .preset(settings.preset.clone())
        .crf(settings.crf)
        .audio_codec("aac")
        .audio_bitrate(settings.audio_bitrate.clone())
        .output_args(["-map", "0:v:0", "-map", "0:a?"]);

    runner.run(&cmd).await?;
    info!(clip = %output.display(), start, end, "cropped clip rendered");

    remux_faststart(output, runner).await
}

/// Re-mux a finished clip in place: strip source metadata and move the
/// moov atom up front so players can start immediately.
pub async fn remux_faststart(path: impl AsRef<Path>, runner: &FfmpegRunner) -> MediaResult<()> {
    let path = path.as_ref();
    let remuxed = path.with_extension("remux.mp4");

    let cmd = FfmpegCommand::new(path, &remuxed)
        .output_arg("-c")
        .output_arg("copy")
        .output_args(["-map_metadata", "-1", "-movflags", "+faststart"]);

    runner.run(&cmd).await?;
    tokio::fs::rename(&remuxed, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_render_missing_input() {
        let err = render_cropped_clip(
            "/nonexistent.mp4",
            "/tmp/out.mp4",
            0.0,
            10.0,
            &CropRect::new(1296, 0, 608, 1080),
            &RenderSettings::default(),
            &FfmpegRunner::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[test]
    fn test_default_settings() {
        let settings = RenderSettings::default();
        assert_eq!(settings.output_width, 1080);
        assert_eq!(settings.output_height, 1920);
        assert_eq!(settings.crf, 23);
    }
}
