#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper and face-centered reframing.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with timeout and cancellation
//! - FFprobe video information
//! - Audio extraction, cropped clip rendering, subtitle burning
//! - The reframe tracker: face sampling and 9:16 crop derivation

pub mod audio;
pub mod clip;
pub mod command;
pub mod detect;
pub mod error;
pub mod probe;
pub mod reframe;
pub mod subtitles;

pub use audio::extract_audio;
pub use clip::{remux_faststart, render_cropped_clip, RenderSettings};
pub use command::{FfmpegCommand, FfmpegRunner};
pub use detect::FaceBox;
pub use detect::FaceDetector;
#[cfg(feature = "opencv")]
pub use detect::HaarFaceDetector;
pub use error::{MediaError, MediaResult};
pub use probe::{probe_video, VideoInfo};
pub use reframe::{crop_rect_for_anchor, interpolate_rect, ReframeTracker, TARGET_ASPECT};
pub use subtitles::{burn_subtitles, write_srt, SubtitleEntry};
