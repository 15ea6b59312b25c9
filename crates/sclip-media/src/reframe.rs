//! Face-centered crop window selection.
//!
//! Samples the face position at a few instants of a chosen window and
//! derives a clamped crop rectangle in source-frame coordinates. The
//! anchor is the first present sample, not an average, so a face that is
//! lost later in the window does not drag the frame.

use tracing::debug;

use sclip_models::{CropRect, FaceSample};

use crate::detect::{largest_face, FaceDetector};
use crate::error::{MediaError, MediaResult};

/// Portrait 9:16 output aspect ratio.
pub const TARGET_ASPECT: f64 = 9.0 / 16.0;

/// Relative offsets within the window at which faces are sampled.
const SAMPLE_OFFSETS: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

/// Samples face position across a time window and derives crop windows.
#[derive(Debug, Clone)]
pub struct ReframeTracker {
    frame_width: u32,
    frame_height: u32,
    target_aspect: f64,
}

impl ReframeTracker {
    /// Create a tracker for a source frame size with the 9:16 target.
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            target_aspect: TARGET_ASPECT,
        }
    }

    /// Override the target aspect ratio.
    pub fn with_aspect(mut self, target_aspect: f64) -> Self {
        self.target_aspect = target_aspect;
        self
    }

    /// Sample face centers at the relative offsets of `[start, end]`.
    /// Instants where the detector reports no box are absent from the
    /// result; detector failures propagate.
    pub async fn sample_faces(
        &self,
        detector: &dyn FaceDetector,
        start: f64,
        end: f64,
    ) -> MediaResult<Vec<FaceSample>> {
        let duration = end - start;
        let mut samples = Vec::new();

        for offset in SAMPLE_OFFSETS {
            let time = start + duration * offset;
            let boxes = detector.detect_at(time).await?;
            if let Some(face) = largest_face(&boxes) {
                let (cx, cy) = face.center();
                samples.push(FaceSample::new(time, cx, cy));
            }
        }

        debug!(
            present = samples.len(),
            sampled = SAMPLE_OFFSETS.len(),
            "face samples collected"
        );
        Ok(samples)
    }

    /// Compute the crop rectangle for a window, anchored on the first
    /// detected face. Fails with [`MediaError::NoFaceDetected`] when no
    /// sample is present; the caller decides whether to skip the chunk.
    pub async fn select_crop_window(
        &self,
        detector: &dyn FaceDetector,
        start: f64,
        end: f64,
    ) -> MediaResult<CropRect> {
        let samples = self.sample_faces(detector, start, end).await?;
        let anchor = samples.first().ok_or(MediaError::NoFaceDetected)?;

        Ok(crop_rect_for_anchor(
            self.frame_width,
            self.frame_height,
            anchor.cx,
            anchor.cy,
            self.target_aspect,
        ))
    }
}

/// Derive a clamped crop rectangle centered on an anchor point.
///
/// A source at least as wide as the target aspect keeps full height and
/// slides a narrow crop horizontally; a narrower source keeps full width
/// and slides vertically. Offsets clamp so the rectangle stays inside the
/// frame even when the anchor sits near an edge.
pub fn crop_rect_for_anchor(
    frame_width: u32,
    frame_height: u32,
    anchor_x: f64,
    anchor_y: f64,
    target_aspect: f64,
) -> CropRect {
    let fw = frame_width as f64;
    let fh = frame_height as f64;

    if fw / fh >= target_aspect {
        let crop_width = (fh * target_aspect).round();
        let x = (anchor_x - crop_width / 2.0).clamp(0.0, fw - crop_width);
        CropRect::new(x.round() as u32, 0, crop_width as u32, frame_height)
    } else {
        let crop_height = (fw / target_aspect).round();
        let y = (anchor_y - crop_height / 2.0).clamp(0.0, fh - crop_height);
        CropRect::new(0, y.round() as u32, frame_width, crop_height as u32)
    }
}

/// Linearly interpolate between two crop rectangles across `steps`
/// samples, for frame-by-frame panning between two anchors.
pub fn interpolate_rect(a: CropRect, b: CropRect, steps: usize) -> Vec<CropRect> {
    match steps {
        0 => return Vec::new(),
        1 => return vec![a],
        _ => {}
    }

    let lerp = |from: u32, to: u32, t: f64| -> u32 {
        (from as f64 + (to as f64 - from as f64) * t).round() as u32
    };

    (0..steps)
        .map(|i| {
            let t = i as f64 / (steps - 1) as f64;
            CropRect::new(
                lerp(a.x, b.x, t),
                lerp(a.y, b.y, t),
                lerp(a.width, b.width, t),
                lerp(a.height, b.height, t),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::FaceBox;
    use async_trait::async_trait;

    /// Scripted detector: one entry of boxes per sample offset, in order.
    struct ScriptedDetector {
        responses: std::sync::Mutex<std::collections::VecDeque<Vec<FaceBox>>>,
    }

    impl ScriptedDetector {
        fn new(responses: Vec<Vec<FaceBox>>) -> Self {
            Self {
                responses: std::sync::Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl FaceDetector for ScriptedDetector {
        async fn detect_at(&self, _time: f64) -> MediaResult<Vec<FaceBox>> {
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default())
        }
    }

    fn face_at(cx: f64, cy: f64) -> FaceBox {
        FaceBox::new(cx - 50.0, cy - 50.0, 100.0, 100.0)
    }

    #[test]
    fn test_crop_rect_wide_source() {
        // 1920x1080 with the face at (1600, 540)
        let rect = crop_rect_for_anchor(1920, 1080, 1600.0, 540.0, TARGET_ASPECT);
        assert_eq!(rect, CropRect::new(1296, 0, 608, 1080));
    }

    #[test]
    fn test_crop_rect_clamps_at_right_edge() {
        let rect = crop_rect_for_anchor(1920, 1080, 1900.0, 540.0, TARGET_ASPECT);
        assert_eq!(rect.x, 1312); // 1920 - 608
        assert_eq!(rect.y, 0);
    }

    #[test]
    fn test_crop_rect_clamps_at_left_edge() {
        let rect = crop_rect_for_anchor(1920, 1080, 10.0, 540.0, TARGET_ASPECT);
        assert_eq!(rect.x, 0);
    }

    #[test]
    fn test_crop_rect_narrow_source() {
        // Source narrower than 9:16: full width, vertical slide
        let rect = crop_rect_for_anchor(600, 1920, 300.0, 500.0, TARGET_ASPECT);
        assert_eq!(rect.width, 600);
        assert_eq!(rect.height, 1067); // round(600 / (9/16))
        assert_eq!(rect.x, 0);
        assert_eq!(rect.y, 0); // 500 - 533.5 clamps to 0
    }

    #[test]
    fn test_crop_rect_fits_frame() {
        for cx in [0.0, 500.0, 960.0, 1919.0] {
            let rect = crop_rect_for_anchor(1920, 1080, cx, 540.0, TARGET_ASPECT);
            assert!(rect.fits_within(1920, 1080), "anchor {} -> {:?}", cx, rect);
        }
    }

    #[tokio::test]
    async fn test_anchor_is_first_present_sample() {
        // Nothing at 20%, a face at 40%; a different face later must not
        // drag the frame.
        let detector = ScriptedDetector::new(vec![
            vec![],
            vec![face_at(400.0, 500.0)],
            vec![face_at(1800.0, 500.0)],
            vec![face_at(1800.0, 500.0)],
        ]);

        let tracker = ReframeTracker::new(1920, 1080);
        let rect = tracker
            .select_crop_window(&detector, 0.0, 40.0)
            .await
            .unwrap();
        assert_eq!(rect.x, 96); // 400 - 608/2
    }

    #[tokio::test]
    async fn test_largest_face_wins_within_sample() {
        let small = FaceBox::new(100.0, 100.0, 40.0, 40.0);
        let large = FaceBox::new(900.0, 400.0, 200.0, 200.0);
        let detector = ScriptedDetector::new(vec![vec![small, large]]);

        let tracker = ReframeTracker::new(1920, 1080);
        let rect = tracker
            .select_crop_window(&detector, 0.0, 10.0)
            .await
            .unwrap();
        // Centered on the large face at (1000, 500)
        assert_eq!(rect.x, 696);
    }

    #[tokio::test]
    async fn test_no_face_detected() {
        let detector = ScriptedDetector::new(vec![vec![], vec![], vec![], vec![]]);
        let tracker = ReframeTracker::new(1920, 1080);
        let err = tracker
            .select_crop_window(&detector, 0.0, 40.0)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::NoFaceDetected));
    }

    #[test]
    fn test_interpolate_rect_endpoints() {
        let a = CropRect::new(0, 0, 608, 1080);
        let b = CropRect::new(1312, 0, 608, 1080);
        let frames = interpolate_rect(a, b, 5);
        assert_eq!(frames.len(), 5);
        assert_eq!(frames[0], a);
        assert_eq!(frames[4], b);
        assert_eq!(frames[2].x, 656); // midpoint
    }

    #[test]
    fn test_interpolate_rect_degenerate_steps() {
        let a = CropRect::new(0, 0, 100, 100);
        let b = CropRect::new(50, 0, 100, 100);
        assert!(interpolate_rect(a, b, 0).is_empty());
        assert_eq!(interpolate_rect(a, b, 1), vec![a]);
    }
}
