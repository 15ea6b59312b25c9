//! Face detection capability.
//!
//! The reframe tracker only needs "bounding boxes at an instant"; the
//! trait keeps the actual detector (OpenCV cascade, remote service, test
//! stub) injectable.

use async_trait::async_trait;

use crate::error::MediaResult;

/// A detected face bounding box in source-frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FaceBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box area in square pixels.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Center point of the box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// External face-detection capability: given an instant in the source
/// video, report zero or more face bounding boxes.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    /// Detect faces in the frame at `time` seconds.
    async fn detect_at(&self, time: f64) -> MediaResult<Vec<FaceBox>>;
}

/// Pick the largest-area box; the sample's face when several are found.
pub fn largest_face(boxes: &[FaceBox]) -> Option<FaceBox> {
    boxes
        .iter()
        .copied()
        .max_by(|a, b| {
            a.area()
                .partial_cmp(&b.area())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(feature = "opencv")]
pub use haar::HaarFaceDetector;

#[cfg(feature = "opencv")]
mod haar {
    use std::path::{Path, PathBuf};

    use async_trait::async_trait;
    use opencv::core::{Mat, Rect, Size, Vector};
    use opencv::objdetect::CascadeClassifier;
    use opencv::prelude::*;
    use opencv::videoio::{VideoCapture, CAP_ANY, CAP_PROP_POS_MSEC};
    use opencv::{imgproc, videoio};

    use super::{FaceBox, FaceDetector};
    use crate::error::{MediaError, MediaResult};

    /// Haar-cascade face detector reading frames straight from the source
    /// video. Detection is blocking; each call runs on the blocking pool.
    pub struct HaarFaceDetector {
        video_path: PathBuf,
        cascade_path: PathBuf,
    }

    impl HaarFaceDetector {
        /// Create a detector for a source video and a frontal-face cascade
        /// XML file.
        pub fn new(video_path: impl AsRef<Path>, cascade_path: impl AsRef<Path>) -> MediaResult<Self> {
            let cascade_path = cascade_path.as_ref().to_path_buf();
            if !cascade_path.exists() {
                return Err(MediaError::FileNotFound(cascade_path));
            }
            Ok(Self {
                video_path: video_path.as_ref().to_path_buf(),
                cascade_path,
            })
        }
    }

    #[async_trait]
    impl FaceDetector for HaarFaceDetector {
        async fn detect_at(&self, time: f64) -> MediaResult<Vec<FaceBox>> {
            let video_path = self.video_path.clone();
            let cascade_path = self.cascade_path.clone();

            tokio::task::spawn_blocking(move || detect_blocking(&video_path, &cascade_path, time))
                .await
                .map_err(|e| MediaError::detection_failed(e.to_string()))?
        }
    }

    fn detect_blocking(
        video_path: &Path,
        cascade_path: &Path,
        time: f64,
    ) -> MediaResult<Vec<FaceBox>> {
        let mut capture = VideoCapture::from_file(&video_path.to_string_lossy(), CAP_ANY)
            .map_err(|e| MediaError::detection_failed(e.to_string()))?;
        if !videoio::VideoCapture::is_opened(&capture)
            .map_err(|e| MediaError::detection_failed(e.to_string()))?
        {
            return Err(MediaError::detection_failed(format!(
                "could not open video {}",
                video_path.display()
            )));
        }

        capture
            .set(CAP_PROP_POS_MSEC, time * 1000.0)
            .map_err(|e| MediaError::detection_failed(e.to_string()))?;

        let mut frame = Mat::default();
        let read = capture
            .read(&mut frame)
            .map_err(|e| MediaError::detection_failed(e.to_string()))?;
        if !read {
            // Seek past the end of stream; no frame means no sample.
            return Ok(Vec::new());
        }

        let mut gray = Mat::default();
        imgproc::cvt_color(&frame, &mut gray, imgproc::COLOR_BGR2GRAY, 0)
            .map_err(|e| MediaError::detection_failed(e.to_string()))?;

        let mut classifier = CascadeClassifier::new(&cascade_path.to_string_lossy())
            .map_err(|e| MediaError::detection_failed(e.to_string()))?;

        let mut faces = Vector::<Rect>::new();
        classifier
            .detect_multi_scale(
                &gray,
                &mut faces,
                1.1,
                5,
                0,
                Size::new(30, 30),
                Size::new(0, 0),
            )
            .map_err(|e| MediaError::detection_failed(e.to_string()))?;

        Ok(faces
            .iter()
            .map(|r| FaceBox::new(r.x as f64, r.y as f64, r.width as f64, r.height as f64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_largest_face() {
        let boxes = vec![
            FaceBox::new(0.0, 0.0, 50.0, 50.0),
            FaceBox::new(100.0, 100.0, 120.0, 130.0),
            FaceBox::new(500.0, 20.0, 80.0, 80.0),
        ];
        let largest = largest_face(&boxes).unwrap();
        assert_eq!(largest.x, 100.0);
        assert_eq!(largest.center(), (160.0, 165.0));
    }

    #[test]
    fn test_largest_face_empty() {
        assert!(largest_face(&[]).is_none());
    }
}
