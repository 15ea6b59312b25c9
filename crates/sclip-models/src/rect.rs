//! Crop rectangles and face samples in source-frame pixel coordinates.

use serde::{Deserialize, Serialize};

/// A face-center sample taken at one instant of a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceSample {
    /// Absolute time of the sample in seconds
    pub time: f64,
    /// Face center x in source-frame pixels
    pub cx: f64,
    /// Face center y in source-frame pixels
    pub cy: f64,
}

impl FaceSample {
    pub fn new(time: f64, cx: f64, cy: f64) -> Self {
        Self { time, cx, cy }
    }
}

/// A crop rectangle in source-frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    /// X coordinate of the top-left corner
    pub x: u32,
    /// Y coordinate of the top-left corner
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl CropRect {
    /// Create a new crop rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check the rectangle lies within a `frame_width` x `frame_height` frame.
    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x + self.width <= frame_width
            && self.y + self.height <= frame_height
    }

    /// Width/height ratio.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_within() {
        let rect = CropRect::new(1296, 0, 608, 1080);
        assert!(rect.fits_within(1920, 1080));
        assert!(!rect.fits_within(1900, 1080));
        assert!(!CropRect::new(0, 0, 0, 100).fits_within(1920, 1080));
    }

    #[test]
    fn test_aspect() {
        let rect = CropRect::new(0, 0, 608, 1080);
        assert!((rect.aspect() - 9.0 / 16.0).abs() < 0.01);
    }
}
