//! Camera abstraction for still capture.
//!
//! A [`Camera`] is a video-only source opened without resolution or
//! frame rate constraints. Frames come back at the stream's native size.

use crate::error::CameraError;
use crate::frame::Frame;
use std::path::PathBuf;
use tracing::info;

/// Trait for camera implementations.
pub trait Camera: Send {
    /// Requests access to the video stream.
    fn open(&mut self) -> Result<(), CameraError>;

    /// Reads whatever frame is current.
    fn capture(&mut self) -> Result<Frame, CameraError>;

    /// Checks if the stream is currently held.
    fn is_open(&self) -> bool;

    /// Stops the stream and releases the device.
    fn close(&mut self);

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Largest side accepted by [`TestPatternCamera`].
pub const MAX_PATTERN_DIMENSION: u32 = 16_384;

/// Camera producing a synthetic gradient, for demos and tests.
#[derive(Debug)]
pub struct TestPatternCamera {
    width: u32,
    height: u32,
    open: bool,
    sequence: u64,
}

impl TestPatternCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            open: false,
            sequence: 0,
        }
    }
}

impl Default for TestPatternCamera {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl Camera for TestPatternCamera {
    fn open(&mut self) -> Result<(), CameraError> {
        if self.width > MAX_PATTERN_DIMENSION || self.height > MAX_PATTERN_DIMENSION {
            return Err(CameraError::OpenFailed(format!(
                "test pattern {}x{} exceeds {}x{}",
                self.width, self.height, MAX_PATTERN_DIMENSION, MAX_PATTERN_DIMENSION
            )));
        }

        self.open = true;
        self.sequence = 0;
        info!("Test pattern camera opened ({}x{})", self.width, self.height);
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        if !self.open {
            return Err(CameraError::NotOpen);
        }

        self.sequence += 1;
        let shift = (self.sequence % 256) as u32;
        let mut pixels = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push(((x + shift) % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x ^ y) % 256) as u8);
            }
        }

        Ok(Frame::new(pixels, self.width, self.height, self.sequence))
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            info!("Test pattern camera closed");
        }
    }

    fn name(&self) -> &str {
        "test-pattern"
    }
}

/// Camera that replays a still image file as its stream.
///
/// The image is decoded when the camera is opened, so a missing or
/// unreadable file fails the same way an absent device would.
#[derive(Debug)]
pub struct ImageFileCamera {
    path: PathBuf,
    frame: Option<image::RgbImage>,
    sequence: u64,
}

impl ImageFileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame: None,
            sequence: 0,
        }
    }
}

impl Camera for ImageFileCamera {
    fn open(&mut self) -> Result<(), CameraError> {
        if !self.path.exists() {
            return Err(CameraError::DeviceNotFound(self.path.display().to_string()));
        }

        let decoded = image::open(&self.path)
            .map_err(|e| CameraError::OpenFailed(format!("{}: {}", self.path.display(), e)))?;
        let rgb = decoded.to_rgb8();
        info!(
            "Image file camera opened: {} ({}x{})",
            self.path.display(),
            rgb.width(),
            rgb.height()
        );

        self.frame = Some(rgb);
        self.sequence = 0;
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let image = self.frame.as_ref().ok_or(CameraError::NotOpen)?;
        self.sequence += 1;
        Ok(Frame::new(
            image.as_raw().clone(),
            image.width(),
            image.height(),
            self.sequence,
        ))
    }

    fn is_open(&self) -> bool {
        self.frame.is_some()
    }

    fn close(&mut self) {
        if self.frame.take().is_some() {
            info!("Image file camera closed: {}", self.path.display());
        }
    }

    fn name(&self) -> &str {
        "image-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_camera_lifecycle() {
        let mut camera = TestPatternCamera::new(8, 4);
        assert!(!camera.is_open());

        camera.open().unwrap();
        assert!(camera.is_open());

        let frame = camera.capture().unwrap();
        assert!(frame.is_valid());
        assert_eq!(frame.sequence(), 1);
        assert_eq!((frame.width(), frame.height()), (8, 4));

        let frame2 = camera.capture().unwrap();
        assert_eq!(frame2.sequence(), 2);
        assert_ne!(frame.pixels(), frame2.pixels());

        camera.close();
        assert!(!camera.is_open());
    }

    #[test]
    fn test_pattern_camera_rejects_oversized_stream() {
        let mut camera = TestPatternCamera::new(40_000, 40_000);
        assert!(matches!(camera.open(), Err(CameraError::OpenFailed(_))));
        assert!(!camera.is_open());
        assert!(matches!(camera.capture(), Err(CameraError::NotOpen)));

        let mut wide = TestPatternCamera::new(MAX_PATTERN_DIMENSION + 1, 1);
        assert!(matches!(wide.open(), Err(CameraError::OpenFailed(_))));
    }

    #[test]
    fn test_pattern_camera_accepts_largest_side() {
        let mut camera = TestPatternCamera::new(MAX_PATTERN_DIMENSION, 2);
        camera.open().unwrap();

        let frame = camera.capture().unwrap();
        assert!(frame.is_valid());
        assert_eq!(frame.pixels().len(), MAX_PATTERN_DIMENSION as usize * 2 * 3);
    }

    #[test]
    fn test_capture_without_open() {
        let mut camera = TestPatternCamera::default();
        assert!(matches!(camera.capture(), Err(CameraError::NotOpen)));
    }

    #[test]
    fn test_image_file_camera_missing_file() {
        let mut camera = ImageFileCamera::new("/nonexistent/face.png");
        assert!(matches!(camera.open(), Err(CameraError::DeviceNotFound(_))));
        assert!(!camera.is_open());
    }

    #[test]
    fn test_image_file_camera_replays_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.png");
        image::RgbImage::from_pixel(5, 3, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let mut camera = ImageFileCamera::new(&path);
        camera.open().unwrap();

        let frame = camera.capture().unwrap();
        assert_eq!((frame.width(), frame.height()), (5, 3));
        assert_eq!(&frame.pixels()[..3], &[10, 20, 30]);

        camera.close();
        assert!(matches!(camera.capture(), Err(CameraError::NotOpen)));
    }
}
