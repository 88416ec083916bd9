//! Scoped camera stream.

use crate::camera::Camera;
use crate::encode::{encode_png, PngImage};
use crate::error::CameraError;
use tracing::{debug, info};

/// A held camera stream.
///
/// The stream is acquired in [`CameraSession::open`] and released when the
/// session is dropped, whatever path the owner leaves through.
pub struct CameraSession {
    camera: Box<dyn Camera>,
}

impl CameraSession {
    /// Request video access and start the stream.
    pub fn open(mut camera: Box<dyn Camera>) -> Result<Self, CameraError> {
        camera.open()?;
        info!("Camera stream started: {}", camera.name());
        Ok(Self { camera })
    }

    /// Freeze the current frame into a PNG still.
    ///
    /// Fails with [`CameraError::NotReady`] while the stream has no
    /// intrinsic size yet.
    pub fn capture_photo(&mut self) -> Result<PngImage, CameraError> {
        let frame = self.camera.capture()?;
        if frame.is_empty() {
            return Err(CameraError::NotReady);
        }

        let png = encode_png(&frame)?;
        debug!(
            "Captured frame {} ({}x{}, {} bytes)",
            frame.sequence(),
            png.width,
            png.height,
            png.bytes.len()
        );
        Ok(png)
    }

    pub fn is_active(&self) -> bool {
        self.camera.is_open()
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        if self.camera.is_open() {
            self.camera.close();
            info!("Camera stream released: {}", self.camera.name());
        }
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("camera", &self.camera.name())
            .field("active", &self.camera.is_open())
            .finish()
    }
}
