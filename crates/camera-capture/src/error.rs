//! Camera errors.

use thiserror::Error;

/// Errors that can occur while acquiring or reading a camera stream.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera access denied: {0}")]
    PermissionDenied(String),

    #[error("camera device not found: {0}")]
    DeviceNotFound(String),

    #[error("failed to open camera: {0}")]
    OpenFailed(String),

    #[error("camera stream is not producing frames yet")]
    NotReady,

    #[error("camera not open")]
    NotOpen,

    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),

    #[error("failed to encode photo: {0}")]
    Encode(#[from] image::ImageError),
}
