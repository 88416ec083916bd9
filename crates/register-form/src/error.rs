//! Form error types.

use camera_capture::CameraError;
use registration_client::RegistrationError;
use thiserror::Error;

/// Errors returned by [`crate::RegisterForm`] operations.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("A registration is already in progress")]
    SubmissionInFlight,

    #[error("Registration already completed")]
    AlreadyRegistered,

    #[error("Form has been closed")]
    Closed,

    #[error("Camera is not active")]
    CameraInactive,

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),
}

/// Result type alias for form operations.
pub type FormResult<T> = Result<T, FormError>;
