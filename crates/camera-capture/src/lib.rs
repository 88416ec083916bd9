//! Camera stream sessions and still photo capture.
//!
//! A [`CameraSession`] holds a live stream from a [`Camera`] and releases it
//! on drop. Stills are taken at the stream's native resolution and encoded
//! as PNG.

mod camera;
mod encode;
mod error;
mod frame;
mod session;

pub use camera::{Camera, ImageFileCamera, TestPatternCamera};
pub use encode::{encode_png, PngImage};
pub use error::CameraError;
pub use frame::Frame;
pub use session::CameraSession;
