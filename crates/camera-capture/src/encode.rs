//! Lossless still encoding.

use crate::error::CameraError;
use crate::frame::Frame;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

/// A frame encoded as PNG.
#[derive(Clone, PartialEq, Eq)]
pub struct PngImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for PngImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PngImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_bytes", &self.bytes.len())
            .finish()
    }
}

/// Encode a frame at its native resolution.
pub fn encode_png(frame: &Frame) -> Result<PngImage, CameraError> {
    if frame.is_empty() {
        return Err(CameraError::NotReady);
    }
    if !frame.is_valid() {
        return Err(CameraError::CaptureFailed(format!(
            "pixel buffer of {} bytes does not match {}x{}",
            frame.pixels().len(),
            frame.width(),
            frame.height()
        )));
    }

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        frame.pixels(),
        frame.width(),
        frame.height(),
        ExtendedColorType::Rgb8,
    )?;

    Ok(PngImage {
        bytes,
        width: frame.width(),
        height: frame.height(),
    })
}
