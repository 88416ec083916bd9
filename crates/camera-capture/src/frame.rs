//! Raw video frames.

/// A single RGB8 frame read from a camera stream.
#[derive(Clone)]
pub struct Frame {
    /// Packed RGB pixels, row-major.
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    /// Monotonic sequence number within the stream.
    sequence: u64,
}

impl Frame {
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            sequence,
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Whether the frame has no intrinsic size (stream not started).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Checks that the pixel buffer matches the dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == (self.width as usize) * (self.height as usize) * 3
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}
