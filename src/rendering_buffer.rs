//! Rendering buffer: an owned RGB24 pixel image.
//!
//! Pixels are stored row-major, top row first, 3 bytes per pixel in R, G, B
//! order, which is the layout image encoders expect. Coordinates passed to
//! this type are in image space (row 0 at the top).

use crate::color::Rgb8;

/// Bytes per pixel for RGB24.
pub const BPP: usize = 3;

/// Owned RGB24 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderingBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RenderingBuffer {
    /// Create a buffer filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb8) -> Self {
        let mut buf = Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * BPP],
        };
        buf.clear(background);
        buf
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * BPP
    }

    /// Fill every pixel with a solid color.
    pub fn clear(&mut self, c: Rgb8) {
        for px in self.data.chunks_exact_mut(BPP) {
            px[0] = c.r;
            px[1] = c.g;
            px[2] = c.b;
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize * self.width as usize + x as usize) * BPP)
        } else {
            None
        }
    }

    /// Color at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        let off = self.offset(x, y)?;
        Some(Rgb8::new(
            self.data[off],
            self.data[off + 1],
            self.data[off + 2],
        ))
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// Returns `false` and writes nothing when the coordinate is outside the
    /// buffer.
    #[inline]
    pub fn copy_pixel(&mut self, x: u32, y: u32, c: Rgb8) -> bool {
        match self.offset(x, y) {
            Some(off) => {
                self.data[off] = c.r;
                self.data[off + 1] = c.g;
                self.data[off + 2] = c.b;
                true
            }
            None => false,
        }
    }

    /// Bytes of row `y`, or `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride();
        Some(&self.data[start..start + self.stride()])
    }

    /// Whole image, row-major, top row first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Number of pixels equal to `c`.
    pub fn count_color(&self, c: Rgb8) -> usize {
        self.data
            .chunks_exact(BPP)
            .filter(|px| px[0] == c.r && px[1] == c.g && px[2] == c.b)
            .count()
    }
}

// ============================================================================
// Tests
// ============================================================================
