//! Rendering buffer: the owned RGBA8 pixel grid.
//!
//! [`RasterizedImage`] is row-major with a top-left origin, 4 bytes per
//! pixel, straight alpha. `data.len() == width * height * 4` holds for the
//! whole lifetime of the value: the fields are private and every writer is
//! bounds-checked, so out-of-range coordinates are silently ignored.

use crate::color::Rgba8;
use crate::error::{RasterError, Result};

/// Bytes per RGBA8 pixel.
pub const PIXEL_SIZE: usize = 4;

/// An owned RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RasterizedImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Byte length of a `width` x `height` image, or `None` if it cannot be
/// allocated.
pub fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(PIXEL_SIZE)
        .filter(|n| *n <= isize::MAX as usize)
}

impl RasterizedImage {
    /// Create a fully transparent image.
    ///
    /// Panics if the size overflows; use [`RasterizedImage::try_new`] for
    /// sizes that come from outside the crate.
    pub fn new(width: u32, height: u32) -> Self {
        match Self::try_new(width, height) {
            Ok(img) => img,
            Err(e) => panic!("{}", e),
        }
    }

    /// Create a fully transparent image, or `InvalidSize` if its byte size
    /// overflows.
    pub fn try_new(width: u32, height: u32) -> Result<Self> {
        let len = byte_len(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wrap existing pixel data, checking its length.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        if data.len() != expected {
            return Err(RasterError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, top row first.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable pixel bytes. The slice cannot change length, so the size
    /// invariant is kept.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * PIXEL_SIZE)
    }

    /// Pixel at (x, y), or `None` outside the image.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba8> {
        self.offset(x, y)
            .map(|o| Rgba8::from_slice(&self.data[o..o + PIXEL_SIZE]))
    }

    /// Overwrite the pixel at (x, y). Ignored outside the image.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, c: Rgba8) {
        if let Some(o) = self.offset(x, y) {
            c.store(&mut self.data[o..o + PIXEL_SIZE]);
        }
    }

    /// One row of raw bytes, or `None` if `y` is out of range.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width as usize * PIXEL_SIZE;
        let start = y as usize * stride;
        Some(&self.data[start..start + stride])
    }

    pub(crate) fn row_mut(&mut self, y: u32) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width as usize * PIXEL_SIZE;
        let start = y as usize * stride;
        Some(&mut self.data[start..start + stride])
    }

    /// Reverse the row order in place, for consumers with a bottom-left
    /// origin.
    pub fn flip_y(&mut self) {
        let stride = self.width as usize * PIXEL_SIZE;
        if stride == 0 {
            return;
        }
        let h = self.height as usize;
        for y in 0..h / 2 {
            let (top, bottom) = self.data.split_at_mut((h - 1 - y) * stride);
            top[y * stride..(y + 1) * stride].swap_with_slice(&mut bottom[..stride]);
        }
    }

    /// Fill the whole image with one color.
    pub fn clear(&mut self, c: Rgba8) {
        for px in self.data.chunks_exact_mut(PIXEL_SIZE) {
            c.store(px);
        }
    }

    /// Returns `true` if no pixel has non-zero alpha.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(PIXEL_SIZE).all(|px| px[3] == 0)
    }
}

// ============================================================================
// Tests
// ============================================================================
