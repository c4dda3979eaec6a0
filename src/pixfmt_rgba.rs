//! Pixel format: the drawing surface seen by the rasterizers.
//!
//! The fill rasterizer copies opaque spans, the stroker blends pixels with a
//! coverage value. Both talk to the surface through [`PixelFormat`] so they
//! never index raw bytes themselves. Coordinates outside the surface are
//! ignored.

use crate::color::Rgba8;
use crate::comp_op::blend_src_over;
use crate::rendering_buffer::RasterizedImage;

/// Access to an RGBA8 drawing surface.
pub trait PixelFormat {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Get the pixel color at (x, y); transparent outside the surface.
    fn pixel(&self, x: i32, y: i32) -> Rgba8;

    /// Copy (overwrite) a single pixel at (x, y) with color `c`.
    fn copy_pixel(&mut self, x: i32, y: i32, c: &Rgba8);

    /// Copy (overwrite) a horizontal line of `len` pixels with color `c`.
    fn copy_hline(&mut self, x: i32, y: i32, len: u32, c: &Rgba8) {
        for i in 0..len as i32 {
            self.copy_pixel(x + i, y, c);
        }
    }

    /// Blend color `c`, its alpha scaled by `coverage` in `[0, 1]`.
    fn blend_pixel(&mut self, x: i32, y: i32, c: &Rgba8, coverage: f32) {
        let a = c.alpha_with_coverage(coverage);
        if a == 0 {
            return;
        }
        let out = blend_src_over(self.pixel(x, y), Rgba8::with_opacity(c, a));
        self.copy_pixel(x, y, &out);
    }
}

impl PixelFormat for RasterizedImage {
    fn width(&self) -> u32 {
        RasterizedImage::width(self)
    }

    fn height(&self) -> u32 {
        RasterizedImage::height(self)
    }

    #[inline]
    fn pixel(&self, x: i32, y: i32) -> Rgba8 {
        RasterizedImage::pixel(self, x, y).unwrap_or_default()
    }

    #[inline]
    fn copy_pixel(&mut self, x: i32, y: i32, c: &Rgba8) {
        self.set_pixel(x, y, *c);
    }

    fn copy_hline(&mut self, x: i32, y: i32, len: u32, c: &Rgba8) {
        if y < 0 || y as u32 >= self.height() || len == 0 {
            return;
        }
        let x1 = x.max(0);
        let x2 = (x as i64 + len as i64).min(self.width() as i64) as i32;
        if x1 >= x2 {
            return;
        }
        if let Some(row) = self.row_mut(y as u32) {
            for px in row[x1 as usize * 4..x2 as usize * 4].chunks_exact_mut(4) {
                c.store(px);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
