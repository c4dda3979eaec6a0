//! Compositing: Porter-Duff source-over on straight-alpha RGBA8.
//!
//! ```text
//!   Da' = Sa + Da*(1 - Sa)
//!   Dc' = (Sc*Sa + Dc*Da*(1 - Sa)) / Da'
//! ```
//!
//! Computed in floating point and rounded to the nearest u8. A fully
//! transparent result leaves the destination untouched.

use crate::color::Rgba8;
use crate::error::{RasterError, Result};
use crate::rendering_buffer::{RasterizedImage, PIXEL_SIZE};

/// Composite `src` over `dst`.
#[inline]
pub fn blend_src_over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    if src.a == 0 {
        return dst;
    }
    if src.a == 255 {
        return src;
    }
    let sa = src.a as f32 / 255.0;
    let da = dst.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return dst;
    }
    let dw = da * (1.0 - sa);
    let ch = |s: u8, d: u8| -> u8 {
        let v = (s as f32 * sa + d as f32 * dw) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba8::new(
        ch(src.r, dst.r),
        ch(src.g, dst.g),
        ch(src.b, dst.b),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}

/// Composite every pixel of `src` over the matching pixel of `dst`.
///
/// Both images must have the same dimensions.
pub fn composite_layer(dst: &mut RasterizedImage, src: &RasterizedImage) -> Result<()> {
    if dst.width() != src.width() || dst.height() != src.height() {
        return Err(RasterError::SizeMismatch {
            expected: dst.data().len(),
            actual: src.data().len(),
        });
    }
    for y in 0..src.height() {
        let (Some(s_row), Some(d_row)) = (src.row(y), dst.row_mut(y)) else {
            continue;
        };
        for (s, d) in s_row
            .chunks_exact(PIXEL_SIZE)
            .zip(d_row.chunks_exact_mut(PIXEL_SIZE))
        {
            if s[3] == 0 {
                continue;
            }
            blend_src_over(Rgba8::from_slice(d), Rgba8::from_slice(s)).store(d);
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_source_is_identity() {
        let dst = Rgba8::new(10, 20, 30, 40);
        assert_eq!(blend_src_over(dst, Rgba8::new(200, 200, 200, 0)), dst);
    }

    #[test]
    fn test_opaque_source_replaces() {
        let src = Rgba8::new(1, 2, 3, 255);
        assert_eq!(blend_src_over(Rgba8::new(9, 9, 9, 128), src), src);
    }

    #[test]
    fn test_over_transparent_destination() {
        let src = Rgba8::new(100, 150, 200, 128);
        assert_eq!(blend_src_over(Rgba8::TRANSPARENT, src), src);
    }

    #[test]
    fn test_half_over_opaque() {
        let out = blend_src_over(Rgba8::new(0, 0, 0, 255), Rgba8::new(255, 255, 255, 128));
        assert_eq!(out.a, 255);
        assert!((out.r as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_composite_layer() {
        let mut dst = RasterizedImage::new(2, 1);
        dst.set_pixel(0, 0, Rgba8::BLACK);
        dst.set_pixel(1, 0, Rgba8::BLACK);
        let mut src = RasterizedImage::new(2, 1);
        src.set_pixel(1, 0, Rgba8::WHITE);
        composite_layer(&mut dst, &src).unwrap();
        assert_eq!(dst.pixel(0, 0), Some(Rgba8::BLACK));
        assert_eq!(dst.pixel(1, 0), Some(Rgba8::WHITE));
    }

    #[test]
    fn test_composite_size_mismatch() {
        let mut dst = RasterizedImage::new(2, 2);
        let src = RasterizedImage::new(3, 2);
        assert!(matches!(
            composite_layer(&mut dst, &src),
            Err(RasterError::SizeMismatch { .. })
        ));
    }
}
