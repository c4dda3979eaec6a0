//! Image resampling filters.
//!
//! Supersampled renders are reduced to the requested size by a separable
//! weighted average. Each output pixel center is mapped back into the
//! source, and every source pixel within the filter footprint contributes
//! `calc_weight(distance / scale)`. When downscaling, the footprint grows
//! with the scale ratio so every source pixel is accounted for.
//!
//! Accumulation happens in premultiplied alpha: a transparent neighbour
//! lowers coverage but never pulls the color of an edge toward black.

use crate::color::Rgba8;
use crate::rendering_buffer::RasterizedImage;

// ============================================================================
// ImageFilterFunction trait
// ============================================================================

/// Filter shape function with `radius()` and `calc_weight(x)`.
pub trait ImageFilterFunction {
    /// The radius of the filter kernel, in destination pixels.
    fn radius(&self) -> f64;
    /// Calculate the filter weight at distance `x` from center.
    fn calc_weight(&self, x: f64) -> f64;
}

/// Box filter, radius 0.5. Plain area average.
pub struct ImageFilterBox;
impl ImageFilterFunction for ImageFilterBox {
    fn radius(&self) -> f64 {
        0.5
    }
    fn calc_weight(&self, x: f64) -> f64 {
        if x <= 0.5 {
            1.0
        } else {
            0.0
        }
    }
}

/// Bilinear (tent) filter, radius 1.0.
pub struct ImageFilterBilinear;
impl ImageFilterFunction for ImageFilterBilinear {
    fn radius(&self) -> f64 {
        1.0
    }
    fn calc_weight(&self, x: f64) -> f64 {
        (1.0 - x).max(0.0)
    }
}

/// Filter selection for [`RenderOptions`](crate::svg_document::RenderOptions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleFilter {
    #[default]
    Box,
    Bilinear,
}

// ============================================================================
// Resampling
// ============================================================================

/// Source pixels contributing to one destination pixel along one axis.
struct AxisWeights {
    start: usize,
    weights: Vec<f64>,
}

fn axis_weights<F: ImageFilterFunction>(src_len: u32, dst_len: u32, filter: &F) -> Vec<AxisWeights> {
    let scale = src_len as f64 / dst_len as f64;
    let footprint = scale.max(1.0);
    let r = filter.radius() * footprint;
    let last = src_len as i64 - 1;

    (0..dst_len)
        .map(|o| {
            let center = (o as f64 + 0.5) * scale;
            let lo = ((center - r - 0.5).floor() as i64).clamp(0, last);
            let hi = ((center + r).ceil() as i64).clamp(0, last);
            let weights = (lo..=hi)
                .map(|i| {
                    let d = ((i as f64 + 0.5) - center).abs();
                    if d > r + 1e-9 {
                        0.0
                    } else {
                        filter.calc_weight(d / footprint).max(0.0)
                    }
                })
                .collect();
            AxisWeights {
                start: lo as usize,
                weights,
            }
        })
        .collect()
}

/// Resample `src` to `width` x `height` with the given filter.
///
/// Empty sources or targets produce an empty (transparent) image.
pub fn resample<F: ImageFilterFunction>(
    src: &RasterizedImage,
    width: u32,
    height: u32,
    filter: &F,
) -> RasterizedImage {
    let mut dst = RasterizedImage::new(width, height);
    if src.width() == 0 || src.height() == 0 || width == 0 || height == 0 {
        return dst;
    }
    let xs = axis_weights(src.width(), width, filter);
    let ys = axis_weights(src.height(), height, filter);
    let data = src.data();
    let stride = src.width() as usize * 4;

    for (oy, wy) in ys.iter().enumerate() {
        for (ox, wx) in xs.iter().enumerate() {
            let mut sum = [0.0f64; 4];
            let mut total = 0.0;
            for (j, &ky) in wy.weights.iter().enumerate() {
                if ky == 0.0 {
                    continue;
                }
                let row = (wy.start + j) * stride;
                for (i, &kx) in wx.weights.iter().enumerate() {
                    let w = kx * ky;
                    if w == 0.0 {
                        continue;
                    }
                    let p = &data[row + (wx.start + i) * 4..][..4];
                    let a = p[3] as f64;
                    sum[0] += w * p[0] as f64 * a;
                    sum[1] += w * p[1] as f64 * a;
                    sum[2] += w * p[2] as f64 * a;
                    sum[3] += w * a;
                    total += w;
                }
            }
            if total <= 0.0 || sum[3] <= 0.0 {
                continue;
            }
            let to_u8 = |v: f64| v.round().clamp(0.0, 255.0) as u8;
            let c = Rgba8::new(
                to_u8(sum[0] / sum[3]),
                to_u8(sum[1] / sum[3]),
                to_u8(sum[2] / sum[3]),
                to_u8(sum[3] / total),
            );
            dst.set_pixel(ox as i32, oy as i32, c);
        }
    }
    dst
}

/// Resample with a filter chosen at run time.
pub fn resample_with(src: &RasterizedImage, width: u32, height: u32, filter: ResampleFilter) -> RasterizedImage {
    match filter {
        ResampleFilter::Box => resample(src, width, height, &ImageFilterBox),
        ResampleFilter::Bilinear => resample(src, width, height, &ImageFilterBilinear),
    }
}

// ============================================================================
// Tests
// ============================================================================
