//! Viewport transformation.
//!
//! Maps SVG user space (the `viewBox`) onto a device pixel grid. The
//! mapping is a plain stretch: icons are authored square, so aspect ratio
//! preservation is not needed.

use crate::basics::Point;
use crate::trans_affine::Transform;

// ============================================================================
// ViewBox
// ============================================================================

/// SVG logical coordinate rectangle.
///
/// `width` and `height` are always positive; [`ViewBox::new`] rejects
/// anything else so the scale computation can never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Fallback used when the `viewBox` attribute is malformed.
    pub const DEFAULT: ViewBox = ViewBox {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
    };

    /// Create a view box, or `None` if either dimension is not positive
    /// (or not finite).
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        let valid = [x, y, width, height].iter().all(|v| v.is_finite());
        if !valid || width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Self {
            x,
            y,
            width,
            height,
        })
    }
}

impl Default for ViewBox {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ============================================================================
// RasterContext
// ============================================================================

/// Everything needed to map one element's user-space coordinates to pixels.
///
/// Derived per element and read-only while it renders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterContext {
    pub width: u32,
    pub height: u32,
    pub view_box: ViewBox,
    pub scale_x: f32,
    pub scale_y: f32,
    pub transform: Transform,
}

impl RasterContext {
    pub fn new(width: u32, height: u32, view_box: ViewBox, transform: Transform) -> Self {
        Self {
            width,
            height,
            view_box,
            scale_x: (width as f64 / view_box.width) as f32,
            scale_y: (height as f64 / view_box.height) as f32,
            transform,
        }
    }

    /// Context whose view box matches the pixel grid one to one.
    pub fn new_identity(width: u32, height: u32) -> Self {
        let vb = ViewBox::new(0.0, 0.0, width.max(1) as f64, height.max(1) as f64)
            .unwrap_or_default();
        Self::new(width, height, vb, Transform::new())
    }

    /// Map a user-space point to device pixels.
    ///
    /// The element transform is applied first, then the view box origin is
    /// removed and the result scaled to the pixel grid.
    #[inline]
    pub fn map(&self, p: Point) -> Point {
        let t = self.transform.transform(p);
        Point::new(
            (t.x - self.view_box.x as f32) * self.scale_x,
            (t.y - self.view_box.y as f32) * self.scale_y,
        )
    }

    /// The smaller of the two axis scales.
    pub fn min_scale(&self) -> f32 {
        self.scale_x.min(self.scale_y)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_box_rejects_non_positive() {
        assert!(ViewBox::new(0.0, 0.0, 0.0, 10.0).is_none());
        assert!(ViewBox::new(0.0, 0.0, 10.0, -1.0).is_none());
        assert!(ViewBox::new(0.0, 0.0, f64::NAN, 1.0).is_none());
        assert!(ViewBox::new(0.0, 0.0, 10.0, 10.0).is_some());
    }

    #[test]
    fn test_view_box_default() {
        let vb = ViewBox::default();
        assert_eq!((vb.x, vb.y, vb.width, vb.height), (0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_context_scale() {
        let vb = ViewBox::new(0.0, 0.0, 16.0, 8.0).unwrap();
        let ctx = RasterContext::new(64, 64, vb, Transform::new());
        assert_eq!(ctx.scale_x, 4.0);
        assert_eq!(ctx.scale_y, 8.0);
        assert_eq!(ctx.min_scale(), 4.0);
    }

    #[test]
    fn test_map_removes_view_box_origin() {
        let vb = ViewBox::new(10.0, 20.0, 10.0, 10.0).unwrap();
        let ctx = RasterContext::new(100, 100, vb, Transform::new());
        assert_eq!(ctx.map(Point::new(10.0, 20.0)), Point::new(0.0, 0.0));
        assert_eq!(ctx.map(Point::new(15.0, 25.0)), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_map_applies_transform_before_scale() {
        let vb = ViewBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let ctx = RasterContext::new(20, 20, vb, Transform::new_translation(1.0, 2.0));
        assert_eq!(ctx.map(Point::new(0.0, 0.0)), Point::new(2.0, 4.0));
    }
}
