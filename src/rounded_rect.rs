//! Rectangle to path adapter.
//!
//! Produces `d` attribute text for an SVG `<rect>`, so rectangles go
//! through the same tokenizer and builder as `<path>` elements. Rounded
//! corners are emitted as elliptical arcs.

use std::fmt::Write;

/// Rectangle with one elliptical radius shared by all four corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    rx: f32,
    ry: f32,
}

impl RoundedRect {
    /// Create a rectangle. A missing radius copies the other one; negative
    /// radii count as missing.
    pub fn new(x: f32, y: f32, width: f32, height: f32, rx: Option<f32>, ry: Option<f32>) -> Self {
        let rx = rx.filter(|r| *r >= 0.0);
        let ry = ry.filter(|r| *r >= 0.0);
        let mut rr = Self {
            x,
            y,
            width,
            height,
            rx: rx.or(ry).unwrap_or(0.0),
            ry: ry.or(rx).unwrap_or(0.0),
        };
        rr.normalize_radius();
        rr
    }

    /// Clamp the radii to half the corresponding side.
    pub fn normalize_radius(&mut self) {
        self.rx = self.rx.min(self.width * 0.5).max(0.0);
        self.ry = self.ry.min(self.height * 0.5).max(0.0);
    }

    pub fn radius(&self) -> (f32, f32) {
        (self.rx, self.ry)
    }

    /// Path data for the rectangle, or an empty string when either side is
    /// not positive.
    pub fn to_path_data(&self) -> String {
        let (x, y, w, h) = (self.x, self.y, self.width, self.height);
        if !(w > 0.0 && h > 0.0) {
            return String::new();
        }
        let mut d = String::new();
        if self.rx <= 0.0 || self.ry <= 0.0 {
            let _ = write!(d, "M{},{} H{} V{} H{} Z", x, y, x + w, y + h, x);
            return d;
        }
        let (rx, ry) = (self.rx, self.ry);
        let _ = write!(
            d,
            "M{},{} H{} A{},{} 0 0 1 {},{} V{} A{},{} 0 0 1 {},{} H{} A{},{} 0 0 1 {},{} V{} A{},{} 0 0 1 {},{} Z",
            x + rx,
            y,
            x + w - rx,
            rx,
            ry,
            x + w,
            y + ry,
            y + h - ry,
            rx,
            ry,
            x + w - rx,
            y + h,
            x + rx,
            rx,
            ry,
            x,
            y + h - ry,
            y + ry,
            rx,
            ry,
            x + rx,
            y,
        );
        d
    }
}

/// Path data for an SVG `<rect>`.
pub fn rect_to_path(x: f32, y: f32, width: f32, height: f32, rx: Option<f32>, ry: Option<f32>) -> String {
    RoundedRect::new(x, y, width, height, rx, ry).to_path_data()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::FillingRule;
    use crate::color::Rgba8;
    use crate::conv_polygon::build_polygons;
    use crate::path_storage::{parse_path_data, PathCommand};
    use crate::rasterizer_scanline::fill_polygons;
    use crate::rendering_buffer::RasterizedImage;
    use crate::trans_viewport::RasterContext;

    #[test]
    fn test_plain_rect() {
        assert_eq!(rect_to_path(1.0, 2.0, 3.0, 4.0, None, None), "M1,2 H4 V6 H1 Z");
        let cmds = parse_path_data(&rect_to_path(1.0, 2.0, 3.0, 4.0, Some(0.0), None));
        assert_eq!(cmds.len(), 5);
        assert!(cmds.iter().all(|c| !matches!(c, PathCommand::ArcAbs(_))));
    }

    #[test]
    fn test_non_positive_size() {
        assert!(rect_to_path(0.0, 0.0, 0.0, 4.0, None, None).is_empty());
        assert!(rect_to_path(0.0, 0.0, 4.0, -1.0, Some(1.0), None).is_empty());
    }

    #[test]
    fn test_radius_defaults_and_clamp() {
        assert_eq!(RoundedRect::new(0.0, 0.0, 10.0, 4.0, Some(3.0), None).radius(), (3.0, 2.0));
        assert_eq!(RoundedRect::new(0.0, 0.0, 10.0, 10.0, None, Some(2.0)).radius(), (2.0, 2.0));
        assert_eq!(RoundedRect::new(0.0, 0.0, 10.0, 10.0, Some(-1.0), Some(2.0)).radius(), (2.0, 2.0));
    }

    #[test]
    fn test_rounded_has_four_arcs() {
        let cmds = parse_path_data(&rect_to_path(0.0, 0.0, 10.0, 10.0, Some(2.0), None));
        let arcs = cmds.iter().filter(|c| matches!(c, PathCommand::ArcAbs(_))).count();
        assert_eq!(arcs, 4);
        assert!(cmds.last().map_or(false, |c| c.is_close()));
    }

    #[test]
    fn test_rounded_corners_unpainted() {
        let cmds = parse_path_data(&rect_to_path(0.0, 0.0, 20.0, 20.0, Some(6.0), None));
        let ctx = RasterContext::new_identity(20, 20);
        let mut img = RasterizedImage::new(20, 20);
        fill_polygons(&mut img, &build_polygons(&cmds, &ctx), &Rgba8::BLACK, FillingRule::EvenOdd);
        for (x, y) in [(0, 0), (19, 0), (0, 19), (19, 19)] {
            assert_eq!(img.pixel(x, y).map(|p| p.a), Some(0), "corner ({}, {})", x, y);
        }
        assert_eq!(img.pixel(10, 10), Some(Rgba8::BLACK));
        assert_eq!(img.pixel(10, 0), Some(Rgba8::BLACK));
    }
}
