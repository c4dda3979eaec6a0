//! Anti-aliased outline renderer.
//!
//! Strokes are drawn one segment at a time. For every pixel center near a
//! segment the distance to the centerline decides the coverage:
//!
//! ```text
//!   d = max(dist - half_width + 0.5, 0)
//!   coverage(d) = 1                    d <= 0.5
//!               = 1 - (d - 0.5) * 2    0.5 < d <= 1
//!               = 0                    otherwise
//! ```
//!
//! so a one pixel wide line is fully opaque within half a pixel of its
//! centerline and fades out over the next half pixel. Wider lines keep the
//! same one pixel ramp at their edges.
//!
//! Caps are drawn per [`CapPlacement`]. Joins are not mitered: consecutive
//! segments simply overlap, and [`LineJoin::Round`] adds a disc at the
//! shared vertex when caps are limited to subpath ends.

use crate::basics::{LineCap, LineJoin, Point};
use crate::color::Rgba8;
use crate::conv_polygon::{build_subpaths, Subpath};
use crate::math::{calc_direction, calc_orthogonal, calc_segment_point_distance};
use crate::path_storage::PathCommand;
use crate::pixfmt_rgba::PixelFormat;
use crate::trans_viewport::RasterContext;

// ============================================================================
// Coverage profile
// ============================================================================

/// Coverage for an edge-relative distance `d` (in pixels).
///
/// Non-increasing, `coverage(0) == 1` and `coverage(1) == 0`.
#[inline]
pub fn coverage(d: f32) -> f32 {
    if d <= 0.5 {
        1.0
    } else if d <= 1.0 {
        1.0 - (d - 0.5) * 2.0
    } else {
        0.0
    }
}

/// Half of the effective stroke width. Strokes are never thinner than one
/// pixel.
#[inline]
fn half_width(width: f32) -> f32 {
    width.max(1.0) * 0.5
}

/// Clipped integer pixel range covering `[lo, hi]` plus one pixel margin.
#[inline]
fn pixel_range(lo: f32, hi: f32, limit: u32) -> (i32, i32) {
    let a = (lo.floor() - 1.0).max(0.0);
    let b = (hi.ceil() + 1.0).min(limit as f32 - 1.0);
    (a as i32, b as i32)
}

// ============================================================================
// Primitive drawing
// ============================================================================

/// Draw an anti-aliased line segment of the given width, blended
/// source-over. Zero-length segments draw nothing.
pub fn draw_line<P: PixelFormat>(pixf: &mut P, p1: Point, p2: Point, width: f32, color: &Rgba8) {
    let hw = half_width(width);
    let Some(perp) = calc_orthogonal(hw, p1.x, p1.y, p2.x, p2.y) else {
        return;
    };
    if pixf.width() == 0 || pixf.height() == 0 {
        return;
    }
    let corners = [p1 + perp, p1 - perp, p2 + perp, p2 - perp];
    let min_x = corners.iter().map(|c| c.x).fold(f32::MAX, f32::min);
    let max_x = corners.iter().map(|c| c.x).fold(f32::MIN, f32::max);
    let min_y = corners.iter().map(|c| c.y).fold(f32::MAX, f32::min);
    let max_y = corners.iter().map(|c| c.y).fold(f32::MIN, f32::max);
    if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite()) {
        return;
    }

    let (x1, x2) = pixel_range(min_x, max_x, pixf.width());
    let (y1, y2) = pixel_range(min_y, max_y, pixf.height());
    for y in y1..=y2 {
        let cy = y as f32 + 0.5;
        for x in x1..=x2 {
            let cx = x as f32 + 0.5;
            let dist = calc_segment_point_distance(p1.x, p1.y, p2.x, p2.y, cx, cy);
            let cover = coverage((dist - hw + 0.5).max(0.0));
            if cover > 0.0 {
                pixf.blend_pixel(x, y, color, cover);
            }
        }
    }
}

/// Draw an anti-aliased filled disc, blended source-over.
pub fn draw_disc<P: PixelFormat>(pixf: &mut P, center: Point, radius: f32, color: &Rgba8) {
    if pixf.width() == 0 || pixf.height() == 0 || !(center.x.is_finite() && center.y.is_finite()) {
        return;
    }
    let r = radius.max(0.5);
    let (x1, x2) = pixel_range(center.x - r, center.x + r, pixf.width());
    let (y1, y2) = pixel_range(center.y - r, center.y + r, pixf.height());
    for y in y1..=y2 {
        for x in x1..=x2 {
            let dist = center.distance(Point::new(x as f32 + 0.5, y as f32 + 0.5));
            let cover = coverage((dist - r + 0.5).max(0.0));
            if cover > 0.0 {
                pixf.blend_pixel(x, y, color, cover);
            }
        }
    }
}

// ============================================================================
// Cap placement
// ============================================================================

/// Where line caps are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapPlacement {
    /// Both ends of every segment, including every flattened curve sample.
    #[default]
    EverySegment,
    /// Only the two ends of each open subpath.
    SubpathEnds,
}

// ============================================================================
// RendererOutlineAa
// ============================================================================

/// Strokes polylines onto a pixel format.
pub struct RendererOutlineAa<'a, P: PixelFormat> {
    pixf: &'a mut P,
    color: Rgba8,
    width: f32,
    line_cap: LineCap,
    line_join: LineJoin,
    cap_placement: CapPlacement,
}

impl<'a, P: PixelFormat> RendererOutlineAa<'a, P> {
    pub fn new(pixf: &'a mut P) -> Self {
        Self {
            pixf,
            color: Rgba8::BLACK,
            width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            cap_placement: CapPlacement::default(),
        }
    }

    pub fn set_color(&mut self, c: Rgba8) {
        self.color = c;
    }

    pub fn color(&self) -> &Rgba8 {
        &self.color
    }

    /// Stroke width in device pixels.
    pub fn set_width(&mut self, w: f32) {
        self.width = w;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    pub fn set_cap_placement(&mut self, placement: CapPlacement) {
        self.cap_placement = placement;
    }

    /// One segment with optional square extensions at either end, then
    /// round caps where requested.
    fn segment(&mut self, p1: Point, p2: Point, cap_start: bool, cap_end: bool) {
        let hw = half_width(self.width);
        let (mut a, mut b) = (p1, p2);
        if self.line_cap == LineCap::Square {
            if let Some(dir) = calc_direction(p1.x, p1.y, p2.x, p2.y) {
                if cap_start {
                    a = a - dir * hw;
                }
                if cap_end {
                    b = b + dir * hw;
                }
            }
        }
        draw_line(&mut *self.pixf, a, b, self.width, &self.color);
        if self.line_cap == LineCap::Round {
            if cap_start {
                draw_disc(&mut *self.pixf, p1, hw, &self.color);
            }
            if cap_end {
                draw_disc(&mut *self.pixf, p2, hw, &self.color);
            }
        }
    }

    /// Stroke one flattened subpath.
    pub fn stroke_subpath(&mut self, subpath: &Subpath) {
        let pts = &subpath.points;
        let hw = half_width(self.width);
        if pts.is_empty() {
            return;
        }
        // A lone point or a path that never moves only shows as a round dot.
        let moves = pts.windows(2).any(|w| !w[0].approx_eq(w[1]));
        if !moves {
            if self.line_cap == LineCap::Round {
                draw_disc(&mut *self.pixf, pts[0], hw, &self.color);
            }
            return;
        }

        let last = pts.len() - 2;
        for (i, w) in pts.windows(2).enumerate() {
            let (cap_start, cap_end) = match self.cap_placement {
                CapPlacement::EverySegment => (true, true),
                CapPlacement::SubpathEnds if subpath.closed => (false, false),
                CapPlacement::SubpathEnds => (i == 0, i == last),
            };
            if w[0].approx_eq(w[1]) {
                if self.line_cap == LineCap::Round && (cap_start || cap_end) {
                    draw_disc(&mut *self.pixf, w[0], hw, &self.color);
                }
                continue;
            }
            self.segment(w[0], w[1], cap_start, cap_end);
        }

        if self.cap_placement == CapPlacement::SubpathEnds && self.line_join == LineJoin::Round {
            let interior = if subpath.closed {
                &pts[..pts.len() - 1]
            } else {
                &pts[1..pts.len() - 1]
            };
            for p in interior {
                draw_disc(&mut *self.pixf, *p, hw, &self.color);
            }
        }
    }

    /// Stroke every subpath of a command stream.
    pub fn stroke_path(&mut self, commands: &[PathCommand], ctx: &RasterContext) {
        for subpath in build_subpaths(commands, ctx) {
            self.stroke_subpath(&subpath);
        }
    }
}

/// Stroke a command stream in one call.
#[allow(clippy::too_many_arguments)]
pub fn stroke_path<P: PixelFormat>(
    pixf: &mut P,
    commands: &[PathCommand],
    ctx: &RasterContext,
    color: Rgba8,
    width: f32,
    cap: LineCap,
    join: LineJoin,
    placement: CapPlacement,
) {
    let mut ren = RendererOutlineAa::new(pixf);
    ren.set_color(color);
    ren.set_width(width);
    ren.set_line_cap(cap);
    ren.set_line_join(join);
    ren.set_cap_placement(placement);
    ren.stroke_path(commands, ctx);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_storage::parse_path_data;
    use crate::rendering_buffer::RasterizedImage;

    fn alpha(img: &RasterizedImage, x: i32, y: i32) -> u8 {
        img.pixel(x, y).map_or(0, |p| p.a)
    }

    #[test]
    fn test_coverage_profile() {
        assert_eq!(coverage(0.0), 1.0);
        assert_eq!(coverage(0.5), 1.0);
        assert!((coverage(0.75) - 0.5).abs() < 1e-6);
        assert_eq!(coverage(1.0), 0.0);
        assert_eq!(coverage(3.0), 0.0);
        let mut prev = coverage(0.0);
        for i in 1..=40 {
            let c = coverage(i as f32 * 0.05);
            assert!(c <= prev);
            prev = c;
        }
    }

    #[test]
    fn test_horizontal_line() {
        let mut img = RasterizedImage::new(20, 10);
        draw_line(&mut img, Point::new(2.0, 5.0), Point::new(18.0, 5.0), 1.0, &Rgba8::BLACK);
        // Pixel centers at y=4.5 and y=5.5 are half a pixel from the line.
        assert_eq!(alpha(&img, 10, 4), 255);
        assert_eq!(alpha(&img, 10, 5), 255);
        assert_eq!(alpha(&img, 10, 3), 0);
        assert_eq!(alpha(&img, 10, 7), 0);
    }

    #[test]
    fn test_wide_line() {
        let mut img = RasterizedImage::new(20, 20);
        draw_line(&mut img, Point::new(2.0, 10.0), Point::new(18.0, 10.0), 6.0, &Rgba8::BLACK);
        for y in 7..13 {
            assert_eq!(alpha(&img, 10, y), 255, "row {}", y);
        }
        assert_eq!(alpha(&img, 10, 14), 0);
    }

    #[test]
    fn test_zero_length_line_draws_nothing() {
        let mut img = RasterizedImage::new(10, 10);
        draw_line(&mut img, Point::new(5.0, 5.0), Point::new(5.0, 5.0), 2.0, &Rgba8::BLACK);
        assert!(img.is_blank());
    }

    #[test]
    fn test_line_clipped() {
        let mut img = RasterizedImage::new(10, 10);
        draw_line(&mut img, Point::new(-50.0, 5.0), Point::new(50.0, 5.0), 3.0, &Rgba8::BLACK);
        assert_eq!(alpha(&img, 0, 5), 255);
        assert_eq!(alpha(&img, 9, 5), 255);
    }

    #[test]
    fn test_disc() {
        let mut img = RasterizedImage::new(20, 20);
        draw_disc(&mut img, Point::new(10.0, 10.0), 4.0, &Rgba8::BLACK);
        assert_eq!(alpha(&img, 10, 10), 255);
        assert_eq!(alpha(&img, 0, 0), 0);
        assert_eq!(alpha(&img, 10, 16), 0);
    }

    #[test]
    fn test_caps() {
        let cmds = parse_path_data("M5 10 L15 10");
        let ctx = RasterContext::new_identity(20, 20);
        let render = |cap: LineCap| {
            let mut img = RasterizedImage::new(20, 20);
            stroke_path(&mut img, &cmds, &ctx, Rgba8::BLACK, 4.0, cap, LineJoin::Miter, CapPlacement::EverySegment);
            img
        };
        let butt = render(LineCap::Butt);
        let square = render(LineCap::Square);
        let round = render(LineCap::Round);
        // Only the square cap reaches half a width past the end point.
        assert_eq!(alpha(&butt, 18, 10), 0);
        assert_eq!(alpha(&square, 18, 10), 255);
        assert!(alpha(&round, 16, 10) > 0);
        // Square corner: round cap leaves it, square cap covers it.
        assert_eq!(alpha(&square, 17, 8), 255);
        assert_eq!(alpha(&round, 17, 8), 0);
    }

    #[test]
    fn test_round_cap_dot_for_zero_length() {
        let cmds = parse_path_data("M10 10 L10 10");
        let ctx = RasterContext::new_identity(20, 20);
        let mut img = RasterizedImage::new(20, 20);
        stroke_path(&mut img, &cmds, &ctx, Rgba8::BLACK, 4.0, LineCap::Round, LineJoin::Miter, CapPlacement::EverySegment);
        assert!(alpha(&img, 10, 10) > 0);

        let mut img = RasterizedImage::new(20, 20);
        stroke_path(&mut img, &cmds, &ctx, Rgba8::BLACK, 4.0, LineCap::Butt, LineJoin::Miter, CapPlacement::EverySegment);
        assert!(img.is_blank());
    }

    #[test]
    fn test_subpath_ends_placement() {
        let cmds = parse_path_data("M2 10 L10 10 L10 2");
        let ctx = RasterContext::new_identity(20, 20);
        let mut every = RasterizedImage::new(20, 20);
        let mut ends = RasterizedImage::new(20, 20);
        stroke_path(&mut every, &cmds, &ctx, Rgba8::BLACK, 4.0, LineCap::Square, LineJoin::Miter, CapPlacement::EverySegment);
        stroke_path(&mut ends, &cmds, &ctx, Rgba8::BLACK, 4.0, LineCap::Square, LineJoin::Miter, CapPlacement::SubpathEnds);
        // The first segment's end extends past the corner only per segment.
        assert_eq!(alpha(&every, 12, 11), 255);
        assert_eq!(alpha(&ends, 12, 11), 0);
        // Open ends are capped in both modes.
        assert_eq!(alpha(&ends, 0, 10), 255);
    }

    #[test]
    fn test_round_join_only_with_subpath_ends() {
        let cmds = parse_path_data("M2 10 L10 10 L10 2");
        let ctx = RasterContext::new_identity(20, 20);
        let color = Rgba8::new(0, 0, 0, 100);
        let render = |join: LineJoin, placement: CapPlacement| {
            let mut img = RasterizedImage::new(20, 20);
            stroke_path(&mut img, &cmds, &ctx, color, 6.0, LineCap::Butt, join, placement);
            alpha(&img, 10, 10)
        };
        // The join disc adds one more blend at the shared vertex.
        let with_join = render(LineJoin::Round, CapPlacement::SubpathEnds);
        let without = render(LineJoin::Miter, CapPlacement::SubpathEnds);
        assert!(with_join > without);
        assert_eq!(render(LineJoin::Round, CapPlacement::EverySegment), without);
    }
}
