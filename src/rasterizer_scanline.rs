//! Scanline polygon rasterizer.
//!
//! Aliased fill of closed polygons in device pixels. Each scanline is
//! sampled at its integer y coordinate. Edges are half-open in y
//! (`[min_y, max_y)`) so a vertex shared by two edges is counted once.
//!
//! A pixel `x` on scanline `y` is inside a span `[xa, xb)` when
//! `ceil(xa) <= x < ceil(xb)`. Spans are copied opaquely; coverage-based
//! blending is left to the stroker.
//!
//! All subpaths added before [`RasterizerScanline::render`] are treated as
//! one shape, so holes work with both filling rules.

use crate::basics::{Edge, FillingRule, Point, ScanlineIntersection};
use crate::color::Rgba8;
use crate::pixfmt_rgba::PixelFormat;

// ============================================================================
// RasterizerScanline
// ============================================================================

/// Edge list accumulator and scanline sweeper.
#[derive(Debug, Clone)]
pub struct RasterizerScanline {
    edges: Vec<Edge>,
    filling_rule: FillingRule,
    min_y: f32,
    max_y: f32,
    // Reused per scanline
    crossings: Vec<ScanlineIntersection>,
}

impl RasterizerScanline {
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            filling_rule: FillingRule::default(),
            min_y: f32::MAX,
            max_y: f32::MIN,
            crossings: Vec::new(),
        }
    }

    /// Remove all edges (keeps allocated memory).
    pub fn reset(&mut self) {
        self.edges.clear();
        self.min_y = f32::MAX;
        self.max_y = f32::MIN;
    }

    pub fn filling_rule(&mut self, rule: FillingRule) {
        self.filling_rule = rule;
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Add one closed polygon. The last vertex connects back to the first.
    /// Polygons with fewer than three vertices are ignored.
    pub fn add_polygon(&mut self, polygon: &[Point]) {
        if polygon.len() < 3 {
            return;
        }
        let n = polygon.len();
        for i in 0..n {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            if !(a.y.is_finite() && b.y.is_finite() && a.x.is_finite() && b.x.is_finite()) {
                continue;
            }
            if let Some(edge) = Edge::from_points(a, b) {
                self.min_y = self.min_y.min(edge.y1.min(edge.y2));
                self.max_y = self.max_y.max(edge.y1.max(edge.y2));
                self.edges.push(edge);
            }
        }
    }

    /// Sweep every scanline of the accumulated shape and copy its spans
    /// into `pixf` with `color`.
    pub fn render<P: PixelFormat>(&mut self, pixf: &mut P, color: &Rgba8) {
        let (width, height) = (pixf.width(), pixf.height());
        if self.edges.is_empty() || width == 0 || height == 0 {
            return;
        }
        let y_start = self.min_y.floor().max(0.0) as i32;
        let y_end = (self.max_y.ceil() as i64).min(height as i64 - 1) as i32;

        for y in y_start..=y_end {
            self.sweep_scanline(y as f32);
            for (xa, xb) in spans(&self.crossings, self.filling_rule) {
                let x1 = (xa.ceil() as i64).max(0);
                let x2 = (xb.ceil() as i64).min(width as i64);
                if x1 < x2 {
                    pixf.copy_hline(x1 as i32, y, (x2 - x1) as u32, color);
                }
            }
        }
    }

    /// Collect and sort the crossings of scanline `y`.
    fn sweep_scanline(&mut self, y: f32) {
        self.crossings.clear();
        self.crossings
            .extend(self.edges.iter().filter(|e| e.spans(y)).map(|e| e.intersect(y)));
        self.crossings.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
}

impl Default for RasterizerScanline {
    fn default() -> Self {
        Self::new()
    }
}

/// Inside spans of one sorted scanline.
fn spans(crossings: &[ScanlineIntersection], rule: FillingRule) -> Vec<(f32, f32)> {
    let mut out = Vec::new();
    match rule {
        FillingRule::EvenOdd => {
            for pair in crossings.chunks_exact(2) {
                out.push((pair[0].x, pair[1].x));
            }
        }
        FillingRule::NonZero => {
            let mut winding = 0;
            let mut span_start = 0.0;
            for c in crossings {
                let was_inside = winding != 0;
                winding += c.winding;
                if !was_inside && winding != 0 {
                    span_start = c.x;
                } else if was_inside && winding == 0 {
                    out.push((span_start, c.x));
                }
            }
        }
    }
    out
}

// ============================================================================
// Convenience functions
// ============================================================================

/// Fill one polygon.
pub fn fill_polygon<P: PixelFormat>(
    pixf: &mut P,
    polygon: &[Point],
    color: &Rgba8,
    rule: FillingRule,
) {
    let mut ras = RasterizerScanline::new();
    ras.filling_rule(rule);
    ras.add_polygon(polygon);
    ras.render(pixf, color);
}

/// Fill all subpaths of a path as a single shape.
pub fn fill_polygons<P: PixelFormat>(
    pixf: &mut P,
    polygons: &[Vec<Point>],
    color: &Rgba8,
    rule: FillingRule,
) {
    let mut ras = RasterizerScanline::new();
    ras.filling_rule(rule);
    for poly in polygons {
        ras.add_polygon(poly);
    }
    ras.render(pixf, color);
}

// ============================================================================
// Tests
// ============================================================================
