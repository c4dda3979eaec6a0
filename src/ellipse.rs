//! Circle and ellipse to path adapters.
//!
//! Both shapes are written as two half-ellipse arcs from the leftmost to
//! the rightmost point and back, then closed.

use std::fmt::Write;

/// Axis-aligned ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
}

impl Ellipse {
    pub fn new(cx: f32, cy: f32, rx: f32, ry: f32) -> Self {
        Self { cx, cy, rx, ry }
    }

    /// Path data, or an empty string when a radius is not positive.
    pub fn to_path_data(&self) -> String {
        let Self { cx, cy, rx, ry } = *self;
        if !(rx > 0.0 && ry > 0.0) {
            return String::new();
        }
        let mut d = String::new();
        let _ = write!(
            d,
            "M{},{} A{},{} 0 1 0 {},{} A{},{} 0 1 0 {},{} Z",
            cx - rx,
            cy,
            rx,
            ry,
            cx + rx,
            cy,
            rx,
            ry,
            cx - rx,
            cy
        );
        d
    }
}

/// Path data for an SVG `<circle>`.
pub fn circle_to_path(cx: f32, cy: f32, r: f32) -> String {
    Ellipse::new(cx, cy, r, r).to_path_data()
}

/// Path data for an SVG `<ellipse>`.
pub fn ellipse_to_path(cx: f32, cy: f32, rx: f32, ry: f32) -> String {
    Ellipse::new(cx, cy, rx, ry).to_path_data()
}

// ============================================================================
// Tests
// ============================================================================
