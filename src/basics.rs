//! Foundation types shared by every stage of the pipeline.
//!
//! Points, polygon edges, scanline crossings, the filling rule and the
//! stroke cap/join enums. Everything here is a plain `Copy` value with no
//! dependencies on the rest of the crate.

use core::ops::{Add, Mul, Sub};

// ============================================================================
// Constants
// ============================================================================

pub const PI: f32 = std::f32::consts::PI;

/// Edges whose vertical extent is below this produce no scanline crossings.
pub const HORIZONTAL_EDGE_EPSILON: f32 = 0.001;

/// Convert degrees to radians.
#[inline]
pub fn deg2rad(deg: f32) -> f32 {
    deg * PI / 180.0
}

// ============================================================================
// Point
// ============================================================================

/// A 2D point.
///
/// Used for user-space path operands as well as device pixel coordinates
/// once a [`RasterContext`](crate::trans_viewport::RasterContext) has mapped
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Length of the vector from the origin to this point.
    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: Point) -> f32 {
        (other - *self).length()
    }

    /// Approximate equality used when deciding whether a subpath is closed.
    #[inline]
    pub fn approx_eq(&self, other: Point) -> bool {
        (self.x - other.x).abs() < 1e-4 && (self.y - other.y).abs() < 1e-4
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

// ============================================================================
// Edge
// ============================================================================

/// One non-horizontal segment of a polygon boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Edge {
    /// Build an edge from two vertices, or `None` if it is (nearly) horizontal.
    pub fn from_points(a: Point, b: Point) -> Option<Self> {
        if (a.y - b.y).abs() < HORIZONTAL_EDGE_EPSILON {
            return None;
        }
        Some(Self {
            x1: a.x,
            y1: a.y,
            x2: b.x,
            y2: b.y,
        })
    }

    /// +1 for edges going down the image, -1 for edges going up.
    #[inline]
    pub fn winding(&self) -> i32 {
        if self.y2 > self.y1 {
            1
        } else {
            -1
        }
    }

    /// Returns `true` if `y` lies in the half-open range `[min_y, max_y)`.
    #[inline]
    pub fn spans(&self, y: f32) -> bool {
        let (lo, hi) = if self.y1 < self.y2 {
            (self.y1, self.y2)
        } else {
            (self.y2, self.y1)
        };
        y >= lo && y < hi
    }

    /// The crossing of this edge with the horizontal line at `y`.
    #[inline]
    pub fn intersect(&self, y: f32) -> ScanlineIntersection {
        let t = (y - self.y1) / (self.y2 - self.y1);
        ScanlineIntersection {
            x: self.x1 + t * (self.x2 - self.x1),
            winding: self.winding(),
        }
    }
}

/// One crossing of a horizontal scanline with an [`Edge`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanlineIntersection {
    pub x: f32,
    pub winding: i32,
}

// ============================================================================
// Filling rule, caps and joins
// ============================================================================

/// Filling rule for polygon rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillingRule {
    NonZero,
    #[default]
    EvenOdd,
}

/// Stroke end cap style (`stroke-linecap`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Stroke corner style (`stroke-linejoin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deg2rad() {
        assert!((deg2rad(180.0) - PI).abs() < 1e-6);
        assert!((deg2rad(90.0) - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_ops() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(a + b, Point::new(5.0, 8.0));
        assert_eq!(b - a, Point::new(3.0, 4.0));
        assert_eq!(a * 2.0, Point::new(2.0, 4.0));
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_horizontal_edge_rejected() {
        let e = Edge::from_points(Point::new(0.0, 5.0), Point::new(10.0, 5.0005));
        assert!(e.is_none());
    }

    #[test]
    fn test_edge_winding() {
        let down = Edge::from_points(Point::new(0.0, 0.0), Point::new(0.0, 10.0)).unwrap();
        let up = Edge::from_points(Point::new(0.0, 10.0), Point::new(0.0, 0.0)).unwrap();
        assert_eq!(down.winding(), 1);
        assert_eq!(up.winding(), -1);
    }

    #[test]
    fn test_edge_spans_half_open() {
        let e = Edge::from_points(Point::new(0.0, 2.0), Point::new(0.0, 6.0)).unwrap();
        assert!(!e.spans(1.0));
        assert!(e.spans(2.0));
        assert!(e.spans(5.0));
        assert!(!e.spans(6.0));
    }

    #[test]
    fn test_edge_intersect() {
        let e = Edge::from_points(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).unwrap();
        let hit = e.intersect(4.0);
        assert!((hit.x - 4.0).abs() < 1e-6);
        assert_eq!(hit.winding, 1);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(FillingRule::default(), FillingRule::EvenOdd);
        assert_eq!(LineCap::default(), LineCap::Butt);
        assert_eq!(LineJoin::default(), LineJoin::Miter);
    }
}
