//! Cubic Bezier flattening.
//!
//! Curves are sampled at uniform parameter steps. The number of steps
//! adapts to an arc length estimate so long or strongly bent segments get
//! more vertices while the small curves typical of icons stay cheap.
//!
//! The estimate is the mean of the chord length and the control polygon
//! length; the true arc length always lies between the two.

use crate::basics::Point;

// ============================================================================
// Constants
// ============================================================================

/// Samples per unit of estimated length.
pub const CURVE_SAMPLE_DENSITY: f32 = 0.5;
/// Fewest segments an adaptively flattened curve is split into.
pub const CURVE_MIN_SAMPLES: u32 = 4;
/// Most segments a curve is ever split into.
pub const CURVE_MAX_SAMPLES: u32 = 100;

// ============================================================================
// Curve4Points
// ============================================================================

/// Four control points of a cubic Bezier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve4Points {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl Curve4Points {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the curve at `t` using the Bernstein basis.
    #[inline]
    pub fn point_at(&self, t: f32) -> Point {
        let mt = 1.0 - t;
        let b0 = mt * mt * mt;
        let b1 = 3.0 * mt * mt * t;
        let b2 = 3.0 * mt * t * t;
        let b3 = t * t * t;
        Point::new(
            b0 * self.p0.x + b1 * self.p1.x + b2 * self.p2.x + b3 * self.p3.x,
            b0 * self.p0.y + b1 * self.p1.y + b2 * self.p2.y + b3 * self.p3.y,
        )
    }

    /// Mean of the chord length and the control polygon length.
    pub fn estimated_length(&self) -> f32 {
        let chord = self.p0.distance(self.p3);
        let polygon = self.p0.distance(self.p1) + self.p1.distance(self.p2) + self.p2.distance(self.p3);
        (chord + polygon) * 0.5
    }

    /// Flatten into a polyline. See [`flatten_cubic`].
    pub fn flatten(&self, samples: u32) -> Vec<Point> {
        let n = if samples == 0 {
            adaptive_sample_count(self.estimated_length())
        } else {
            samples.min(CURVE_MAX_SAMPLES)
        };
        if n < 2 {
            return vec![self.p0, self.p3];
        }
        let mut points = Vec::with_capacity(n as usize + 1);
        points.push(self.p0);
        for i in 1..n {
            points.push(self.point_at(i as f32 / n as f32));
        }
        points.push(self.p3);
        points
    }
}

// ============================================================================
// Flattening
// ============================================================================

/// Number of segments for a curve of the given estimated length.
///
/// Returns 0 when the raw count falls below [`CURVE_MIN_SAMPLES`]: such a
/// curve is short enough that its chord is used instead. Otherwise the
/// count is clamped to `[CURVE_MIN_SAMPLES, CURVE_MAX_SAMPLES]`.
pub fn adaptive_sample_count(estimated_length: f32) -> u32 {
    if !estimated_length.is_finite() {
        return 0;
    }
    let raw = (estimated_length * CURVE_SAMPLE_DENSITY).floor().max(0.0) as u32;
    if raw < CURVE_MIN_SAMPLES {
        return 0;
    }
    raw.clamp(CURVE_MIN_SAMPLES, CURVE_MAX_SAMPLES)
}

/// Flatten a cubic Bezier curve into a polyline.
///
/// `samples == 0` selects the adaptive count. The result starts exactly at
/// `p0`, ends exactly at `p3` and holds between 2 and 101 points.
pub fn flatten_cubic(p0: Point, p1: Point, p2: Point, p3: Point, samples: u32) -> Vec<Point> {
    Curve4Points::new(p0, p1, p2, p3).flatten(samples)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(c: [f32; 8]) -> (Point, Point, Point, Point) {
        (
            Point::new(c[0], c[1]),
            Point::new(c[2], c[3]),
            Point::new(c[4], c[5]),
            Point::new(c[6], c[7]),
        )
    }

    #[test]
    fn test_endpoints_exact() {
        let (a, b, c, d) = pts([0.0, 0.0, 10.0, 40.0, 50.0, 40.0, 60.0, 0.0]);
        let out = flatten_cubic(a, b, c, d, 0);
        assert_eq!(out[0], a);
        assert_eq!(*out.last().unwrap(), d);
    }

    #[test]
    fn test_short_curve_is_chord() {
        let (a, b, c, d) = pts([0.0, 0.0, 1.0, 1.0, 2.0, 1.0, 3.0, 0.0]);
        let out = flatten_cubic(a, b, c, d, 0);
        assert_eq!(out, vec![a, d]);
    }

    #[test]
    fn test_explicit_single_sample_is_chord() {
        let (a, b, c, d) = pts([0.0, 0.0, 100.0, 100.0, 200.0, 100.0, 300.0, 0.0]);
        assert_eq!(flatten_cubic(a, b, c, d, 1).len(), 2);
    }

    #[test]
    fn test_explicit_sample_count() {
        let (a, b, c, d) = pts([0.0, 0.0, 10.0, 10.0, 20.0, 10.0, 30.0, 0.0]);
        assert_eq!(flatten_cubic(a, b, c, d, 8).len(), 9);
    }

    #[test]
    fn test_adaptive_bounds() {
        let cases: [[f32; 8]; 5] = [
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 2.0, 5.0, 6.0, 5.0, 8.0, 0.0],
            [0.0, 0.0, 10.0, 40.0, 50.0, 40.0, 60.0, 0.0],
            [0.0, 0.0, 500.0, 900.0, -400.0, 800.0, 1000.0, 0.0],
            [-1e4, -1e4, 1e4, 1e4, -1e4, 1e4, 1e4, -1e4],
        ];
        for c in cases {
            let (a, b, cc, d) = pts(c);
            let n = flatten_cubic(a, b, cc, d, 0).len();
            assert!((2..=101).contains(&n), "got {} points", n);
        }
    }

    #[test]
    fn test_adaptive_sample_count() {
        assert_eq!(adaptive_sample_count(0.0), 0);
        assert_eq!(adaptive_sample_count(7.9), 0);
        assert_eq!(adaptive_sample_count(8.0), 4);
        assert_eq!(adaptive_sample_count(40.0), 20);
        assert_eq!(adaptive_sample_count(1e6), 100);
        assert_eq!(adaptive_sample_count(f32::NAN), 0);
    }

    #[test]
    fn test_estimated_length_straight_line() {
        let (a, b, c, d) = pts([0.0, 0.0, 10.0, 0.0, 20.0, 0.0, 30.0, 0.0]);
        let curve = Curve4Points::new(a, b, c, d);
        assert!((curve.estimated_length() - 30.0).abs() < 1e-5);
    }

    #[test]
    fn test_point_at_midpoint() {
        let (a, b, c, d) = pts([0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 0.0]);
        let mid = Curve4Points::new(a, b, c, d).point_at(0.5);
        assert!((mid.x - 5.0).abs() < 1e-5);
        assert!((mid.y - 7.5).abs() < 1e-5);
    }

    #[test]
    fn test_samples_monotonic_for_straight_curve() {
        let (a, b, c, d) = pts([0.0, 0.0, 10.0, 0.0, 20.0, 0.0, 30.0, 0.0]);
        let out = flatten_cubic(a, b, c, d, 0);
        for w in out.windows(2) {
            assert!(w[1].x >= w[0].x);
        }
    }
}
