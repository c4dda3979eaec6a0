//! Geometric math utilities.
//!
//! Distances between points and segments, and the orthogonal offset used to
//! build stroke quads.

use crate::basics::Point;

// ============================================================================
// Constants
// ============================================================================

/// Segments shorter than this are treated as a single point.
pub const VERTEX_DIST_EPSILON: f32 = 1e-6;

// ============================================================================
// Distance calculations
// ============================================================================

/// Euclidean distance between two points.
#[inline]
pub fn calc_distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Squared Euclidean distance between two points.
#[inline]
pub fn calc_sq_distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    dx * dx + dy * dy
}

/// Parameter `u` of the projection of (x, y) onto the line through
/// (x1,y1)→(x2,y2). `u = 0` at the first point, `u = 1` at the second.
///
/// Degenerate segments project everything onto their first point.
#[inline]
pub fn calc_segment_point_u(x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) -> f32 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let len_sq = dx * dx + dy * dy;
    if len_sq < VERTEX_DIST_EPSILON {
        return 0.0;
    }
    ((x - x1) * dx + (y - y1) * dy) / len_sq
}

/// Distance from (x, y) to the closest point on segment (x1,y1)→(x2,y2).
///
/// The projection parameter is clamped to `[0, 1]`.
#[inline]
pub fn calc_segment_point_distance(x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) -> f32 {
    let u = calc_segment_point_u(x1, y1, x2, y2, x, y).clamp(0.0, 1.0);
    calc_sq_distance(x, y, x1 + u * (x2 - x1), y1 + u * (y2 - y1)).sqrt()
}

/// Offset vector of length `thickness` perpendicular to (x1,y1)→(x2,y2).
///
/// Returns `None` for zero-length segments.
#[inline]
pub fn calc_orthogonal(thickness: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> Option<Point> {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let d = (dx * dx + dy * dy).sqrt();
    if d < VERTEX_DIST_EPSILON {
        return None;
    }
    Some(Point::new(-dy * thickness / d, dx * thickness / d))
}

/// Unit direction vector of (x1,y1)→(x2,y2), `None` for zero-length segments.
#[inline]
pub fn calc_direction(x1: f32, y1: f32, x2: f32, y2: f32) -> Option<Point> {
    let d = calc_distance(x1, y1, x2, y2);
    if d < VERTEX_DIST_EPSILON {
        return None;
    }
    Some(Point::new((x2 - x1) / d, (y2 - y1) / d))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_distance() {
        assert!((calc_distance(0.0, 0.0, 3.0, 4.0) - 5.0).abs() < 1e-6);
        assert!((calc_sq_distance(0.0, 0.0, 3.0, 4.0) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_segment_point_u() {
        assert!((calc_segment_point_u(0.0, 0.0, 10.0, 0.0, 5.0, 3.0) - 0.5).abs() < 1e-6);
        assert!(calc_segment_point_u(0.0, 0.0, 10.0, 0.0, -5.0, 0.0) < 0.0);
        assert_eq!(calc_segment_point_u(1.0, 1.0, 1.0, 1.0, 4.0, 4.0), 0.0);
    }

    #[test]
    fn test_segment_point_distance_clamped() {
        // Perpendicular foot inside the segment.
        assert!((calc_segment_point_distance(0.0, 0.0, 10.0, 0.0, 5.0, 2.0) - 2.0).abs() < 1e-6);
        // Beyond the end: distance to the endpoint.
        assert!(
            (calc_segment_point_distance(0.0, 0.0, 10.0, 0.0, 13.0, 4.0) - 5.0).abs() < 1e-5
        );
    }

    #[test]
    fn test_calc_orthogonal() {
        let o = calc_orthogonal(2.0, 0.0, 0.0, 10.0, 0.0).unwrap();
        assert!(o.x.abs() < 1e-6);
        assert!((o.y - 2.0).abs() < 1e-6);
        assert!(calc_orthogonal(2.0, 1.0, 1.0, 1.0, 1.0).is_none());
    }

    #[test]
    fn test_calc_direction() {
        let d = calc_direction(0.0, 0.0, 0.0, 5.0).unwrap();
        assert!(d.x.abs() < 1e-6);
        assert!((d.y - 1.0).abs() < 1e-6);
    }
}
