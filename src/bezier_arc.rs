//! Elliptical arc to cubic Bezier conversion.
//!
//! SVG arcs use endpoint parameterisation (radii, x-axis rotation, the
//! large-arc and sweep flags). They are converted to center
//! parameterisation and then approximated by at most four cubic curves,
//! one per quarter turn, which the builder flattens like any other cubic.

use crate::basics::Point;
use crate::curves::Curve4Points;
use std::f64::consts::PI;

/// Sweeps closer than this to a quarter turn boundary are not split again.
const BEZIER_ARC_ANGLE_EPSILON: f64 = 0.01;

/// Approximate an arc segment of at most a quarter turn with one cubic.
///
/// `(cx, cy)` is the center, angles are in radians.
pub fn arc_to_bezier(
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    start_angle: f64,
    sweep_angle: f64,
) -> [(f64, f64); 4] {
    let x0 = (sweep_angle / 2.0).cos();
    let y0 = (sweep_angle / 2.0).sin();
    let tx = (1.0 - x0) * 4.0 / 3.0;
    let ty = y0 - tx * x0 / y0;

    let px = [x0, x0 + tx, x0 + tx, x0];
    let py = [-y0, -ty, ty, y0];

    let sn = (start_angle + sweep_angle / 2.0).sin();
    let cs = (start_angle + sweep_angle / 2.0).cos();

    let mut out = [(0.0, 0.0); 4];
    for i in 0..4 {
        out[i] = (
            cx + rx * (px[i] * cs - py[i] * sn),
            cy + ry * (px[i] * sn + py[i] * cs),
        );
    }
    out
}

/// Result of converting one SVG arc command.
#[derive(Debug, Clone, PartialEq)]
pub enum ArcSegments {
    /// Endpoints coincide: the arc is omitted entirely.
    Omitted,
    /// A zero radius: the arc degenerates to a straight line to the end.
    Line,
    /// Cubic curves approximating the arc, in order.
    Curves(Vec<Curve4Points>),
}

/// Convert an SVG arc from `from` to `to` into cubic Bezier curves.
///
/// `x_axis_rotation` is in degrees. Radii that are too small to span the
/// endpoints are scaled up uniformly, as SVG requires.
pub fn svg_arc_to_curves(
    from: Point,
    rx: f32,
    ry: f32,
    x_axis_rotation: f32,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> ArcSegments {
    if from.approx_eq(to) {
        return ArcSegments::Omitted;
    }
    let mut rx = (rx as f64).abs();
    let mut ry = (ry as f64).abs();
    if rx < 1e-9 || ry < 1e-9 {
        return ArcSegments::Line;
    }

    let (x0, y0) = (from.x as f64, from.y as f64);
    let (x2, y2) = (to.x as f64, to.y as f64);
    let angle = (x_axis_rotation as f64).to_radians();

    // Midpoint, rotated into the ellipse's frame
    let dx2 = (x0 - x2) / 2.0;
    let dy2 = (y0 - y2) / 2.0;
    let (sin_a, cos_a) = angle.sin_cos();
    let x1 = cos_a * dx2 + sin_a * dy2;
    let y1 = -sin_a * dx2 + cos_a * dy2;

    // Ensure radii are large enough
    let px1 = x1 * x1;
    let py1 = y1 * y1;
    let radii_check = px1 / (rx * rx) + py1 / (ry * ry);
    if radii_check > 1.0 {
        rx *= radii_check.sqrt();
        ry *= radii_check.sqrt();
    }
    let prx = rx * rx;
    let pry = ry * ry;

    // Center
    let sign = if large_arc == sweep { -1.0 } else { 1.0 };
    let sq = (prx * pry - prx * py1 - pry * px1) / (prx * py1 + pry * px1);
    let coef = sign * sq.max(0.0).sqrt();
    let cx1 = coef * ((rx * y1) / ry);
    let cy1 = coef * -((ry * x1) / rx);

    let cx = (x0 + x2) / 2.0 + (cos_a * cx1 - sin_a * cy1);
    let cy = (y0 + y2) / 2.0 + (sin_a * cx1 + cos_a * cy1);

    // Start and sweep angles
    let ux = (x1 - cx1) / rx;
    let uy = (y1 - cy1) / ry;
    let vx = (-x1 - cx1) / rx;
    let vy = (-y1 - cy1) / ry;

    let n = (ux * ux + uy * uy).sqrt();
    let sign = if uy < 0.0 { -1.0 } else { 1.0 };
    let start_angle = sign * (ux / n).clamp(-1.0, 1.0).acos();

    let n = ((ux * ux + uy * uy) * (vx * vx + vy * vy)).sqrt();
    let p = ux * vx + uy * vy;
    let sign = if ux * vy - uy * vx < 0.0 { -1.0 } else { 1.0 };
    let mut sweep_angle = sign * (p / n).clamp(-1.0, 1.0).acos();
    if !sweep && sweep_angle > 0.0 {
        sweep_angle -= PI * 2.0;
    } else if sweep && sweep_angle < 0.0 {
        sweep_angle += PI * 2.0;
    }

    // Split into quarter turns, each mapped back through rotation + center
    let to_world = |(x, y): (f64, f64)| {
        Point::new(
            (cx + x * cos_a - y * sin_a) as f32,
            (cy + x * sin_a + y * cos_a) as f32,
        )
    };
    let mut curves = Vec::with_capacity(4);
    let mut start = start_angle;
    let mut total_sweep = 0.0;
    loop {
        let prev_sweep = total_sweep;
        let step = if sweep_angle < 0.0 { -PI * 0.5 } else { PI * 0.5 };
        total_sweep += step;
        let done = if sweep_angle < 0.0 {
            total_sweep <= sweep_angle + BEZIER_ARC_ANGLE_EPSILON
        } else {
            total_sweep >= sweep_angle - BEZIER_ARC_ANGLE_EPSILON
        };
        let local_sweep = if done { sweep_angle - prev_sweep } else { step };

        let c = arc_to_bezier(0.0, 0.0, rx, ry, start, local_sweep);
        curves.push(Curve4Points::new(
            to_world(c[0]),
            to_world(c[1]),
            to_world(c[2]),
            to_world(c[3]),
        ));
        start += local_sweep;
        if done || curves.len() >= 4 {
            break;
        }
    }

    // Ensure exact start and end points
    if let Some(first) = curves.first_mut() {
        first.p0 = from;
    }
    if let Some(last) = curves.last_mut() {
        last.p3 = to;
    }
    ArcSegments::Curves(curves)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn curves(seg: ArcSegments) -> Vec<Curve4Points> {
        match seg {
            ArcSegments::Curves(c) => c,
            other => panic!("expected curves, got {:?}", other),
        }
    }

    #[test]
    fn test_arc_to_bezier_quarter() {
        let c = arc_to_bezier(0.0, 0.0, 10.0, 10.0, 0.0, PI / 2.0);
        assert!((c[0].0 - 10.0).abs() < 1e-9);
        assert!(c[0].1.abs() < 1e-9);
        assert!(c[3].0.abs() < 1e-9);
        assert!((c[3].1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_half_circle_two_curves() {
        let segs = curves(svg_arc_to_curves(
            Point::new(0.0, 10.0),
            10.0,
            10.0,
            0.0,
            true,
            false,
            Point::new(20.0, 10.0),
        ));
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].p0, Point::new(0.0, 10.0));
        assert_eq!(segs[1].p3, Point::new(20.0, 10.0));
    }

    #[test]
    fn test_sweep_flag_picks_side() {
        let from = Point::new(0.0, 10.0);
        let to = Point::new(20.0, 10.0);
        let up = curves(svg_arc_to_curves(from, 10.0, 10.0, 0.0, false, true, to));
        let down = curves(svg_arc_to_curves(from, 10.0, 10.0, 0.0, false, false, to));
        let mid_up = up[0].p3;
        let mid_down = down[0].p3;
        // One half goes through y=0, the other through y=20.
        assert!((mid_up.y - mid_down.y).abs() > 15.0);
    }

    #[test]
    fn test_points_stay_on_circle() {
        let segs = curves(svg_arc_to_curves(
            Point::new(10.0, 0.0),
            10.0,
            10.0,
            0.0,
            false,
            true,
            Point::new(0.0, 10.0),
        ));
        for c in &segs {
            for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
                let p = c.point_at(t);
                let r = p.length();
                assert!((r - 10.0).abs() < 0.05, "radius {} at t={}", r, t);
            }
        }
    }

    #[test]
    fn test_radii_scaled_up() {
        let segs = curves(svg_arc_to_curves(
            Point::new(0.0, 0.0),
            1.0,
            1.0,
            0.0,
            false,
            true,
            Point::new(20.0, 0.0),
        ));
        assert_eq!(segs.last().unwrap().p3, Point::new(20.0, 0.0));
    }

    #[test]
    fn test_degenerate_cases() {
        let p = Point::new(3.0, 3.0);
        assert_eq!(
            svg_arc_to_curves(p, 5.0, 5.0, 0.0, false, true, p),
            ArcSegments::Omitted
        );
        assert_eq!(
            svg_arc_to_curves(p, 0.0, 5.0, 0.0, false, true, Point::new(9.0, 9.0)),
            ArcSegments::Line
        );
    }
}
