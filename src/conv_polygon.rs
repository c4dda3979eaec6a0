//! Path to polygon conversion.
//!
//! Walks a [`PathCommand`] stream, resolves relative operands against the
//! pen position, maps every vertex into device pixels and flattens curves.
//! The result is one polyline per subpath, ready for the scanline filler or
//! the stroker.
//!
//! Curves are flattened after mapping so the adaptive sample count follows
//! the on-screen size of the curve rather than its user-space size. The
//! mapping is affine, which keeps mapped control points exact.

use crate::basics::Point;
use crate::bezier_arc::{svg_arc_to_curves, ArcSegments};
use crate::curves::Curve4Points;
use crate::path_storage::{ArcParams, PathCommand};
use crate::trans_viewport::RasterContext;

/// One flattened subpath in device pixels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subpath {
    pub points: Vec<Point>,
    /// Set when the subpath was terminated by a close command.
    pub closed: bool,
}

// ============================================================================
// PolygonBuilder
// ============================================================================

/// Incremental state of one path walk.
struct PolygonBuilder<'a> {
    ctx: &'a RasterContext,
    /// Pen position in user space.
    pen: Point,
    /// User-space start of the current subpath.
    start: Point,
    current: Vec<Point>,
    done: Vec<Subpath>,
}

impl<'a> PolygonBuilder<'a> {
    fn new(ctx: &'a RasterContext) -> Self {
        Self {
            ctx,
            pen: Point::default(),
            start: Point::default(),
            current: Vec::new(),
            done: Vec::new(),
        }
    }

    fn flush(&mut self, closed: bool) {
        if !self.current.is_empty() {
            self.done.push(Subpath {
                points: std::mem::take(&mut self.current),
                closed,
            });
        }
    }

    fn move_to(&mut self, p: Point) {
        self.flush(false);
        self.pen = p;
        self.start = p;
        self.current.push(self.ctx.map(p));
    }

    /// Drawing after a close (or with no move at all) starts a new subpath
    /// at the pen position.
    fn ensure_started(&mut self) {
        if self.current.is_empty() {
            self.start = self.pen;
            self.current.push(self.ctx.map(self.pen));
        }
    }

    fn line_to(&mut self, p: Point) {
        self.ensure_started();
        self.pen = p;
        self.current.push(self.ctx.map(p));
    }

    /// Append a user-space cubic, flattened in device space.
    fn curve_to(&mut self, curve: Curve4Points) {
        self.ensure_started();
        let mapped = Curve4Points::new(
            self.ctx.map(curve.p0),
            self.ctx.map(curve.p1),
            self.ctx.map(curve.p2),
            self.ctx.map(curve.p3),
        );
        let points = mapped.flatten(0);
        self.current.extend(points.into_iter().skip(1));
        self.pen = curve.p3;
    }

    fn arc_to(&mut self, arc: &ArcParams, end: Point) {
        match svg_arc_to_curves(
            self.pen,
            arc.rx,
            arc.ry,
            arc.x_axis_rotation,
            arc.large_arc,
            arc.sweep,
            end,
        ) {
            ArcSegments::Omitted => {}
            ArcSegments::Line => self.line_to(end),
            ArcSegments::Curves(curves) => {
                for c in curves {
                    self.curve_to(c);
                }
                self.pen = end;
            }
        }
    }

    fn close(&mut self) {
        if let (Some(first), Some(last)) = (self.current.first(), self.current.last()) {
            if !first.approx_eq(*last) {
                let first = *first;
                self.current.push(first);
            }
        }
        self.flush(true);
        self.pen = self.start;
    }

    fn command(&mut self, cmd: &PathCommand) {
        let pen = self.pen;
        match *cmd {
            PathCommand::MoveAbs(p) => self.move_to(p),
            PathCommand::MoveRel(d) => self.move_to(pen + d),
            PathCommand::LineAbs(p) => self.line_to(p),
            PathCommand::LineRel(d) => self.line_to(pen + d),
            PathCommand::HLineAbs(x) => self.line_to(Point::new(x, pen.y)),
            PathCommand::HLineRel(dx) => self.line_to(Point::new(pen.x + dx, pen.y)),
            PathCommand::VLineAbs(y) => self.line_to(Point::new(pen.x, y)),
            PathCommand::VLineRel(dy) => self.line_to(Point::new(pen.x, pen.y + dy)),
            PathCommand::CubicAbs { cp1, cp2, end } => {
                self.curve_to(Curve4Points::new(pen, cp1, cp2, end))
            }
            PathCommand::CubicRel { cp1, cp2, end } => {
                self.curve_to(Curve4Points::new(pen, pen + cp1, pen + cp2, pen + end))
            }
            PathCommand::ArcAbs(ref arc) => self.arc_to(arc, arc.end),
            PathCommand::ArcRel(ref arc) => self.arc_to(arc, pen + arc.end),
            PathCommand::Close => self.close(),
        }
    }

    fn finish(mut self) -> Vec<Subpath> {
        self.flush(false);
        self.done
    }
}

// ============================================================================
// Public entry points
// ============================================================================

/// Flatten a command stream into device-space subpaths, keeping track of
/// which ones were explicitly closed.
pub fn build_subpaths(commands: &[PathCommand], ctx: &RasterContext) -> Vec<Subpath> {
    let mut builder = PolygonBuilder::new(ctx);
    for cmd in commands {
        builder.command(cmd);
    }
    builder.finish()
}

/// Flatten a command stream into device-space polygons, one per subpath.
///
/// Subpaths without a close command are returned as they are; the filler
/// closes them implicitly when it wraps the last edge.
pub fn build_polygons(commands: &[PathCommand], ctx: &RasterContext) -> Vec<Vec<Point>> {
    build_subpaths(commands, ctx)
        .into_iter()
        .map(|s| s.points)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_storage::parse_path_data;
    use crate::trans_affine::Transform;
    use crate::trans_viewport::ViewBox;

    fn ctx(size: u32, vb: f64) -> RasterContext {
        RasterContext::new(size, size, ViewBox::new(0.0, 0.0, vb, vb).unwrap(), Transform::new())
    }

    #[test]
    fn test_square_closed() {
        let cmds = parse_path_data("M0,0 L10,0 L10,10 L0,10 Z");
        let polys = build_polygons(&cmds, &ctx(100, 100.0));
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].len(), 5);
        assert_eq!(polys[0][0], polys[0][4]);
    }

    #[test]
    fn test_close_does_not_duplicate_start() {
        let cmds = parse_path_data("M0 0 L10 0 L10 10 L0 0 Z");
        let polys = build_polygons(&cmds, &ctx(10, 10.0));
        assert_eq!(polys[0].len(), 4);
    }

    #[test]
    fn test_open_subpath_not_closed() {
        let cmds = parse_path_data("M0 0 L10 0 L10 10");
        let subs = build_subpaths(&cmds, &ctx(10, 10.0));
        assert_eq!(subs.len(), 1);
        assert!(!subs[0].closed);
        assert_eq!(subs[0].points.len(), 3);
    }

    #[test]
    fn test_relative_commands_resolved() {
        let cmds = parse_path_data("m2 2 h4 v4 h-4 z");
        let polys = build_polygons(&cmds, &ctx(10, 10.0));
        assert_eq!(
            polys[0],
            vec![
                Point::new(2.0, 2.0),
                Point::new(6.0, 2.0),
                Point::new(6.0, 6.0),
                Point::new(2.0, 6.0),
                Point::new(2.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_scaled_to_device() {
        let cmds = parse_path_data("M1 1 L2 1");
        let polys = build_polygons(&cmds, &ctx(64, 16.0));
        assert_eq!(polys[0], vec![Point::new(4.0, 4.0), Point::new(8.0, 4.0)]);
    }

    #[test]
    fn test_multiple_subpaths() {
        let cmds = parse_path_data("M0 0 L5 0 L5 5 Z M6 6 L9 6 L9 9 Z");
        let subs = build_subpaths(&cmds, &ctx(10, 10.0));
        assert_eq!(subs.len(), 2);
        assert!(subs.iter().all(|s| s.closed));
    }

    #[test]
    fn test_draw_after_close_restarts_at_start() {
        let cmds = parse_path_data("M1 1 L5 1 L5 5 Z l2 0");
        let subs = build_subpaths(&cmds, &ctx(10, 10.0));
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].points, vec![Point::new(1.0, 1.0), Point::new(3.0, 1.0)]);
    }

    #[test]
    fn test_cubic_flattened_in_device_space() {
        let cmds = parse_path_data("M0 0 C0 10 10 10 10 0");
        let small = build_polygons(&cmds, &ctx(10, 10.0));
        let large = build_polygons(&cmds, &ctx(100, 10.0));
        assert!(large[0].len() > small[0].len());
        assert_eq!(*large[0].last().unwrap(), Point::new(100.0, 0.0));
    }

    #[test]
    fn test_arc_reaches_endpoint() {
        let cmds = parse_path_data("M0 5 A5 5 0 0 1 10 5");
        let polys = build_polygons(&cmds, &ctx(100, 10.0));
        let last = *polys[0].last().unwrap();
        assert!(last.approx_eq(Point::new(100.0, 50.0)));
        // Upper half circle passes near the top edge.
        let min_y = polys[0].iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert!(min_y < 1.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_polygons(&[], &ctx(10, 10.0)).is_empty());
    }
}
