//! Per-element affine transform.
//!
//! Six-component matrix:
//!
//! ```text
//!   | sx  shx tx |
//!   | shy  sy ty |
//!   |  0    0  1 |
//! ```
//!
//! `x' = x*sx + y*shx + tx`, `y' = x*shy + y*sy + ty`.
//!
//! [`Transform::multiply`] appends `m` (applied after `self`), while
//! [`Transform::premultiply`] prepends it. An SVG `transform` list is read
//! left to right with `premultiply`, so the rightmost function touches the
//! points first.

use crate::basics::{deg2rad, Point};

/// Epsilon for matrix comparisons.
pub const AFFINE_EPSILON: f32 = 1e-6;

/// 2D affine transformation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub sx: f32,
    pub shy: f32,
    pub shx: f32,
    pub sy: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Transform {
    /// Identity transform.
    pub const fn new() -> Self {
        Self {
            sx: 1.0,
            shy: 0.0,
            shx: 0.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub const fn new_custom(sx: f32, shy: f32, shx: f32, sy: f32, tx: f32, ty: f32) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
        }
    }

    pub fn new_translation(x: f32, y: f32) -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub fn new_scaling(x: f32, y: f32) -> Self {
        Self::new_custom(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    /// Rotation about the origin, in degrees.
    pub fn new_rotation(deg: f32) -> Self {
        let (sa, ca) = deg2rad(deg).sin_cos();
        Self::new_custom(ca, sa, -sa, ca, 0.0, 0.0)
    }

    /// `self = self * m`: `m` is applied after the current transform.
    pub fn multiply(&mut self, m: &Transform) -> &mut Self {
        let t0 = self.sx * m.sx + self.shy * m.shx;
        let t2 = self.shx * m.sx + self.sy * m.shx;
        let t4 = self.tx * m.sx + self.ty * m.shx + m.tx;
        self.shy = self.sx * m.shy + self.shy * m.sy;
        self.sy = self.shx * m.shy + self.sy * m.sy;
        self.ty = self.tx * m.shy + self.ty * m.sy + m.ty;
        self.sx = t0;
        self.shx = t2;
        self.tx = t4;
        self
    }

    /// `self = m * self`: `m` is applied before the current transform.
    pub fn premultiply(&mut self, m: &Transform) -> &mut Self {
        let mut t = *m;
        t.multiply(self);
        *self = t;
        self
    }

    /// Translate after the current transform.
    pub fn translate(&mut self, x: f32, y: f32) -> &mut Self {
        self.tx += x;
        self.ty += y;
        self
    }

    /// Scale after the current transform.
    pub fn scale(&mut self, x: f32, y: f32) -> &mut Self {
        self.multiply(&Self::new_scaling(x, y))
    }

    /// Rotate (degrees) after the current transform.
    pub fn rotate(&mut self, deg: f32) -> &mut Self {
        self.multiply(&Self::new_rotation(deg))
    }

    pub fn is_identity(&self) -> bool {
        self.is_equal(&Self::new())
    }

    pub fn is_equal(&self, m: &Transform) -> bool {
        [
            (self.sx, m.sx),
            (self.shy, m.shy),
            (self.shx, m.shx),
            (self.sy, m.sy),
            (self.tx, m.tx),
            (self.ty, m.ty),
        ]
        .iter()
        .all(|(a, b)| (a - b).abs() <= AFFINE_EPSILON)
    }

    /// Apply the transform to a point.
    #[inline]
    pub fn transform(&self, p: Point) -> Point {
        Point::new(
            p.x * self.sx + p.y * self.shx + self.tx,
            p.x * self.shy + p.y * self.sy + self.ty,
        )
    }

    pub fn translation(&self) -> (f32, f32) {
        (self.tx, self.ty)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_identity() {
        let t = Transform::default();
        assert!(t.is_identity());
        assert_eq!(t.transform(Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_translation() {
        let t = Transform::new_translation(10.0, -2.0);
        assert!(close(t.transform(Point::new(1.0, 1.0)), Point::new(11.0, -1.0)));
        assert_eq!(t.translation(), (10.0, -2.0));
    }

    #[test]
    fn test_scaling() {
        let t = Transform::new_scaling(2.0, 3.0);
        assert!(close(t.transform(Point::new(1.0, 1.0)), Point::new(2.0, 3.0)));
    }

    #[test]
    fn test_rotation_90() {
        let t = Transform::new_rotation(90.0);
        assert!(close(t.transform(Point::new(1.0, 0.0)), Point::new(0.0, 1.0)));
    }

    #[test]
    fn test_multiply_applies_after() {
        let mut t = Transform::new_scaling(2.0, 2.0);
        t.rotate(90.0).translate(5.0, 5.0);
        // (1,0) -> scale (2,0) -> rotate (0,2) -> translate (5,7)
        assert!(close(t.transform(Point::new(1.0, 0.0)), Point::new(5.0, 7.0)));
    }

    #[test]
    fn test_premultiply_applies_before() {
        // scale(2) translate(5 5): translate first, then scale.
        let mut t = Transform::new();
        t.premultiply(&Transform::new_scaling(2.0, 2.0));
        t.premultiply(&Transform::new_translation(5.0, 5.0));
        assert!(close(t.transform(Point::new(0.0, 0.0)), Point::new(10.0, 10.0)));
        assert!(close(t.transform(Point::new(1.0, 1.0)), Point::new(12.0, 12.0)));

        // rotate(90) translate(10 0): (0,0) -> (10,0) -> (0,10)
        let mut t = Transform::new();
        t.premultiply(&Transform::new_rotation(90.0));
        t.premultiply(&Transform::new_translation(10.0, 0.0));
        assert!(close(t.transform(Point::new(0.0, 0.0)), Point::new(0.0, 10.0)));
    }

    #[test]
    fn test_nonuniform_scale_with_rotation() {
        // rotate(90) scale(2 1): (1,0) -> (2,0) -> (0,2)
        let mut t = Transform::new();
        t.premultiply(&Transform::new_rotation(90.0));
        t.premultiply(&Transform::new_scaling(2.0, 1.0));
        assert!(close(t.transform(Point::new(1.0, 0.0)), Point::new(0.0, 2.0)));
        assert!(close(t.transform(Point::new(0.0, 1.0)), Point::new(-1.0, 0.0)));
    }
}
