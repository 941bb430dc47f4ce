//! Geometry value types for the label canvas.
//!
//! All coordinates are f64 page points (pt), y growing downward. `Region`
//! carries two corner points without any ordering guarantee; callers needing
//! min/max bounds go through `normalized()`. `Transform` is the 2x2 linear
//! part of an object's placement (rotation and axis flips), applied to local
//! object coordinates before the position offset.

use serde::{Deserialize, Serialize};

/// An axis-aligned region given by two corner points.
///
/// Not assumed normalized: `x1` may exceed `x2` and `y1` may exceed `y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// First corner X (pt).
    pub x1: f64,
    /// First corner Y (pt).
    pub y1: f64,
    /// Second corner X (pt).
    pub x2: f64,
    /// Second corner Y (pt).
    pub y2: f64,
}

impl Region {
    /// Create a region from two corner points.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Get the normalized (min-max) bounds as (min_x, min_y, max_x, max_y).
    pub fn normalized(&self) -> (f64, f64, f64, f64) {
        let min_x = self.x1.min(self.x2);
        let min_y = self.y1.min(self.y2);
        let max_x = self.x1.max(self.x2);
        let max_y = self.y1.max(self.y2);
        (min_x, min_y, max_x, max_y)
    }

    /// Width of the region (absolute).
    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    /// Height of the region (absolute).
    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }

    /// Check whether `other` lies fully inside this region.
    ///
    /// Both regions are normalized first; containment is inclusive on all
    /// four edges. Mere overlap is not containment.
    pub fn contains(&self, other: &Region) -> bool {
        let (min_x, min_y, max_x, max_y) = self.normalized();
        let (o_min_x, o_min_y, o_max_x, o_max_y) = other.normalized();
        o_min_x >= min_x && o_max_x <= max_x && o_min_y >= min_y && o_max_y <= max_y
    }
}

/// The 2x2 linear part of an object placement.
///
/// Maps local object coordinates `(x, y)` to `(a*x + b*y, c*x + d*y)`.
/// Positive rotation angles turn clockwise on the page (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
        }
    }

    /// Compose a rotation by `theta_degrees` onto this transform.
    pub fn rotate(&mut self, theta_degrees: f64) {
        let theta = theta_degrees.to_radians();
        let (sin, cos) = theta.sin_cos();
        self.compose(cos, -sin, sin, cos);
    }

    /// Compose a mirror about the vertical axis onto this transform.
    pub fn flip_horiz(&mut self) {
        self.compose(-1.0, 0.0, 0.0, 1.0);
    }

    /// Compose a mirror about the horizontal axis onto this transform.
    pub fn flip_vert(&mut self) {
        self.compose(1.0, 0.0, 0.0, -1.0);
    }

    /// Map a local point through the transform.
    pub fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.b * y, self.c * x + self.d * y)
    }

    // Left-multiplies [[a, b], [c, d]] onto the current matrix.
    fn compose(&mut self, a: f64, b: f64, c: f64, d: f64) {
        let (pa, pb, pc, pd) = (self.a, self.b, self.c, self.d);
        self.a = a * pa + b * pc;
        self.b = a * pb + b * pd;
        self.c = c * pa + d * pc;
        self.d = c * pb + d * pd;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_region_normalized() {
        let r = Region::new(100.0, 80.0, 20.0, 10.0);
        assert_eq!(r.normalized(), (20.0, 10.0, 100.0, 80.0));
        // Already-normalized input is unchanged.
        let n = Region::new(20.0, 10.0, 100.0, 80.0);
        assert_eq!(n.normalized(), (20.0, 10.0, 100.0, 80.0));
    }

    #[test]
    fn test_region_dimensions() {
        let r = Region::new(30.0, 50.0, 10.0, 10.0);
        assert!(approx(r.width(), 20.0));
        assert!(approx(r.height(), 40.0));
    }

    #[test]
    fn test_region_contains_full_only() {
        let outer = Region::new(0.0, 0.0, 100.0, 100.0);
        let inner = Region::new(10.0, 10.0, 90.0, 90.0);
        let straddling = Region::new(50.0, 50.0, 150.0, 60.0);
        assert!(outer.contains(&inner));
        assert!(!outer.contains(&straddling));
        // Touching an edge still counts as contained.
        let flush = Region::new(0.0, 0.0, 100.0, 50.0);
        assert!(outer.contains(&flush));
    }

    #[test]
    fn test_region_contains_ignores_corner_order() {
        let outer = Region::new(100.0, 100.0, 0.0, 0.0);
        let inner = Region::new(90.0, 90.0, 10.0, 10.0);
        assert!(outer.contains(&inner));
    }

    #[test]
    fn test_transform_identity_map() {
        let t = Transform::identity();
        assert_eq!(t.map(12.5, -3.0), (12.5, -3.0));
    }

    #[test]
    fn test_transform_rotate_quarter_turns() {
        let mut t = Transform::identity();
        t.rotate(90.0);
        // Clockwise with y down: +x maps to +y.
        let (x, y) = t.map(10.0, 0.0);
        assert!(approx(x, 0.0));
        assert!(approx(y, 10.0));

        t.rotate(90.0);
        let (x, y) = t.map(10.0, 0.0);
        assert!(approx(x, -10.0));
        assert!(approx(y, 0.0));
    }

    #[test]
    fn test_transform_flips() {
        let mut t = Transform::identity();
        t.flip_horiz();
        assert_eq!(t.map(5.0, 7.0), (-5.0, 7.0));
        t.flip_vert();
        assert_eq!(t.map(5.0, 7.0), (-5.0, -7.0));
        // Two horizontal flips cancel.
        t.flip_horiz();
        t.flip_horiz();
        assert_eq!(t.map(5.0, 7.0), (-5.0, -7.0));
    }

    #[test]
    fn test_transform_rotate_then_flip() {
        let mut t = Transform::identity();
        t.rotate(90.0);
        t.flip_horiz();
        let (x, y) = t.map(10.0, 0.0);
        assert!(approx(x, 0.0));
        assert!(approx(y, 10.0));
        let (x, y) = t.map(0.0, 10.0);
        assert!(approx(x, 10.0));
        assert!(approx(y, 0.0));
    }
}
