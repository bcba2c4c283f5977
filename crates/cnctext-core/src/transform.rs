//! 2D points and affine scale/translate transformations.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in glyph-local or label space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates to `digits` decimal places
    pub fn rounded(self, digits: i32) -> Self {
        let factor = 10f64.powi(digits);
        Self {
            x: (self.x * factor).round() / factor,
            y: (self.y * factor).round() / factor,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self {
            x: f64::from(x),
            y: f64::from(y),
        }
    }
}

/// One continuous pen-down path
pub type Polyline = Vec<Point>;

/// Homogeneous 2D transformation restricted to scaling and translation.
///
/// `scale` and `translate` right-multiply the current matrix, so the
/// order of chained calls matters:
///
/// ```
/// use cnctext_core::{Point, Transform};
///
/// let t = Transform::identity().translate(1.0, 2.0).scale(2.0, 2.0);
/// assert_eq!(t.apply(Point::new(1.0, 1.0)), Point::new(3.0, 4.0));
///
/// let t = Transform::identity().scale(2.0, 2.0).translate(1.0, 2.0);
/// assert_eq!(t.apply(Point::new(1.0, 1.0)), Point::new(4.0, 6.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix3<f64>,
}

impl Transform {
    /// The identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Builds a transformation from independent scale and translation vectors.
    ///
    /// The translation is not scaled: the result maps `p` to
    /// `p * scale + translate`.
    pub fn new(scale: Option<(f64, f64)>, translate: Option<(f64, f64)>) -> Self {
        let mut matrix = Matrix3::identity();
        if let Some((sx, sy)) = scale {
            matrix[(0, 0)] = sx;
            matrix[(1, 1)] = sy;
        }
        if let Some((tx, ty)) = translate {
            matrix[(0, 2)] = tx;
            matrix[(1, 2)] = ty;
        }
        Self { matrix }
    }

    /// Compose a scaling on top of the current transformation
    pub fn scale(mut self, x: f64, y: f64) -> Self {
        self.matrix *= Matrix3::new(x, 0.0, 0.0, 0.0, y, 0.0, 0.0, 0.0, 1.0);
        self
    }

    /// Compose a translation on top of the current transformation
    pub fn translate(mut self, x: f64, y: f64) -> Self {
        self.matrix *= Matrix3::new(1.0, 0.0, x, 0.0, 1.0, y, 0.0, 0.0, 1.0);
        self
    }

    /// Transform a single point
    pub fn apply(&self, pt: Point) -> Point {
        let v = self.matrix * Vector3::new(pt.x, pt.y, 1.0);
        Point::new(v.x, v.y)
    }

    /// Transform every point of a polyline
    pub fn apply_all(&self, points: &[Point]) -> Polyline {
        points.iter().map(|&p| self.apply(p)).collect()
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.matrix;
        write!(
            f,
            "<Transform: [[{}, {}, {}], [{}, {}, {}], [{}, {}, {}]]>",
            m[(0, 0)],
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 0)],
            m[(1, 1)],
            m[(1, 2)],
            m[(2, 0)],
            m[(2, 1)],
            m[(2, 2)]
        )
    }
}
