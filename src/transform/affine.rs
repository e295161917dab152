//! Affine matrix in SVG `matrix(a,b,c,d,e,f)` convention.

use std::fmt;

use crate::foundation::core::{Affine, Num, Point, round_to};
use crate::foundation::error::{MenuError, MenuResult};
use crate::transform::rad;

/// 2D affine transform `[[a, c, e], [b, d, f], [0, 0, 1]]`.
///
/// The builder-style operations mutate in place and return `&mut Self` so they
/// chain; each one post-multiplies onto the current matrix, so calls read in
/// the order they apply to a point (outermost first).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Matrix {
    /// Horizontal scale component.
    pub a: f64,
    /// Vertical skew component.
    pub b: f64,
    /// Horizontal skew component.
    pub c: f64,
    /// Vertical scale component.
    pub d: f64,
    /// Horizontal translation.
    pub e: f64,
    /// Vertical translation.
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Matrix from its six coefficients.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Same as [`Matrix::IDENTITY`].
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// `self = self * other`.
    pub fn add(&mut self, other: &Matrix) -> &mut Self {
        self.add_values(other.a, other.b, other.c, other.d, other.e, other.f)
    }

    /// [`Matrix::add`] taking the six coefficients directly.
    pub fn add_values(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        let a_new = a * self.a + b * self.c;
        let b_new = a * self.b + b * self.d;

        self.e += e * self.a + f * self.c;
        self.f += e * self.b + f * self.d;
        self.c = c * self.a + d * self.c;
        self.d = c * self.b + d * self.d;

        self.a = a_new;
        self.b = b_new;
        self
    }

    /// Translate by `(x, y)`.
    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        self.add_values(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Scale by `(x, y)`, about `pivot` when given.
    pub fn scale(&mut self, x: f64, y: f64, pivot: Option<(f64, f64)>) -> &mut Self {
        if let Some((cx, cy)) = pivot {
            self.translate(cx, cy);
        }

        self.a *= x;
        self.b *= x;
        self.c *= y;
        self.d *= y;

        if let Some((cx, cy)) = pivot {
            self.translate(-cx, -cy);
        }
        self
    }

    /// Scale both axes by `s` about the origin.
    pub fn scale_uniform(&mut self, s: f64) -> &mut Self {
        self.scale(s, s, None)
    }

    /// Rotate by `angle` degrees about `(x, y)`.
    ///
    /// Sine and cosine are rounded to 9 decimals so right angles produce exact
    /// zeros in the canonical string form.
    pub fn rotate(&mut self, angle: f64, x: f64, y: f64) -> &mut Self {
        let r = rad(angle);
        let cos = round_to(r.cos(), 9);
        let sin = round_to(r.sin(), 9);

        self.add_values(cos, sin, -sin, cos, x, y);
        self.add_values(1.0, 0.0, 0.0, 1.0, -x, -y)
    }

    /// `a * d - b * c`.
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse matrix; fails when the matrix is singular.
    pub fn invert(&self) -> MenuResult<Matrix> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(MenuError::geometry(format!(
                "cannot invert {self}: determinant is {det}"
            )));
        }

        Ok(Matrix::new(
            self.d / det,
            -self.b / det,
            -self.c / det,
            self.a / det,
            (self.c * self.f - self.d * self.e) / det,
            (self.b * self.e - self.a * self.f) / det,
        ))
    }

    /// Transformed x coordinate of `(x, y)`.
    pub fn apply_x(&self, x: f64, y: f64) -> f64 {
        x * self.a + y * self.c + self.e
    }

    /// Transformed y coordinate of `(x, y)`.
    pub fn apply_y(&self, x: f64, y: f64) -> f64 {
        x * self.b + y * self.d + self.f
    }

    /// Transform a point.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.apply_x(p.x, p.y), self.apply_y(p.x, p.y))
    }

    /// Same transform as a kurbo [`Affine`].
    pub fn to_affine(self) -> Affine {
        Affine::new([self.a, self.b, self.c, self.d, self.e, self.f])
    }
}

impl From<Affine> for Matrix {
    fn from(value: Affine) -> Self {
        let [a, b, c, d, e, f] = value.as_coeffs();
        Self { a, b, c, d, e, f }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({},{},{},{},{},{})",
            Num(self.a),
            Num(self.b),
            Num(self.c),
            Num(self.d),
            Num(self.e),
            Num(self.f)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
