//! Polar layout and SVG arc path generation.
//!
//! Angles are in degrees, measured clockwise with 0 at 12 o'clock.

use std::f64::consts::PI;

use crate::foundation::core::{BBox, Num, Point};
use crate::transform::Matrix;

/// Point at `angle` degrees on a circle of radius `r`.
pub fn polar_to_cartesian(cx: f64, cy: f64, r: f64, angle: f64) -> Point {
    let a = (angle - 90.0) * PI / 180.0;
    Point::new(cx + r * a.cos(), cy + r * a.sin())
}

/// Circular arc of radius `r` around `(x, y)` from `start` to `end`.
///
/// Both angles are reduced modulo 360 first. The path starts with `M`, or
/// with `L` when `line_move` is set so it can continue a previous segment.
/// `alter` flips the sweep direction.
pub fn describe_arc(x: f64, y: f64, r: f64, start: f64, end: f64, line_move: bool, alter: bool) -> String {
    let (start, end) = (start % 360.0, end % 360.0);
    let p0 = polar_to_cartesian(x, y, r, start);
    let p1 = polar_to_cartesian(x, y, r, end);
    let large = u8::from(end - start >= 180.0);
    let sweep = u8::from(!alter);
    format!(
        "{}{} {} A{} {}, 0, {large}, {sweep}, {} {}",
        if line_move { 'L' } else { 'M' },
        Num(p0.x),
        Num(p0.y),
        Num(r),
        Num(r),
        Num(p1.x),
        Num(p1.y),
    )
}

/// Annular segment between `r_inner` and `r_outer`: outer arc forward, inner
/// arc backward, closed.
pub fn describe_sector(x: f64, y: f64, r_outer: f64, r_inner: f64, start: f64, end: f64) -> String {
    // A full turn would collapse to a zero-length arc after the modulo.
    let end = if end - start >= 360.0 { start + 359.99 } else { end };
    format!(
        "{} {}Z",
        describe_arc(x, y, r_outer, start, end, false, false),
        describe_arc(x, y, r_inner, end, start, true, true)
    )
}

/// Hint arc of `text_length` pixels centred on `mid_angle` at radius `r`.
pub fn hint_arc(c: f64, r: f64, text_length: f64, mid_angle: f64) -> String {
    let span = (text_length / r) * 180.0 / PI;
    describe_arc(c, c, r, mid_angle - span / 2.0, mid_angle + span / 2.0, false, false)
}

/// translate(pos) -> scale -> rotate -> translate(-bbox centre).
pub fn icon_matrix(pos: Point, scale: f64, rotation: f64, bbox: &BBox) -> Matrix {
    let mut m = Matrix::identity();
    m.translate(pos.x, pos.y)
        .scale_uniform(scale)
        .rotate(rotation, 0.0, 0.0)
        .translate(-bbox.cx, -bbox.cy);
    m
}

#[cfg(test)]
#[path = "../../tests/unit/menu/geometry.rs"]
mod tests;
