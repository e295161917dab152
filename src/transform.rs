//! 2D affine transforms: the [`Matrix`] value type and the transform string
//! grammars that reduce to it.

pub mod affine;
pub mod parse;

pub use affine::Matrix;
pub use parse::{
    TransformCommand, commands_to_matrix, commands_to_string, parse_transform_string,
    svg_transform_to_commands, transform_to_matrix,
};

/// Degrees to radians, wrapping the input into `(-360, 360)` first.
#[inline]
pub fn rad(deg: f64) -> f64 {
    (deg % 360.0) * std::f64::consts::PI / 180.0
}
