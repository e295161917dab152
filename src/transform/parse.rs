//! Transform string grammars.
//!
//! Two notations reduce to the same [`TransformCommand`] list:
//!
//! - compact: `t10,20r45,100,100s0.5` (one letter per command, numbers
//!   separated by commas and/or whitespace);
//! - standard SVG: `translate(10,20) rotate(45,100,100) scale(0.5)`.

use smallvec::SmallVec;

use crate::foundation::core::Num;
use crate::foundation::error::{MenuError, MenuResult};
use crate::transform::{Matrix, rad};

type Args = SmallVec<[f64; 6]>;

/// One transform step with all defaults resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformCommand {
    /// Move by `(dx, dy)`.
    Translate {
        /// Horizontal offset.
        dx: f64,
        /// Vertical offset.
        dy: f64,
    },
    /// Rotate by `angle` degrees about `(cx, cy)`.
    Rotate {
        /// Angle in degrees, clockwise in screen space.
        angle: f64,
        /// Pivot x.
        cx: f64,
        /// Pivot y.
        cy: f64,
    },
    /// Scale by `(sx, sy)` about `(cx, cy)`.
    Scale {
        /// Horizontal factor.
        sx: f64,
        /// Vertical factor.
        sy: f64,
        /// Pivot x.
        cx: f64,
        /// Pivot y.
        cy: f64,
    },
    /// Raw `a, b, c, d, e, f` coefficients.
    Matrix([f64; 6]),
}

impl TransformCommand {
    /// Compact-notation letter.
    pub fn letter(&self) -> char {
        match self {
            Self::Translate { .. } => 't',
            Self::Rotate { .. } => 'r',
            Self::Scale { .. } => 's',
            Self::Matrix(_) => 'm',
        }
    }

    /// Arguments in compact-notation order.
    pub fn args(&self) -> Args {
        match *self {
            Self::Translate { dx, dy } => SmallVec::from_slice(&[dx, dy]),
            Self::Rotate { angle, cx, cy } => SmallVec::from_slice(&[angle, cx, cy]),
            Self::Scale { sx, sy, cx, cy } => SmallVec::from_slice(&[sx, sy, cx, cy]),
            Self::Matrix(m) => SmallVec::from_slice(&m),
        }
    }

    /// Post-multiply this step onto `m`.
    pub fn apply_to(&self, m: &mut Matrix) {
        match *self {
            Self::Translate { dx, dy } => {
                m.translate(dx, dy);
            }
            Self::Rotate { angle, cx, cy } => {
                m.rotate(angle, cx, cy);
            }
            Self::Scale { sx, sy, cx, cy } => {
                m.scale(sx, sy, Some((cx, cy)));
            }
            Self::Matrix([a, b, c, d, e, f]) => {
                m.add_values(a, b, c, d, e, f);
            }
        }
    }

    fn from_compact(letter: char, args: &[f64]) -> MenuResult<Self> {
        let arg = |i: usize, default: f64| args.get(i).copied().unwrap_or(default);
        let required = |what: &str| {
            MenuError::parse(format!(
                "'{letter}' ({what}) needs at least one numeric argument"
            ))
        };

        match letter.to_ascii_lowercase() {
            't' => {
                let dx = *args.first().ok_or_else(|| required("translate"))?;
                Ok(Self::Translate { dx, dy: arg(1, 0.0) })
            }
            'r' => {
                let angle = *args.first().ok_or_else(|| required("rotate"))?;
                Ok(Self::Rotate {
                    angle,
                    cx: arg(1, 0.0),
                    cy: arg(2, 0.0),
                })
            }
            's' => {
                let sx = *args.first().ok_or_else(|| required("scale"))?;
                Ok(Self::Scale {
                    sx,
                    sy: arg(1, sx),
                    cx: arg(2, 0.0),
                    cy: arg(3, 0.0),
                })
            }
            'm' => {
                let id = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
                let mut m = id;
                for (slot, v) in m.iter_mut().zip(args) {
                    *slot = *v;
                }
                Ok(Self::Matrix(m))
            }
            other => Err(MenuError::parse(format!(
                "unknown transform command '{other}'"
            ))),
        }
    }
}

fn is_number_start(bytes: &[u8], i: usize) -> bool {
    let c = bytes[i];
    c.is_ascii_digit()
        || ((c == b'-' || c == b'+' || c == b'.')
            && bytes
                .get(i + 1)
                .is_some_and(|n| n.is_ascii_digit() || *n == b'.'))
}

/// Scan one number starting at `i`; returns the value and the index after it.
fn scan_number(input: &str, start: usize) -> MenuResult<(f64, usize)> {
    let bytes = input.as_bytes();
    let mut i = start;
    if matches!(bytes.get(i), Some(b'-' | b'+')) {
        i += 1;
    }
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    // exponent, only when digits follow
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'-' | b'+')) {
            j += 1;
        }
        if bytes.get(j).is_some_and(u8::is_ascii_digit) {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }

    let s = &input[start..i];
    let v: f64 = s
        .parse()
        .map_err(|_| MenuError::parse(format!("invalid number '{s}' at offset {start}")))?;
    Ok((v, i))
}

/// Parse the compact notation into commands, in order.
pub fn parse_transform_string(input: &str) -> MenuResult<Vec<TransformCommand>> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut current: Option<(char, Args)> = None;
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() || c == b',' {
            i += 1;
            continue;
        }

        if is_number_start(bytes, i) {
            let (v, next) = scan_number(input, i)?;
            match current.as_mut() {
                Some((_, args)) => args.push(v),
                None => {
                    return Err(MenuError::parse(format!(
                        "number at offset {i} is not preceded by a command letter"
                    )));
                }
            }
            i = next;
            continue;
        }

        if matches!(c.to_ascii_lowercase(), b't' | b'r' | b's' | b'm') {
            if let Some((letter, args)) = current.take() {
                out.push(TransformCommand::from_compact(letter, &args)?);
            }
            current = Some((c as char, Args::new()));
            i += 1;
            continue;
        }

        return Err(MenuError::parse(format!(
            "unexpected character '{}' at offset {i}",
            c as char
        )));
    }

    if let Some((letter, args)) = current.take() {
        out.push(TransformCommand::from_compact(letter, &args)?);
    }
    Ok(out)
}

fn parse_params(name: &str, params: &str) -> MenuResult<Args> {
    params
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<f64>()
                .map_err(|_| MenuError::parse(format!("invalid {name}() argument '{p}'")))
        })
        .collect()
}

/// Parse the standard SVG notation (`translate(..) rotate(..) ...`).
pub fn svg_transform_to_commands(input: &str) -> MenuResult<Vec<TransformCommand>> {
    let mut out = Vec::new();
    let mut rest = input.trim_start_matches(|c: char| c.is_whitespace() || c == ',');

    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| MenuError::parse(format!("expected '(' in '{rest}'")))?;
        let close = rest[open..]
            .find(')')
            .map(|p| p + open)
            .ok_or_else(|| MenuError::parse(format!("unclosed '(' in '{rest}'")))?;

        let name = rest[..open].trim();
        let args = parse_params(name, &rest[open + 1..close])?;
        let first = *args
            .first()
            .ok_or_else(|| MenuError::parse(format!("{name}() needs at least one argument")))?;
        let arg = |i: usize, default: f64| args.get(i).copied().unwrap_or(default);

        let cmd = match name {
            "translate" => TransformCommand::Translate {
                dx: first,
                dy: arg(1, 0.0),
            },
            "rotate" => TransformCommand::Rotate {
                angle: first,
                cx: arg(1, 0.0),
                cy: arg(2, 0.0),
            },
            "scale" => TransformCommand::Scale {
                sx: first,
                sy: arg(1, first),
                cx: 0.0,
                cy: 0.0,
            },
            "skewX" => TransformCommand::Matrix([1.0, 0.0, rad(first).tan(), 1.0, 0.0, 0.0]),
            "skewY" => TransformCommand::Matrix([1.0, rad(first).tan(), 0.0, 1.0, 0.0, 0.0]),
            "matrix" => {
                if args.len() != 6 {
                    return Err(MenuError::parse(format!(
                        "matrix() needs 6 arguments, got {}",
                        args.len()
                    )));
                }
                TransformCommand::Matrix([args[0], args[1], args[2], args[3], args[4], args[5]])
            }
            other => {
                return Err(MenuError::parse(format!(
                    "unsupported transform function '{other}'"
                )));
            }
        };
        out.push(cmd);

        rest = rest[close + 1..].trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    }

    Ok(out)
}

/// Fold commands left to right into one matrix.
pub fn commands_to_matrix(commands: &[TransformCommand]) -> Matrix {
    let mut m = Matrix::identity();
    for cmd in commands {
        cmd.apply_to(&mut m);
    }
    m
}

/// Serialize commands back to compact notation.
pub fn commands_to_string(commands: &[TransformCommand]) -> String {
    let mut out = String::new();
    for cmd in commands {
        out.push(cmd.letter());
        let args = cmd.args();
        for (i, v) in args.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&Num(*v).to_string());
        }
    }
    out
}

/// Parse either notation and reduce it to a single matrix.
///
/// Input containing `(` is read as the standard SVG notation, anything else as
/// the compact one. An empty string is the identity.
pub fn transform_to_matrix(input: &str) -> MenuResult<Matrix> {
    let commands = if input.contains('(') {
        svg_transform_to_commands(input)?
    } else {
        parse_transform_string(input)?
    };
    Ok(commands_to_matrix(&commands))
}

#[cfg(test)]
#[path = "../../tests/unit/transform/parse.rs"]
mod tests;
