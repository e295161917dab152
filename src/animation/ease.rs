use std::f64::consts::PI;

/// Progress-remapping curves. Every variant maps `0 -> 0` and `1 -> 1` exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Progress unchanged.
    #[default]
    Linear,
    /// Symmetric cubic ease, solved in closed form.
    EaseInOut,
    /// Decaying sine that overshoots past 1 early on.
    Elastic,
}

impl Ease {
    /// Map progress `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOut => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                // Cardano on the depressed cubic of the curve's x(t), then y(t).
                let q = 0.48 - t / 1.04;
                let big_q = (0.1734 + q * q).sqrt();
                let x = (big_q - q).cbrt();
                let y = (-big_q - q).cbrt();
                let s = x + y + 0.5;
                (1.0 - s) * 3.0 * s * s + s * s * s
            }
            Self::Elastic => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                2f64.powf(-10.0 * t) * ((t - 0.075) * (2.0 * PI) / 0.3).sin() + 1.0
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
