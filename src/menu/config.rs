use std::rc::Rc;

use crate::foundation::error::{MenuError, MenuResult};

/// Fill used for wedges, the central circle and hint pills when no color is set.
pub const DEFAULT_COLOR: &str = "#1976D2";

#[derive(Clone)]
/// Item action invoked on primary-button release. Never serialized.
pub struct Callback(pub Rc<dyn Fn()>);

impl Callback {
    /// Wrap a closure.
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the wrapped closure.
    pub fn call(&self) {
        (self.0)()
    }
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Callback(..)")
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Colour scheme for hint text.
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark hint text for light pages.
    #[default]
    Light,
    /// Grey hint text for dark pages.
    Dark,
}

impl Theme {
    /// Fill colour of hint labels.
    pub fn hint_fill(self) -> &'static str {
        match self {
            Self::Light => "#333333",
            Self::Dark => "#7a7a7a",
        }
    }

    /// Class added to the menu element.
    pub fn class(self) -> &'static str {
        match self {
            Self::Light => "theme--light",
            Self::Dark => "theme--dark",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Side of the central button the hint curves around.
#[serde(rename_all = "lowercase")]
pub enum HintPosition {
    /// Above the circle.
    #[default]
    Top,
    /// Below the circle.
    Bottom,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One wedge of the menu, in clockwise order from 12 o'clock.
pub struct Sector {
    /// Element id of the icon inside the sprite.
    pub icon: String,
    /// Label on the curved hint; the icon id is shown when empty.
    #[serde(default)]
    pub hint: String,
    /// Called on primary-button release.
    #[serde(skip)]
    pub onclick: Option<Callback>,
    /// Extra icon rotation in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    /// Overrides the menu icon scale for this sector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_scale: Option<f64>,
    /// Icon distance from the centre; defaults to mid-wedge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_radius: Option<f64>,
    /// Draws a pill behind the hint with this padding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_padding: Option<f64>,
}

impl Sector {
    /// Sector with an icon and hint, everything else defaulted.
    pub fn new(icon: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            hint: hint.into(),
            ..Self::default()
        }
    }

    /// Attach a click action.
    pub fn with_onclick(mut self, f: impl Fn() + 'static) -> Self {
        self.onclick = Some(Callback::new(f));
        self
    }

    /// Text shown on the hint.
    pub fn label(&self) -> &str {
        if self.hint.is_empty() {
            &self.icon
        } else {
            &self.hint
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Circle at the menu centre with an optional icon and curved hint.
pub struct CentralButton {
    /// Element id of the icon inside the sprite; may be empty.
    #[serde(default)]
    pub icon: String,
    /// Curved label around the circle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Called on primary-button release.
    #[serde(skip)]
    pub onclick: Option<Callback>,
    /// Circle radius; defaults to `0.6 * innerRadius`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_radius: Option<f64>,
    /// Overrides the menu icon scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_scale: Option<f64>,
    /// Which side the hint curves around.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_position: Option<HintPosition>,
    /// Arc span in degrees when no explicit angles are given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_span: Option<f64>,
    /// Gap between the circle and the hint baseline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_distance: Option<f64>,
    /// Extra radial offset added to the hint arc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_offset: Option<f64>,
    /// Explicit arc start in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_start_angle: Option<f64>,
    /// Explicit arc end in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_end_angle: Option<f64>,
    /// Draws a pill behind the hint with this padding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_padding: Option<f64>,
}

impl CentralButton {
    /// Button with an icon and hint; an empty hint means none.
    pub fn new(icon: impl Into<String>, hint: impl Into<String>) -> Self {
        let hint = hint.into();
        Self {
            icon: icon.into(),
            hint: (!hint.is_empty()).then_some(hint),
            ..Self::default()
        }
    }

    /// Attach a click action.
    pub fn with_onclick(mut self, f: impl Fn() + 'static) -> Self {
        self.onclick = Some(Callback::new(f));
        self
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Declarative menu description. Missing JSON fields take their defaults.
pub struct MenuConfig {
    /// URL of the icon sprite handed to the sprite source.
    pub sprite: String,
    /// Radius of the hole in the ring.
    pub inner_radius: f64,
    /// Outer radius of the ring; the svg is twice this wide.
    pub outer_radius: f64,
    /// Wedge opacity; adjusted at runtime by the wheel within `[0.4, 1]`.
    pub opacity: f64,
    /// Fill for wedges and the central button.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Icon size as a fraction of the wedge depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_scale: Option<f64>,
    /// Default icon distance from the centre.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_radius: Option<f64>,
    /// Default hint pill padding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint_padding: Option<f64>,
    /// Wedges, clockwise from 12 o'clock.
    pub sectors: Vec<Sector>,
    /// Optional circle at the centre.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub central_button: Option<CentralButton>,
    /// Let [`Manager`](crate::Manager) open the menu on window context menu events.
    pub auto_bind_context_menu: bool,
    /// Stacking order of the menu element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    /// Hint colour scheme.
    pub theme: Theme,
    /// Base animation duration in milliseconds.
    pub duration: f64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            sprite: "../icons.svg".to_string(),
            inner_radius: 50.0,
            outer_radius: 150.0,
            opacity: 0.7,
            color: None,
            icon_scale: None,
            icon_radius: None,
            hint_padding: None,
            sectors: Vec::new(),
            central_button: None,
            auto_bind_context_menu: true,
            z_index: None,
            theme: Theme::Light,
            duration: 300.0,
        }
    }
}

fn positive(name: &str, v: f64) -> MenuResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(MenuError::config(format!("{name} must be finite and > 0, got {v}")));
    }
    Ok(())
}

fn optional_finite(name: &str, v: Option<f64>) -> MenuResult<()> {
    match v {
        Some(v) if !v.is_finite() => Err(MenuError::config(format!("{name} must be finite"))),
        _ => Ok(()),
    }
}

impl MenuConfig {
    /// Parse a configuration; missing fields take defaults.
    pub fn from_json(json: &str) -> MenuResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty-printed JSON, callbacks omitted.
    pub fn to_json_pretty(&self) -> MenuResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Configured fill or [`DEFAULT_COLOR`].
    pub fn color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }

    /// Wedge angle in degrees; an empty menu is laid out as six sectors.
    pub fn sector_angle(&self) -> f64 {
        let n = self.sectors.len();
        360.0 / if n == 0 { 6.0 } else { n as f64 }
    }

    /// Reject configurations the layout cannot draw.
    pub fn validate(&self) -> MenuResult<()> {
        positive("innerRadius", self.inner_radius)?;
        positive("outerRadius", self.outer_radius)?;
        if self.inner_radius >= self.outer_radius {
            return Err(MenuError::config(format!(
                "innerRadius ({}) must be smaller than outerRadius ({})",
                self.inner_radius, self.outer_radius
            )));
        }
        if !self.opacity.is_finite() {
            return Err(MenuError::config("opacity must be finite"));
        }
        positive("duration", self.duration)?;
        optional_finite("iconScale", self.icon_scale)?;
        optional_finite("iconRadius", self.icon_radius)?;
        optional_finite("hintPadding", self.hint_padding)?;

        for (i, s) in self.sectors.iter().enumerate() {
            if s.icon.trim().is_empty() {
                return Err(MenuError::config(format!("sector {i} has no icon id")));
            }
            optional_finite("sector rotate", s.rotate)?;
            optional_finite("sector iconScale", s.icon_scale)?;
            optional_finite("sector iconRadius", s.icon_radius)?;
            optional_finite("sector hintPadding", s.hint_padding)?;
        }
        if let Some(c) = &self.central_button {
            if let Some(r) = c.icon_radius {
                positive("centralButton.iconRadius", r)?;
            }
            for (name, v) in [
                ("centralButton.iconScale", c.icon_scale),
                ("centralButton.hintSpan", c.hint_span),
                ("centralButton.hintDistance", c.hint_distance),
                ("centralButton.hintOffset", c.hint_offset),
                ("centralButton.hintStartAngle", c.hint_start_angle),
                ("centralButton.hintEndAngle", c.hint_end_angle),
                ("centralButton.hintPadding", c.hint_padding),
            ] {
                optional_finite(name, v)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/menu/config.rs"]
mod tests;
