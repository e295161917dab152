use std::cell::{Cell, RefCell};

use crate::foundation::error::{MenuError, MenuResult};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Vertical metrics of the hint font, in pixels.
pub struct FontMetrics {
    /// Distance from baseline to the top of the tallest glyph.
    pub ascent: f64,
    /// Distance from baseline to the lowest descender, positive.
    pub descent: f64,
    /// Line height, `ascent + descent`.
    pub height: f64,
}

impl FontMetrics {
    /// Used when no measurement backend is available.
    pub const FALLBACK: Self = Self {
        ascent: 9.0,
        descent: 3.0,
        height: 12.0,
    };

    /// Metrics with `height` derived from the other two.
    pub fn new(ascent: f64, descent: f64) -> Self {
        Self {
            ascent,
            descent,
            height: ascent + descent,
        }
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Text measurement used to lay out hints.
pub trait TextMetrics {
    /// Advance width of `text` on a straight line, in pixels.
    fn text_length(&self, text: &str) -> f64;

    /// Vertical metrics of the hint font.
    fn hint_font_metrics(&self) -> FontMetrics;
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Monospace approximation: every character advances by the same amount.
pub struct FixedTextMetrics {
    /// Advance width per `char`.
    pub advance: f64,
    /// Reported for every string.
    pub metrics: FontMetrics,
}

impl FixedTextMetrics {
    /// Fixed advance with the given vertical metrics.
    pub fn new(advance: f64, metrics: FontMetrics) -> Self {
        Self { advance, metrics }
    }
}

impl Default for FixedTextMetrics {
    fn default() -> Self {
        Self::new(7.0, FontMetrics::FALLBACK)
    }
}

impl TextMetrics for FixedTextMetrics {
    fn text_length(&self, text: &str) -> f64 {
        self.advance * text.chars().count() as f64
    }

    fn hint_font_metrics(&self) -> FontMetrics {
        self.metrics
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Brush type for measurement-only layouts.
pub struct MeasureBrush;

struct ParleyContexts {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<MeasureBrush>,
}

/// Metrics from shaping text with parley over caller-supplied font bytes.
pub struct ParleyTextMetrics {
    contexts: RefCell<ParleyContexts>,
    family_name: String,
    size_px: f32,
    font_metrics: Cell<Option<FontMetrics>>,
}

impl std::fmt::Debug for ParleyTextMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyTextMetrics")
            .field("family_name", &self.family_name)
            .field("size_px", &self.size_px)
            .finish()
    }
}

impl ParleyTextMetrics {
    /// Register `font_bytes` and measure at `size_px`.
    pub fn new(font_bytes: &[u8], size_px: f32) -> MenuResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(MenuError::config("hint font size must be finite and > 0"));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| MenuError::resource("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| MenuError::resource("registered font family has no name"))?
            .to_string();

        Ok(Self {
            contexts: RefCell::new(ParleyContexts {
                font_ctx,
                layout_ctx: parley::LayoutContext::new(),
            }),
            family_name,
            size_px,
            font_metrics: Cell::new(None),
        })
    }

    /// Family name registered from the font bytes.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn layout(&self, text: &str) -> parley::Layout<MeasureBrush> {
        let mut guard = self.contexts.borrow_mut();
        let ParleyContexts {
            font_ctx,
            layout_ctx,
        } = &mut *guard;

        let mut builder = layout_ctx.ranged_builder(font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(MeasureBrush));

        let mut layout: parley::Layout<MeasureBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextMetrics for ParleyTextMetrics {
    fn text_length(&self, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        f64::from(self.layout(text).width())
    }

    /// Line metrics of a single `A`, measured once.
    fn hint_font_metrics(&self) -> FontMetrics {
        if let Some(m) = self.font_metrics.get() {
            return m;
        }
        let layout = self.layout("A");
        let metrics = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                FontMetrics::new(f64::from(m.ascent), f64::from(m.descent))
            })
            .unwrap_or_else(|| {
                tracing::warn!("hint font produced no line; using fallback metrics");
                FontMetrics::FALLBACK
            });
        self.font_metrics.set(Some(metrics));
        metrics
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/metrics.rs"]
mod tests;
