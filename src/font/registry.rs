//! # Font Registry
//!
//! Registered font variants for one label, keyed by `(family, weight, style)`.
//!
//! Each variant gets a printer-side alias `f<index>.TTF`, where `index` is
//! its position in registration order. The alias is the name used both in
//! the `DOWNLOAD` command that uploads the font and in `TEXT` commands that
//! reference it.
//!
//! ## Resolution
//!
//! ```text
//! request (family, weight, style)
//!   1. exact weight and style
//!   2. same style, closest weight (ties: earliest registered)
//!   3. first registered variant of the family
//!   4. unregistered: width ≈ chars × size, name passed through
//! ```

use std::sync::Arc;

use super::metrics::{FontMetrics, TtfMetrics};
use super::{FontSpec, FontStyle};
use crate::error::LabelError;
use crate::printer::PrinterConfig;

/// One registered font variant.
#[derive(Debug, Clone)]
pub struct RegisteredFont {
    pub family: String,
    pub weight: u16,
    pub style: FontStyle,
    /// Printer-side file name (`f0.TTF`, `f1.TTF`, ...)
    pub alias: String,
    /// Font file contents uploaded to the printer
    pub data: Arc<[u8]>,
    metrics: Arc<dyn FontMetrics>,
}

impl RegisteredFont {
    pub fn metrics(&self) -> &dyn FontMetrics {
        self.metrics.as_ref()
    }
}

/// Font variants registered for a label, plus the resolution they're
/// measured at.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    config: PrinterConfig,
    fonts: Vec<RegisteredFont>,
}

impl FontRegistry {
    pub fn new(config: PrinterConfig) -> Self {
        Self {
            config,
            fonts: Vec::new(),
        }
    }

    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    /// All registered variants in registration order.
    pub fn fonts(&self) -> &[RegisteredFont] {
        &self.fonts
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Parse TTF/OTF data and register it as a variant of `family`.
    pub fn register_font(
        &mut self,
        family: impl Into<String>,
        data: Vec<u8>,
        weight: u16,
        style: FontStyle,
    ) -> Result<&RegisteredFont, LabelError> {
        let family = family.into();
        let metrics = TtfMetrics::from_vec(data.clone())
            .inspect_err(|e| log::warn!("rejected font {} weight {}: {}", family, weight, e))?;
        Ok(self.register_metrics(family, Arc::new(metrics), data, weight, style))
    }

    /// Register a variant backed by any metrics provider.
    ///
    /// `data` is what gets uploaded to the printer for this variant.
    pub fn register_metrics(
        &mut self,
        family: impl Into<String>,
        metrics: Arc<dyn FontMetrics>,
        data: Vec<u8>,
        weight: u16,
        style: FontStyle,
    ) -> &RegisteredFont {
        let index = self.fonts.len();
        let alias = format!("f{}.TTF", index);
        let family = family.into();
        log::debug!(
            "registered font {} weight {} {:?} as {}",
            family,
            weight,
            style,
            alias
        );
        self.fonts.push(RegisteredFont {
            family,
            weight,
            style,
            alias,
            data: data.into(),
            metrics,
        });
        &self.fonts[index]
    }

    /// Find the variant that answers for `(family, weight, style)`.
    pub fn resolve(&self, family: &str, weight: u16, style: FontStyle) -> Option<&RegisteredFont> {
        let candidates: Vec<&RegisteredFont> =
            self.fonts.iter().filter(|f| f.family == family).collect();
        let first = *candidates.first()?;

        if let Some(exact) = candidates
            .iter()
            .find(|f| f.weight == weight && f.style == style)
        {
            return Some(*exact);
        }

        // min_by_key keeps the first of equal keys
        candidates
            .iter()
            .filter(|f| f.style == style)
            .min_by_key(|f| f.weight.abs_diff(weight))
            .copied()
            .or(Some(first))
    }

    pub fn resolve_spec(&self, spec: &FontSpec) -> Option<&RegisteredFont> {
        self.resolve(&spec.name, spec.resolved_weight(), spec.resolved_style())
    }

    /// Printer-side name for a font request.
    ///
    /// The resolved variant's alias, or the requested name when the family
    /// isn't registered (built-in printer fonts such as `"0"` or `"3"`).
    pub fn font_name(&self, spec: &FontSpec) -> String {
        match self.resolve_spec(spec) {
            Some(font) => font.alias.clone(),
            None => spec.name.clone(),
        }
    }

    /// Width of `text` in dots when printed with `spec`.
    ///
    /// ```text
    /// points = round(size · 72 / dpi)
    /// scaled = points · advance / units_per_em
    /// dots   = scaled · dpi / 72
    /// ```
    pub fn text_width(&self, text: &str, spec: &FontSpec) -> f32 {
        let Some(font) = self.resolve_spec(spec) else {
            log::trace!("font {:?} not registered, estimating width", spec.name);
            return text.chars().count() as f32 * spec.size as f32;
        };

        let metrics = font.metrics();
        let points = self.config.dots_to_points(spec.size as f32).round();
        let units_per_em = metrics.units_per_em();
        if units_per_em <= 0.0 {
            return 0.0;
        }
        let scaled = points * metrics.advance_width(text) / units_per_em;
        self.config.points_to_dots(scaled)
    }
}

// ============================================================================
// TESTS
// ============================================================================
