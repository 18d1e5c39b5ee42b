//! # Fonts
//!
//! Font requests, metrics and the per-label font registry.
//!
//! ## Modules
//!
//! - [`metrics`]: Advance-width providers (TTF/OTF via `ab_glyph`)
//! - [`registry`]: Registered font variants and closest-match resolution
//!
//! Sizes are always in printer dots. A [`FontSpec`] names a family; the
//! [`FontRegistry`] decides which registered variant answers for it, or
//! falls back to a `chars × size` estimate for unknown families.

pub mod metrics;
pub mod registry;

pub use metrics::{FontMetrics, TtfMetrics};
pub use registry::{FontRegistry, RegisteredFont};

use serde::{Deserialize, Serialize};

/// Weight used when a request doesn't name one.
pub const NORMAL_WEIGHT: u16 = 400;

/// Weight requested for bold runs.
pub const BOLD_WEIGHT: u16 = 700;

/// Font slant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// A font request: family name, size in dots and optional variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Family name; unregistered names are passed to the printer as-is
    pub name: String,
    /// Font size in dots
    pub size: u32,
    #[serde(default)]
    pub weight: Option<u16>,
    #[serde(default)]
    pub style: Option<FontStyle>,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            size: 10,
            weight: None,
            style: None,
        }
    }
}

impl FontSpec {
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
            weight: None,
            style: None,
        }
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Requested weight, defaulting to normal.
    pub fn resolved_weight(&self) -> u16 {
        self.weight.unwrap_or(NORMAL_WEIGHT)
    }

    /// Requested style, defaulting to normal.
    pub fn resolved_style(&self) -> FontStyle {
        self.style.unwrap_or_default()
    }

    /// The variant used for a run with the given emphasis.
    ///
    /// ```
    /// use tspl_label::font::{FontSpec, FontStyle};
    ///
    /// let base = FontSpec::new("roboto", 16);
    /// let bold_italic = base.styled(true, true);
    /// assert_eq!(bold_italic.weight, Some(700));
    /// assert_eq!(bold_italic.style, Some(FontStyle::Italic));
    /// assert_eq!(base.styled(false, false), base);
    /// ```
    pub fn styled(&self, bold: bool, italic: bool) -> FontSpec {
        let mut spec = self.clone();
        if bold {
            spec.weight = Some(BOLD_WEIGHT);
        }
        if italic {
            spec.style = Some(FontStyle::Italic);
        }
        spec
    }

    /// Distance between consecutive baselines, in dots.
    pub fn line_height(&self) -> u32 {
        self.size + 1
    }
}
