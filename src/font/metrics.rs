//! Advance-width providers.
//!
//! A [`FontMetrics`] answers one question: how wide is this text, in font
//! design units. Scaling to dots is the registry's job.

use std::fmt;

use ab_glyph::{Font, FontArc};

use crate::error::LabelError;

/// Design-unit metrics for one font variant.
pub trait FontMetrics: Send + Sync + fmt::Debug {
    /// Design units per em square.
    fn units_per_em(&self) -> f32;

    /// Total horizontal advance of `text` in design units.
    fn advance_width(&self, text: &str) -> f32;
}

/// Metrics read from TrueType/OpenType data with `ab_glyph`.
#[derive(Clone)]
pub struct TtfMetrics {
    font: FontArc,
}

impl TtfMetrics {
    /// Parse font data. Fails with [`LabelError::Font`] for invalid data.
    pub fn from_vec(data: Vec<u8>) -> Result<Self, LabelError> {
        let font = FontArc::try_from_vec(data)
            .map_err(|e| LabelError::Font(format!("invalid font data: {}", e)))?;
        Ok(Self { font })
    }
}

impl fmt::Debug for TtfMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtfMetrics")
            .field("units_per_em", &self.units_per_em())
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl FontMetrics for TtfMetrics {
    fn units_per_em(&self) -> f32 {
        self.font.units_per_em().unwrap_or(1000.0)
    }

    fn advance_width(&self, text: &str) -> f32 {
        let mut width = 0.0f32;
        let mut previous = None;
        for ch in text.chars() {
            let glyph = self.font.glyph_id(ch);
            if let Some(prev) = previous {
                width += self.font.kern_unscaled(prev, glyph);
            }
            width += self.font.h_advance_unscaled(glyph);
            previous = Some(glyph);
        }
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_font_data() {
        let result = TtfMetrics::from_vec(vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(LabelError::Font(_))));
    }
}
