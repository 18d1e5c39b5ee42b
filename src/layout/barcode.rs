//! # Barcode Fields
//!
//! 1D barcodes and QR codes. Both are drawn by the printer firmware, so
//! layout only places them; there is nothing to measure.
//!
//! ## Example
//!
//! ```
//! use tspl_label::font::FontRegistry;
//! use tspl_label::layout::{Alignment, Barcode, Field, QrCode, QrErrorLevel};
//!
//! let fonts = FontRegistry::default();
//!
//! let barcode = Barcode::new("ABC-123", 10, 10, "128", 60).with_readable(Alignment::Center);
//! let qr = QrCode::new("https://example.com", 10, 100, 4)
//!     .with_error_level(QrErrorLevel::H)
//!     .with_mask(3)
//!     .unwrap();
//!
//! assert_eq!(barcode.primitives(&fonts).len(), 1);
//! assert_eq!(qr.primitives(&fonts).len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use super::Field;
use super::primitive::{Point, Primitive};
use crate::error::LabelError;
use crate::font::FontRegistry;

/// Highest QR mask pattern index.
pub const MAX_QR_MASK: u8 = 8;

/// Horizontal alignment as TSPL encodes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub const fn code(self) -> u8 {
        match self {
            Alignment::Left => 1,
            Alignment::Center => 2,
            Alignment::Right => 3,
        }
    }
}

/// QR error correction level.
///
/// | Level | Recovery |
/// |-------|----------|
/// | L | ~7% |
/// | M | ~15% |
/// | Q | ~25% |
/// | H | ~30% |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QrErrorLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl QrErrorLevel {
    pub const fn letter(self) -> char {
        match self {
            QrErrorLevel::L => 'L',
            QrErrorLevel::M => 'M',
            QrErrorLevel::Q => 'Q',
            QrErrorLevel::H => 'H',
        }
    }
}

/// QR data encoding: automatic or manual mode selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrMode {
    #[default]
    Auto,
    Manual,
}

impl QrMode {
    pub const fn letter(self) -> char {
        match self {
            QrMode::Auto => 'A',
            QrMode::Manual => 'M',
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QrModel {
    M1,
    #[default]
    M2,
}

impl QrModel {
    pub const fn name(self) -> &'static str {
        match self {
            QrModel::M1 => "M1",
            QrModel::M2 => "M2",
        }
    }
}

// ============================================================================
// 1D BARCODE
// ============================================================================

/// A 1D barcode (`BARCODE`).
///
/// `symbology` is the printer's code type name, e.g. `"128"`, `"39"`,
/// `"EAN13"`. It is passed through unchecked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Barcode {
    pub content: String,
    pub position: Point,
    pub symbology: String,
    /// Bar height in dots
    pub height: u32,
    /// Human-readable text below the bars, if any
    pub readable: Option<Alignment>,
    pub rotation: u16,
    /// Narrow bar width in dots
    pub narrow: u32,
    /// Wide bar width in dots
    pub wide: u32,
}

impl Barcode {
    pub fn new(
        content: impl Into<String>,
        x: i32,
        y: i32,
        symbology: impl Into<String>,
        height: u32,
    ) -> Self {
        Self {
            content: content.into(),
            position: Point::new(x, y),
            symbology: symbology.into(),
            height,
            readable: None,
            rotation: 0,
            narrow: 2,
            wide: 2,
        }
    }

    pub fn with_rotation(mut self, rotation: u16) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_readable(mut self, alignment: Alignment) -> Self {
        self.readable = Some(alignment);
        self
    }

    pub fn with_bar_widths(mut self, narrow: u32, wide: u32) -> Self {
        self.narrow = narrow;
        self.wide = wide;
        self
    }
}

impl Field for Barcode {
    fn emit(&self, _fonts: &FontRegistry, out: &mut Vec<Primitive>) {
        out.push(Primitive::Barcode(self.clone()));
    }
}

// ============================================================================
// QR CODE
// ============================================================================

/// A QR code (`QRCODE`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCode {
    pub content: String,
    pub position: Point,
    /// Module size in dots
    pub cell_width: u32,
    pub error_level: QrErrorLevel,
    pub mode: QrMode,
    pub rotation: u16,
    pub model: QrModel,
    /// Mask pattern 0-8; the printer picks one when unset
    pub mask: Option<u8>,
}

impl QrCode {
    pub fn new(content: impl Into<String>, x: i32, y: i32, cell_width: u32) -> Self {
        Self {
            content: content.into(),
            position: Point::new(x, y),
            cell_width,
            error_level: QrErrorLevel::default(),
            mode: QrMode::default(),
            rotation: 0,
            model: QrModel::default(),
            mask: None,
        }
    }

    pub fn with_error_level(mut self, level: QrErrorLevel) -> Self {
        self.error_level = level;
        self
    }

    pub fn with_mode(mut self, mode: QrMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_rotation(mut self, rotation: u16) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_model(mut self, model: QrModel) -> Self {
        self.model = model;
        self
    }

    /// Force a mask pattern. Fails outside `0..=8`.
    pub fn with_mask(mut self, mask: u8) -> Result<Self, LabelError> {
        if mask > MAX_QR_MASK {
            return Err(LabelError::InvalidCommand(format!(
                "Invalid mask {}: expected 0-{}",
                mask, MAX_QR_MASK
            )));
        }
        self.mask = Some(mask);
        Ok(self)
    }
}

impl Field for QrCode {
    fn emit(&self, _fonts: &FontRegistry, out: &mut Vec<Primitive>) {
        out.push(Primitive::QrCode(self.clone()));
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_barcode_defaults_and_setters() {
        let barcode = Barcode::new("ABC", 1, 2, "128", 50)
            .with_rotation(90)
            .with_readable(Alignment::Center)
            .with_bar_widths(1, 3);
        assert_eq!(barcode.position, Point::new(1, 2));
        assert_eq!(barcode.rotation, 90);
        assert_eq!(barcode.readable, Some(Alignment::Center));
        assert_eq!((barcode.narrow, barcode.wide), (1, 3));
    }

    #[test]
    fn test_barcode_emits_one_primitive() {
        let barcode = Barcode::new("ABC", 1, 2, "128", 50);
        let out = barcode.primitives(&FontRegistry::default());
        assert_eq!(out, vec![Primitive::Barcode(barcode)]);
    }

    #[test]
    fn test_qr_mask_range() {
        let qr = QrCode::new("DATA", 0, 0, 3);
        assert_eq!(qr.clone().with_mask(8).unwrap().mask, Some(8));
        let err = qr.with_mask(9).unwrap_err();
        assert!(matches!(err, LabelError::InvalidCommand(ref m) if m.contains("Invalid mask")));
    }

    #[test]
    fn test_qr_defaults() {
        let qr = QrCode::new("DATA", 0, 0, 3);
        assert_eq!(qr.error_level, QrErrorLevel::M);
        assert_eq!(qr.mode, QrMode::Auto);
        assert_eq!(qr.model, QrModel::M2);
        assert_eq!(qr.mask, None);
    }

    #[test]
    fn test_alignment_codes() {
        assert_eq!(
            [Alignment::Left, Alignment::Center, Alignment::Right].map(Alignment::code),
            [1, 2, 3]
        );
    }
}
