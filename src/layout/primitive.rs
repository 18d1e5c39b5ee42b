//! # Layout Primitives
//!
//! The output of every layout operation: positioned text runs, straight
//! lines, bitmaps and firmware-drawn elements, in label dots with the origin
//! at the top-left.
//!
//! Primitives are plain values. The TSPL generator maps them one-to-one:
//!
//! | Primitive | TSPL command |
//! |-----------|--------------|
//! | `Text`    | `TEXT`       |
//! | `Line`    | `DIAGONAL`   |
//! | `Bitmap`  | `BITMAP`     |
//! | `Rect`    | `BAR`        |
//! | `Block`   | `BLOCK`      |
//! | `Barcode` | `BARCODE`    |
//! | `QrCode`  | `QRCODE`     |

use serde::{Deserialize, Serialize};

use super::barcode::{Barcode, QrCode};
use super::text::TextBlock;
use crate::font::FontSpec;
use crate::render::MonoBitmap;

/// A position in dots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A width/height pair in dots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Inline emphasis flags for a run of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
}

impl TextStyle {
    pub const PLAIN: Self = Self {
        bold: false,
        italic: false,
        underline: false,
        strike: false,
    };
}

/// How a bitmap combines with what's already on the label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineMode {
    #[default]
    Overwrite,
    Or,
    Xor,
}

impl CombineMode {
    /// TSPL `BITMAP` mode parameter.
    pub const fn code(self) -> u8 {
        match self {
            CombineMode::Overwrite => 0,
            CombineMode::Or => 1,
            CombineMode::Xor => 2,
        }
    }
}

/// A positioned drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// A single-line text run in one font variant.
    Text {
        content: String,
        /// Font variant already adjusted for bold/italic
        font: FontSpec,
        style: TextStyle,
        /// Top-left corner of the run
        position: Point,
        /// Box the run was wrapped into, when the field had one
        wrap_box: Option<Size>,
    },
    /// A straight line of the given thickness.
    Line {
        start: Point,
        end: Point,
        thickness: u32,
    },
    /// A packed monochrome bitmap.
    Bitmap {
        bitmap: MonoBitmap,
        position: Point,
        mode: CombineMode,
    },
    /// A filled rectangle.
    Rect {
        position: Point,
        width: u32,
        height: u32,
    },
    /// Text wrapped by the printer inside a box.
    Block(TextBlock),
    Barcode(Barcode),
    QrCode(QrCode),
}

impl Primitive {
    pub fn line(start: Point, end: Point, thickness: u32) -> Self {
        Primitive::Line {
            start,
            end,
            thickness,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Primitive::Text { .. })
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Primitive::Line { .. })
    }

    pub fn is_bitmap(&self) -> bool {
        matches!(self, Primitive::Bitmap { .. })
    }
}
