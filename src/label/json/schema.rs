//! JSON schema types for label files.

use std::path::PathBuf;

use serde::Deserialize;

use crate::font::{FontSpec, FontStyle, NORMAL_WEIGHT};
use crate::layout::graphics::DEFAULT_LINE_THICKNESS;
use crate::layout::{Alignment, CombineMode, Point, QrErrorLevel, QrMode, QrModel, TableOptions};
use crate::printer::PrinterConfig;
use crate::render::BitOrder;
use crate::tspl::LabelSetup;

fn default_true() -> bool {
    true
}

fn default_dpi() -> u16 {
    PrinterConfig::TSPL_203.dpi
}

fn default_weight() -> u16 {
    NORMAL_WEIGHT
}

fn default_thickness() -> u32 {
    DEFAULT_LINE_THICKNESS
}

fn default_bar_width() -> u32 {
    2
}

/// Top-level label file.
#[derive(Debug, Deserialize)]
pub struct JsonLabel {
    /// Label size, unit, gap and direction.
    #[serde(default)]
    pub setup: LabelSetup,
    /// Printer resolution (default: 203).
    #[serde(default = "default_dpi")]
    pub dpi: u16,
    /// Font files to register, in upload order.
    #[serde(default)]
    pub fonts: Vec<JsonFont>,
    /// Fields to place on the label, in drawing order.
    #[serde(default)]
    pub fields: Vec<JsonField>,
}

/// A font file registered as one variant of a family.
#[derive(Debug, Deserialize)]
pub struct JsonFont {
    pub family: String,
    /// TTF/OTF file, relative to the label file.
    pub path: PathBuf,
    #[serde(default = "default_weight")]
    pub weight: u16,
    #[serde(default)]
    pub style: FontStyle,
}

/// A single field on the label.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonField {
    Text(JsonText),
    Table(JsonTable),
    Line(JsonLine),
    Image(JsonImage),
    Rect(JsonRect),
    Block(JsonBlock),
    Barcode(JsonBarcode),
    QrCode(JsonQrCode),
}

/// Text with optional markup and wrapping box.
#[derive(Debug, Deserialize)]
pub struct JsonText {
    pub content: String,
    pub x: i32,
    pub y: i32,
    /// Interpret inline tags (default: true).
    #[serde(default = "default_true")]
    pub formatted: bool,
    #[serde(default)]
    pub font: FontSpec,
    /// Wrap width in dots.
    #[serde(default)]
    pub width: Option<f32>,
    /// Clip height in dots; requires `width`.
    #[serde(default)]
    pub height: Option<f32>,
}

/// Table of text cells.
#[derive(Debug, Deserialize)]
pub struct JsonTable {
    pub x: i32,
    pub y: i32,
    pub rows: Vec<Vec<String>>,
    #[serde(flatten)]
    pub options: TableOptions,
}

/// Straight line.
#[derive(Debug, Deserialize)]
pub struct JsonLine {
    pub start: Point,
    pub end: Point,
    #[serde(default = "default_thickness")]
    pub thickness: u32,
}

/// Raster image converted to a monochrome bitmap.
#[derive(Debug, Deserialize)]
pub struct JsonImage {
    /// Image file, relative to the label file.
    pub path: PathBuf,
    pub x: i32,
    pub y: i32,
    /// Target width in dots.
    #[serde(default)]
    pub width: Option<usize>,
    /// Target height in dots.
    #[serde(default)]
    pub height: Option<usize>,
    /// Fixed luminance threshold; Otsu when absent.
    #[serde(default)]
    pub threshold: Option<u8>,
    /// Dilation passes applied after conversion.
    #[serde(default)]
    pub dilation: usize,
    #[serde(default)]
    pub mode: CombineMode,
    #[serde(default)]
    pub bit_order: BitOrder,
}

/// Filled rectangle.
#[derive(Debug, Deserialize)]
pub struct JsonRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Text wrapped by the printer inside a box.
#[derive(Debug, Deserialize)]
pub struct JsonBlock {
    pub content: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub font: FontSpec,
    #[serde(default)]
    pub rotation: u16,
    /// Extra line spacing in dots.
    #[serde(default)]
    pub spacing: u32,
    #[serde(default)]
    pub alignment: Alignment,
}

/// 1D barcode drawn by the printer.
#[derive(Debug, Deserialize)]
pub struct JsonBarcode {
    pub content: String,
    pub x: i32,
    pub y: i32,
    /// Printer code type, e.g. `"128"` or `"EAN13"`.
    pub symbology: String,
    pub height: u32,
    /// Human-readable text alignment; no text when absent.
    #[serde(default)]
    pub readable: Option<Alignment>,
    #[serde(default)]
    pub rotation: u16,
    #[serde(default = "default_bar_width")]
    pub narrow: u32,
    #[serde(default = "default_bar_width")]
    pub wide: u32,
}

/// QR code drawn by the printer.
#[derive(Debug, Deserialize)]
pub struct JsonQrCode {
    pub content: String,
    pub x: i32,
    pub y: i32,
    /// Module size in dots.
    pub cell_width: u32,
    #[serde(default)]
    pub error_level: QrErrorLevel,
    #[serde(default)]
    pub mode: QrMode,
    #[serde(default)]
    pub rotation: u16,
    #[serde(default)]
    pub model: QrModel,
    /// Mask pattern 0-8; chosen by the printer when absent.
    #[serde(default)]
    pub mask: Option<u8>,
}
