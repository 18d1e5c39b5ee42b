//! # Code Generation
//!
//! Converts label setup and layout primitives into a TSPL [`Program`].
//!
//! ## Print Job Layout
//!
//! ```text
//! DOWNLOAD "f0.TTF",...     one per registered font
//! SIZE / GAP / DIRECTION    label setup
//! CLS
//! TEXT / DIAGONAL / BITMAP  one per primitive, in order
//! BAR / BLOCK / BARCODE / QRCODE
//! PRINT sets, copies
//! ```
//!
//! ## Display Job Layout
//!
//! Printers with a screen show the label instead of printing it:
//!
//! ```text
//! DOWNLOAD "f0.TTF",...
//! SIZE / GAP / DIRECTION
//! CLS
//! DISPLAY CLS
//! ...field commands...
//! DISPLAY IMAGE
//! ```

use serde::{Deserialize, Serialize};

use super::commands::{Command, Direction};
use crate::font::{FontRegistry, FontSpec};
use crate::layout::Primitive;
use crate::printer::Unit;

/// Physical label setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSetup {
    pub width: f32,
    pub height: f32,
    pub unit: Unit,
    /// Gap between labels
    pub gap: f32,
    pub gap_offset: f32,
    pub direction: Direction,
    pub mirror: bool,
}

impl Default for LabelSetup {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 25.0,
            unit: Unit::Metric,
            gap: 2.0,
            gap_offset: 0.0,
            direction: Direction::Normal,
            mirror: false,
        }
    }
}

impl LabelSetup {
    pub fn new(width: f32, height: f32, unit: Unit) -> Self {
        Self {
            width,
            height,
            unit,
            ..Default::default()
        }
    }

    /// `SIZE`, `GAP`, `DIRECTION` and `CLS`.
    pub fn commands(&self) -> Vec<Command> {
        vec![
            Command::Size {
                width: self.width,
                height: self.height,
                unit: self.unit,
            },
            Command::Gap {
                gap: self.gap,
                offset: self.gap_offset,
                unit: self.unit,
            },
            Command::Direction {
                direction: self.direction,
                mirror: self.mirror,
            },
            Command::Cls,
        ]
    }
}

/// An ordered list of TSPL commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub commands: Vec<Command>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.commands.extend(commands);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Command lines (headers only for binary commands).
    pub fn lines(&self) -> Vec<String> {
        self.commands.iter().map(ToString::to_string).collect()
    }

    /// Encode the whole program.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for command in &self.commands {
            command.write_to(&mut out);
        }
        out
    }
}

/// `DOWNLOAD` commands for every registered font, in registration order.
pub fn font_downloads(fonts: &FontRegistry) -> Vec<Command> {
    fonts
        .fonts()
        .iter()
        .map(|font| Command::Download {
            name: font.alias.clone(),
            data: font.data.clone(),
        })
        .collect()
}

/// `TEXT`/`BLOCK` multiplier for a font request.
///
/// Registered fonts are scaled to their size in points; built-in printer
/// fonts are printed at 1×1.
fn font_multiplier(font: &FontSpec, fonts: &FontRegistry) -> u32 {
    if fonts.resolve_spec(font).is_some() {
        (fonts.config().dots_to_points(font.size as f32).round() as u32).max(1)
    } else {
        1
    }
}

/// Convert one primitive into its TSPL command.
pub fn primitive_command(primitive: &Primitive, fonts: &FontRegistry) -> Command {
    match primitive {
        Primitive::Text {
            content,
            font,
            position,
            ..
        } => {
            let multiplier = font_multiplier(font, fonts);
            Command::Text {
                position: *position,
                font: fonts.font_name(font),
                rotation: 0,
                x_multiplier: multiplier,
                y_multiplier: multiplier,
                content: content.clone(),
            }
        }
        Primitive::Block(block) => {
            let multiplier = font_multiplier(&block.font, fonts);
            Command::Block {
                position: block.position,
                width: block.width,
                height: block.height,
                font: fonts.font_name(&block.font),
                rotation: block.rotation,
                x_multiplier: multiplier,
                y_multiplier: multiplier,
                spacing: block.spacing,
                alignment: block.alignment,
                content: block.content.clone(),
            }
        }
        Primitive::Rect {
            position,
            width,
            height,
        } => Command::Bar {
            position: *position,
            width: *width,
            height: *height,
        },
        Primitive::Barcode(barcode) => Command::Barcode {
            position: barcode.position,
            symbology: barcode.symbology.clone(),
            height: barcode.height,
            readable: barcode.readable,
            rotation: barcode.rotation,
            narrow: barcode.narrow,
            wide: barcode.wide,
            content: barcode.content.clone(),
        },
        Primitive::QrCode(qr) => Command::QrCode {
            position: qr.position,
            error_level: qr.error_level,
            cell_width: qr.cell_width,
            mode: qr.mode,
            rotation: qr.rotation,
            model: qr.model,
            mask: qr.mask,
            content: qr.content.clone(),
        },
        Primitive::Line {
            start,
            end,
            thickness,
        } => Command::Diagonal {
            start: *start,
            end: *end,
            thickness: *thickness,
        },
        Primitive::Bitmap {
            bitmap,
            position,
            mode,
        } => Command::Bitmap {
            position: *position,
            bitmap: bitmap.clone(),
            mode: *mode,
        },
    }
}

/// Commands for a list of primitives, in order.
pub fn primitive_commands(primitives: &[Primitive], fonts: &FontRegistry) -> Vec<Command> {
    primitives
        .iter()
        .map(|p| primitive_command(p, fonts))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
