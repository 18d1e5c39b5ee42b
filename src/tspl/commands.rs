//! # TSPL Commands
//!
//! The subset of the TSPL printer language used for labels.
//!
//! Most commands are a single text line. `DOWNLOAD` and `BITMAP` carry a
//! binary payload between their header and the line terminator:
//!
//! ```text
//! SIZE 50 mm, 25 mm\n
//! BITMAP 10, 20,1,1,0,<1 byte of bitmap data>\n
//! PRINT 1, 1\n
//! ```
//!
//! | Command | Format |
//! |---------|--------|
//! | `SIZE` | `SIZE w, h` with unit suffix |
//! | `GAP` | `GAP gap, offset` with unit suffix |
//! | `DIRECTION` | `DIRECTION d, mirror` (normal = 1) |
//! | `CLS` | clear image buffer |
//! | `DOWNLOAD` | `DOWNLOAD "name",len,<data>` |
//! | `TEXT` | `TEXT x,y,"font",rotation,xmul,ymul,align,"content"` |
//! | `DIAGONAL` | `DIAGONAL x1, y1, x2, y2, thickness` |
//! | `BITMAP` | `BITMAP x, y,width_bytes,height,mode,<data>` |
//! | `BAR` | `BAR x, y, width, height` |
//! | `BLOCK` | `BLOCK x,y,width, height,"font",rotation,xmul,ymul,space,align,"content"` |
//! | `BARCODE` | `BARCODE x,y,"type",height,readable,rotation,narrow,wide,"content"` |
//! | `QRCODE` | `QRCODE x, y, ecc, cell, mode, rotation, model[, Smask], "content"` |
//! | `DISPLAY` | `DISPLAY CLS` / `DISPLAY IMAGE` |
//! | `PRINT` | `PRINT sets, copies` |

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::layout::{Alignment, CombineMode, Point, QrErrorLevel, QrMode, QrModel};
use crate::printer::Unit;
use crate::render::MonoBitmap;

/// Line terminator after every command.
pub const TERMINATOR: &[u8] = b"\n";

/// `TEXT` alignment parameter for left-aligned runs.
pub const ALIGN_LEFT: u8 = Alignment::Left.code();

/// Print direction relative to the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Normal,
    Inverse,
}

impl Direction {
    pub const fn code(self) -> u8 {
        match self {
            Direction::Normal => 1,
            Direction::Inverse => 0,
        }
    }
}

/// What `DISPLAY` does on printers with a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Clear the screen
    Cls,
    /// Show the image buffer
    Image,
}

impl DisplayMode {
    pub const fn keyword(self) -> &'static str {
        match self {
            DisplayMode::Cls => "CLS",
            DisplayMode::Image => "IMAGE",
        }
    }
}

/// A single TSPL command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Size {
        width: f32,
        height: f32,
        unit: Unit,
    },
    Gap {
        gap: f32,
        offset: f32,
        unit: Unit,
    },
    Direction {
        direction: Direction,
        mirror: bool,
    },
    Cls,
    /// Upload a font file to printer memory
    Download { name: String, data: Arc<[u8]> },
    Text {
        position: Point,
        font: String,
        rotation: u16,
        x_multiplier: u32,
        y_multiplier: u32,
        content: String,
    },
    Diagonal {
        start: Point,
        end: Point,
        thickness: u32,
    },
    Bitmap {
        position: Point,
        bitmap: MonoBitmap,
        mode: CombineMode,
    },
    /// Filled black rectangle
    Bar {
        position: Point,
        width: u32,
        height: u32,
    },
    /// Text wrapped by the firmware inside a box
    Block {
        position: Point,
        width: u32,
        height: u32,
        font: String,
        rotation: u16,
        x_multiplier: u32,
        y_multiplier: u32,
        spacing: u32,
        alignment: Alignment,
        content: String,
    },
    Barcode {
        position: Point,
        symbology: String,
        height: u32,
        readable: Option<Alignment>,
        rotation: u16,
        narrow: u32,
        wide: u32,
        content: String,
    },
    QrCode {
        position: Point,
        error_level: QrErrorLevel,
        cell_width: u32,
        mode: QrMode,
        rotation: u16,
        model: QrModel,
        mask: Option<u8>,
        content: String,
    },
    Display(DisplayMode),
    Print { sets: u32, copies: u32 },
}

/// Escape a string for a quoted TSPL parameter.
///
/// TSPL has no backslash escapes; a literal quote is written as `\["]`.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\[\"]"))
}

impl Command {
    /// Binary payload following the header, if any.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Command::Download { data, .. } => Some(data.as_ref()),
            Command::Bitmap { bitmap, .. } => Some(bitmap.bytes()),
            _ => None,
        }
    }

    /// Append this command's bytes to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.to_string().as_bytes());
        if let Some(payload) = self.payload() {
            out.extend_from_slice(payload);
        }
        out.extend_from_slice(TERMINATOR);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_to(&mut out);
        out
    }
}

/// The command line, or for binary commands the header before the payload.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Size {
                width,
                height,
                unit,
            } => write!(f, "SIZE {}, {}", unit.format(*width), unit.format(*height)),
            Command::Gap { gap, offset, unit } => {
                write!(f, "GAP {}, {}", unit.format(*gap), unit.format(*offset))
            }
            Command::Direction { direction, mirror } => {
                write!(f, "DIRECTION {}, {}", direction.code(), u8::from(*mirror))
            }
            Command::Cls => f.write_str("CLS"),
            Command::Download { name, data } => {
                write!(f, "DOWNLOAD {},{},", quote(name), data.len())
            }
            Command::Text {
                position,
                font,
                rotation,
                x_multiplier,
                y_multiplier,
                content,
            } => write!(
                f,
                "TEXT {},{},{},{},{},{},{},{}",
                position.x,
                position.y,
                quote(font),
                rotation,
                x_multiplier,
                y_multiplier,
                ALIGN_LEFT,
                quote(content)
            ),
            Command::Diagonal {
                start,
                end,
                thickness,
            } => write!(
                f,
                "DIAGONAL {}, {}, {}, {}, {}",
                start.x, start.y, end.x, end.y, thickness
            ),
            Command::Bitmap {
                position,
                bitmap,
                mode,
            } => write!(
                f,
                "BITMAP {}, {},{},{},{},",
                position.x,
                position.y,
                bitmap.width_bytes(),
                bitmap.height(),
                mode.code()
            ),
            Command::Bar {
                position,
                width,
                height,
            } => write!(f, "BAR {}, {}, {}, {}", position.x, position.y, width, height),
            Command::Block {
                position,
                width,
                height,
                font,
                rotation,
                x_multiplier,
                y_multiplier,
                spacing,
                alignment,
                content,
            } => write!(
                f,
                "BLOCK {},{},{}, {},{},{},{},{},{},{},{}",
                position.x,
                position.y,
                width,
                height,
                quote(font),
                rotation,
                x_multiplier,
                y_multiplier,
                spacing,
                alignment.code(),
                quote(content)
            ),
            Command::Barcode {
                position,
                symbology,
                height,
                readable,
                rotation,
                narrow,
                wide,
                content,
            } => write!(
                f,
                "BARCODE {},{},{},{},{},{},{},{},{}",
                position.x,
                position.y,
                quote(symbology),
                height,
                readable.map_or(0, Alignment::code),
                rotation,
                narrow,
                wide,
                quote(content)
            ),
            Command::QrCode {
                position,
                error_level,
                cell_width,
                mode,
                rotation,
                model,
                mask,
                content,
            } => {
                write!(
                    f,
                    "QRCODE {}, {}, {}, {}, {}, {}, {}, ",
                    position.x,
                    position.y,
                    error_level.letter(),
                    cell_width,
                    mode.letter(),
                    rotation,
                    model.name()
                )?;
                if let Some(mask) = mask {
                    write!(f, "S{}, ", mask)?;
                }
                f.write_str(&quote(content))
            }
            Command::Display(mode) => write!(f, "DISPLAY {}", mode.keyword()),
            Command::Print { sets, copies } => write!(f, "PRINT {}, {}", sets, copies),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
