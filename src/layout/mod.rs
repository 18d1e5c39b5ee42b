//! # Layout
//!
//! Turns label fields into positioned [`Primitive`]s.
//!
//! ## Modules
//!
//! - [`primitive`]: Output values (text runs, lines, bitmaps)
//! - [`markup`]: Inline tag parsing into a tagged AST
//! - [`text`]: Word wrapping, height clipping and decorations
//! - [`table`]: Track sizing and grid emission
//! - [`graphics`]: Line, rectangle and image fields
//! - [`barcode`]: 1D barcodes and QR codes
//!
//! ## Field Trait
//!
//! Every field appends its primitives to a shared output list, measuring
//! text through the label's [`FontRegistry`]:
//!
//! ```
//! use tspl_label::font::FontRegistry;
//! use tspl_label::layout::{Field, TextField};
//!
//! let fonts = FontRegistry::default();
//! let mut out = Vec::new();
//! TextField::new("<b>Hello</b> world", 10, 10, true).emit(&fonts, &mut out);
//! assert_eq!(out.len(), 2);
//! ```

pub mod barcode;
pub mod graphics;
pub mod markup;
pub mod primitive;
pub mod table;
pub mod text;

pub use barcode::{Alignment, Barcode, QrCode, QrErrorLevel, QrMode, QrModel};
pub use graphics::{ImageField, LineField, RectField};
pub use primitive::{CombineMode, Point, Primitive, Size, TextStyle};
pub use table::{Table, TableOptions, TableSize};
pub use text::{LayoutLine, LayoutRun, TextBlock, TextField, layout};

use crate::font::FontRegistry;

/// Something that can be placed on a label.
pub trait Field: Send + Sync {
    /// Append this field's primitives to `out`.
    fn emit(&self, fonts: &FontRegistry, out: &mut Vec<Primitive>);

    /// This field's primitives on their own.
    fn primitives(&self, fonts: &FontRegistry) -> Vec<Primitive> {
        let mut out = Vec::new();
        self.emit(fonts, &mut out);
        out
    }
}

impl Field for Box<dyn Field> {
    fn emit(&self, fonts: &FontRegistry, out: &mut Vec<Primitive>) {
        self.as_ref().emit(fonts, out);
    }
}

impl<T: Field + ?Sized> Field for &T {
    fn emit(&self, fonts: &FontRegistry, out: &mut Vec<Primitive>) {
        (*self).emit(fonts, out);
    }
}
