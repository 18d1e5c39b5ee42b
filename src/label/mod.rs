//! # Label Documents
//!
//! A [`Label`] owns everything needed to print one label design: the
//! physical setup, the printer resolution, the registered fonts and the
//! fields placed on it.
//!
//! ## Example
//!
//! ```
//! use tspl_label::label::Label;
//! use tspl_label::layout::{Point, LineField, TextField, Table, TableOptions};
//! use tspl_label::printer::Unit;
//!
//! let mut label = Label::new(50.0, 25.0, Unit::Metric, 203);
//! label
//!     .add(TextField::new("<b>SKU</b> 1234", 10, 10, true))
//!     .add(LineField::new(Point::new(10, 30), Point::new(300, 30)))
//!     .add(Table::new(10, 40, vec![vec!["A".into(), "B".into()]], TableOptions::default()));
//!
//! let program = label.print_commands(1, 1);
//! assert_eq!(label.display_commands().lines().last().map(String::as_str), Some("DISPLAY IMAGE"));
//! let lines = program.lines();
//! assert_eq!(lines[0], "SIZE 50 mm, 25 mm");
//! assert_eq!(lines.last().map(String::as_str), Some("PRINT 1, 1"));
//! ```
//!
//! ## JSON
//!
//! Labels can also be described in JSON, see [`json`].

pub mod json;

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::LabelError;
use crate::font::{FontMetrics, FontRegistry, FontStyle};
use crate::layout::{Field, Primitive};
use crate::printer::{PrinterConfig, Unit};
use crate::tspl::{Command, DisplayMode, LabelSetup, Program, font_downloads, primitive_commands};

/// A label design.
pub struct Label {
    setup: LabelSetup,
    fonts: FontRegistry,
    fields: Vec<Box<dyn Field>>,
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Label")
            .field("setup", &self.setup)
            .field("fonts", &self.fonts.fonts().len())
            .field("fields", &self.fields.len())
            .finish()
    }
}

impl Label {
    /// A `width × height` label in `unit`, printed at `dpi`.
    pub fn new(width: f32, height: f32, unit: Unit, dpi: u16) -> Self {
        Self::with_setup(LabelSetup::new(width, height, unit), PrinterConfig::with_dpi(dpi))
    }

    pub fn with_setup(setup: LabelSetup, config: PrinterConfig) -> Self {
        Self {
            setup,
            fonts: FontRegistry::new(config),
            fields: Vec::new(),
        }
    }

    pub fn setup(&self) -> &LabelSetup {
        &self.setup
    }

    pub fn setup_mut(&mut self) -> &mut LabelSetup {
        &mut self.setup
    }

    pub fn config(&self) -> &PrinterConfig {
        self.fonts.config()
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Label size in dots.
    pub fn size_dots(&self) -> (f32, f32) {
        let config = self.config();
        (
            self.setup.unit.to_dots(self.setup.width, config),
            self.setup.unit.to_dots(self.setup.height, config),
        )
    }

    /// Register TTF/OTF font data for `family`.
    ///
    /// Fonts are uploaded to the printer in registration order as
    /// `f0.TTF`, `f1.TTF`, ...
    pub fn register_font(
        &mut self,
        family: impl Into<String>,
        data: Vec<u8>,
        weight: u16,
        style: FontStyle,
    ) -> Result<(), LabelError> {
        self.fonts.register_font(family, data, weight, style)?;
        Ok(())
    }

    /// Register a font variant with custom metrics.
    pub fn register_metrics(
        &mut self,
        family: impl Into<String>,
        metrics: Arc<dyn FontMetrics>,
        data: Vec<u8>,
        weight: u16,
        style: FontStyle,
    ) {
        self.fonts
            .register_metrics(family, metrics, data, weight, style);
    }

    /// Place a field on the label.
    pub fn add(&mut self, field: impl Field + 'static) -> &mut Self {
        self.fields.push(Box::new(field));
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Lay out every field, in the order they were added.
    pub fn primitives(&self) -> Vec<Primitive> {
        let per_field: Vec<Vec<Primitive>> = self
            .fields
            .par_iter()
            .map(|field| field.primitives(&self.fonts))
            .collect();
        let primitives: Vec<Primitive> = per_field.into_iter().flatten().collect();
        log::debug!(
            "laid out {} fields into {} primitives",
            self.fields.len(),
            primitives.len()
        );
        primitives
    }

    /// Drawing commands for the fields only.
    pub fn commands(&self) -> Program {
        Program {
            commands: primitive_commands(&self.primitives(), &self.fonts),
        }
    }

    /// A complete print job: font uploads, setup, fields and `PRINT`.
    pub fn print_commands(&self, sets: u32, copies: u32) -> Program {
        let mut program = Program::new();
        program.extend(font_downloads(&self.fonts));
        program.extend(self.setup.commands());
        program.extend(self.commands().commands);
        program.push(Command::Print { sets, copies });
        program
    }

    pub fn print_bytes(&self, sets: u32, copies: u32) -> Vec<u8> {
        self.print_commands(sets, copies).to_bytes()
    }

    /// Show the label on the printer's screen instead of printing it.
    pub fn display_commands(&self) -> Program {
        let mut program = Program::new();
        program.extend(font_downloads(&self.fonts));
        program.extend(self.setup.commands());
        program.push(Command::Display(DisplayMode::Cls));
        program.extend(self.commands().commands);
        program.push(Command::Display(DisplayMode::Image));
        program
    }

    pub fn display_bytes(&self) -> Vec<u8> {
        self.display_commands().to_bytes()
    }
}

// ============================================================================
// TESTS
// ============================================================================
