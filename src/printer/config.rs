//! # Printer Configuration
//!
//! This module defines hardware specifications for TSPL label printers and
//! the unit conversions the layout engine relies on.
//!
//! ## Built-in Profiles
//!
//! | Profile | Width (dots) | Resolution |
//! |---------|--------------|------------|
//! | TSPL 203 DPI | 832 | 203 DPI |
//! | TSPL 300 DPI | 1248 | 300 DPI |
//!
//! ## Usage
//!
//! ```
//! use tspl_label::printer::PrinterConfig;
//!
//! let config = PrinterConfig::TSPL_203;
//! assert_eq!(config.mm_to_dots(10.0), 80);
//! ```

use serde::{Deserialize, Serialize};

/// Points per inch, used for font size conversion.
pub const POINTS_PER_INCH: f32 = 72.0;

/// # Printer Configuration
///
/// Defines the hardware characteristics of a label printer.
///
/// ## Calculations
///
/// ```text
/// dots_per_mm = dpi / 25.4
/// points      = dots * 72 / dpi
/// dots        = points * dpi / 72
///
/// For 203 DPI:
///   dots_per_mm = 203 / 25.4 ≈ 8
///   10 dots ≈ 3.5 pt
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Printer profile name
    pub name: &'static str,

    /// Maximum print width in dots
    pub width_dots: u16,

    /// Resolution in dots per inch
    pub dpi: u16,
}

impl PrinterConfig {
    /// Generic 4-inch TSPL desktop printer at 203 DPI.
    pub const TSPL_203: Self = Self {
        name: "TSPL 203 DPI",
        width_dots: 832,
        dpi: 203,
    };

    /// Generic 4-inch TSPL desktop printer at 300 DPI.
    pub const TSPL_300: Self = Self {
        name: "TSPL 300 DPI",
        width_dots: 1248,
        dpi: 300,
    };

    /// Configuration for an arbitrary resolution.
    ///
    /// Known resolutions map to their built-in profile.
    pub fn with_dpi(dpi: u16) -> Self {
        match dpi {
            203 => Self::TSPL_203,
            300 => Self::TSPL_300,
            _ => Self {
                name: "Custom",
                width_dots: (4.0 * dpi as f32).round() as u16,
                dpi,
            },
        }
    }

    /// Calculate dots per millimeter
    #[inline]
    pub fn dots_per_mm(&self) -> f32 {
        self.dpi as f32 / 25.4
    }

    /// Convert millimeters to dots
    #[inline]
    pub fn mm_to_dots(&self, mm: f32) -> u16 {
        (mm * self.dots_per_mm()).round() as u16
    }

    /// Convert dots to millimeters
    #[inline]
    pub fn dots_to_mm(&self, dots: u16) -> f32 {
        dots as f32 / self.dots_per_mm()
    }

    /// Convert a length in dots to typographic points.
    #[inline]
    pub fn dots_to_points(&self, dots: f32) -> f32 {
        dots * POINTS_PER_INCH / self.dpi as f32
    }

    /// Convert typographic points to dots.
    #[inline]
    pub fn points_to_dots(&self, points: f32) -> f32 {
        points * self.dpi as f32 / POINTS_PER_INCH
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::TSPL_203
    }
}

// ============================================================================
// MEASUREMENT UNITS
// ============================================================================

/// Unit used for label dimensions in setup commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Millimeters (`SIZE 50 mm, 25 mm`)
    #[default]
    Metric,
    /// Inches (`SIZE 2, 1`)
    Imperial,
    /// Printer dots (`SIZE 400 dot, 200 dot`)
    Dot,
}

impl Unit {
    /// Format a value with this unit's TSPL suffix.
    ///
    /// ```
    /// use tspl_label::printer::Unit;
    ///
    /// assert_eq!(Unit::Metric.format(50.0), "50 mm");
    /// assert_eq!(Unit::Dot.format(10.0), "10 dot");
    /// assert_eq!(Unit::Imperial.format(1.5), "1.5");
    /// ```
    pub fn format(self, value: f32) -> String {
        match self {
            Unit::Metric => format!("{} mm", value),
            Unit::Imperial => format!("{}", value),
            Unit::Dot => format!("{} dot", value),
        }
    }

    /// Convert a value in this unit to dots for the given printer.
    pub fn to_dots(self, value: f32, config: &PrinterConfig) -> f32 {
        match self {
            Unit::Metric => value * config.dots_per_mm(),
            Unit::Imperial => value * config.dpi as f32,
            Unit::Dot => value,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
