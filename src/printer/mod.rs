//! # Printer Module
//!
//! This module provides printer-specific configurations and utilities.
//!
//! ## Modules
//!
//! - [`config`]: Printer resolution profiles and unit conversion

pub mod config;

pub use config::{PrinterConfig, Unit};
