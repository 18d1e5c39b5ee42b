//! # TSPL Output
//!
//! Command definitions and code generation for TSPL label printers.
//!
//! ```text
//! Label → primitives → codegen → Program → bytes
//! ```
//!
//! ## Modules
//!
//! - [`commands`]: Individual TSPL commands and their byte encoding
//! - [`codegen`]: Setup, font upload and primitive conversion

pub mod codegen;
pub mod commands;

pub use codegen::{LabelSetup, Program, font_downloads, primitive_command, primitive_commands};
pub use commands::{Command, Direction, DisplayMode};
