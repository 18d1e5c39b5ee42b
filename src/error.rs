//! # Error Types
//!
//! This module defines error types used throughout the tspl-label library.
//!
//! Only malformed or undecodable input is an error. Layout never fails:
//! overflowing text is clipped or force-split, unknown fonts fall back to an
//! estimate and table tracks are clamped to a minimum size.

use thiserror::Error;

/// Main error type for tspl-label operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// Image source could not be read or is in an unsupported format
    #[error("Decode error: {0}")]
    Decode(String),

    /// Pixel buffer dimensions do not match its data
    #[error("Invalid pixel buffer: {0}")]
    InvalidPixels(String),

    /// Monochrome bitmap dimensions do not match its data
    #[error("Invalid bitmap: {0}")]
    InvalidBitmap(String),

    /// Font data could not be parsed
    #[error("Font error: {0}")]
    Font(String),

    /// Command parameter out of range
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Malformed label description
    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
