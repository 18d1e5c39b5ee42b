//! # tspl-label - Label Rendering for TSPL Printers
//!
//! tspl-label turns label designs (text, tables, lines, images and barcodes) into
//! TSPL command streams for thermal label printers. It provides:
//!
//! - **Image conversion**: alpha-aware cropping, area downsampling and Otsu
//!   thresholding into packed 1-bit bitmaps
//! - **Text layout**: inline markup, font-metric word wrapping, height
//!   clipping and synthesized underline/strike lines
//! - **Tables**: explicit, proportional or content-measured tracks
//! - **Barcodes**: 1D barcodes and QR codes drawn by the printer firmware
//! - **TSPL output**: setup, font upload, drawing, print and display commands
//!
//! ## Quick Start
//!
//! ```
//! use tspl_label::label::Label;
//! use tspl_label::layout::TextField;
//! use tspl_label::printer::Unit;
//!
//! let mut label = Label::new(50.0, 25.0, Unit::Metric, 203);
//! label.add(TextField::new("<b>Fragile</b> handle with care", 10, 10, true).multi_line(200.0, None));
//!
//! let bytes = label.print_bytes(1, 1);
//! assert!(bytes.starts_with(b"SIZE 50 mm, 25 mm\n"));
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`render`] | Image → monochrome bitmap conversion, dilation, PBM export |
//! | [`font`] | Font variants, metrics and text measurement |
//! | [`layout`] | Text, table, line, image and barcode fields → primitives |
//! | [`tspl`] | TSPL commands and code generation |
//! | [`label`] | Label documents and JSON label files |
//! | [`printer`] | Printer resolutions and units |
//! | [`error`] | Error types |

pub mod error;
pub mod font;
pub mod label;
pub mod layout;
pub mod printer;
pub mod render;
pub mod tspl;

// Re-exports for convenience
pub use error::LabelError;
pub use label::Label;
pub use printer::PrinterConfig;
