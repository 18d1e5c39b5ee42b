//! # Rendering Module
//!
//! This module turns images into printer-ready monochrome bitmaps.
//!
//! ## Modules
//!
//! - [`pixels`]: Decoded RGB/RGBA buffers and the image decoding boundary
//! - [`bitmap`]: Alpha-aware crop, downscale and binarization
//! - [`threshold`]: Otsu thresholding and bit packing
//! - [`morphology`]: Dilation and PBM export
//!
//! ## Usage Example
//!
//! ```
//! use tspl_label::render::bitmap::{convert, ConvertOptions};
//! use tspl_label::render::morphology::dilate;
//! use tspl_label::render::pixels::PixelBuffer;
//!
//! // 16x1 gradient from black to white
//! let data: Vec<u8> = (0..16).flat_map(|i| {
//!     let v = (i * 17) as u8;
//!     [v, v, v]
//! }).collect();
//! let pixels = PixelBuffer::rgb(16, 1, data).unwrap();
//!
//! let bitmap = convert(&pixels, &ConvertOptions::default());
//! let bold = dilate(&bitmap, 1);
//! assert!(bold.black_count() >= bitmap.black_count());
//! ```

pub mod bitmap;
pub mod morphology;
pub mod pixels;
pub mod threshold;

pub use bitmap::{ConvertOptions, MonoBitmap, convert};
pub use pixels::{ImageDecoder, ImageRef, PixelBuffer, PixelSource};
pub use threshold::BitOrder;

use crate::error::LabelError;

/// Decode `source` and convert it to a monochrome bitmap.
///
/// When both target dimensions are set the decoder is asked for that size
/// directly; alpha cropping and downscaling in [`convert`] still apply.
pub fn load_bitmap(
    decoder: &impl PixelSource,
    source: &ImageRef,
    options: &ConvertOptions,
) -> Result<MonoBitmap, LabelError> {
    let target = match (options.width, options.height) {
        (Some(w), Some(h)) => Some((w as u32, h as u32)),
        _ => None,
    };
    let pixels = decoder.decode(source, target)?;
    let bitmap = convert(&pixels, options);
    log::debug!(
        "converted {}x{} image to {}x{} bitmap",
        pixels.width(),
        pixels.height(),
        bitmap.width_dots(),
        bitmap.height()
    );
    Ok(bitmap)
}
