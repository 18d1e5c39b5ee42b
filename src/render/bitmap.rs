//! # Monochrome Bitmap Conversion
//!
//! Turns decoded RGBA pixels into the 1-bit bitmaps sent with the TSPL
//! `BITMAP` command.
//!
//! ## Pipeline
//!
//! ```text
//! PixelBuffer
//!   │ 1. crop to pixels with alpha >= 16 (RGBA only)
//!   │ 2. pick target size (explicit or aspect-preserving)
//!   │ 3. pad width to a multiple of 8 (padding is white)
//!   │ 4. box-downsample each destination cell to one luminance
//!   │ 5. threshold (explicit or Otsu over content columns)
//!   │ 6. pack 8 pixels per byte
//!   ▼
//! MonoBitmap (0 = black, 1 = white)
//! ```
//!
//! ## Sparse Strokes
//!
//! Averaging a cell that is mostly transparent washes thin lines out to
//! near-white. When fewer than a quarter of the source pixels in a cell are
//! opaque, the darkest opaque pixel is used instead of the mean.

use rayon::prelude::*;

use super::pixels::PixelBuffer;
use super::threshold::{self, BitOrder};
use crate::error::LabelError;

/// Pixels with alpha below this value are ignored when cropping.
pub const CROP_ALPHA_THRESHOLD: u8 = 16;

/// Below this opaque ratio a cell uses its darkest opaque pixel.
const SPARSE_OPAQUE_RATIO: f64 = 0.25;

/// A packed 1-bit bitmap in printer polarity (0 = black, 1 = white).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoBitmap {
    width_bytes: usize,
    height: usize,
    bytes: Vec<u8>,
}

impl MonoBitmap {
    /// Wrap packed bytes, validating `bytes.len() == width_bytes * height`.
    pub fn new(width_bytes: usize, height: usize, bytes: Vec<u8>) -> Result<Self, LabelError> {
        if bytes.len() != width_bytes * height {
            return Err(LabelError::InvalidBitmap(format!(
                "expected {} bytes for {} bytes x {} rows, got {}",
                width_bytes * height,
                width_bytes,
                height,
                bytes.len()
            )));
        }
        Ok(Self {
            width_bytes,
            height,
            bytes,
        })
    }

    /// Wrap bytes already known to match the dimensions.
    pub(crate) fn from_parts(width_bytes: usize, height: usize, bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len(), width_bytes * height);
        Self {
            width_bytes,
            height,
            bytes,
        }
    }

    /// An all-white bitmap.
    pub fn blank(width_bytes: usize, height: usize) -> Self {
        Self {
            width_bytes,
            height,
            bytes: vec![0xFF; width_bytes * height],
        }
    }

    /// A bitmap with no pixels.
    pub fn empty() -> Self {
        Self::blank(0, 0)
    }

    pub fn width_bytes(&self) -> usize {
        self.width_bytes
    }

    /// Row length in pixels, padding included.
    pub fn width_dots(&self) -> usize {
        self.width_bytes * 8
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.width_bytes == 0 || self.height == 0
    }

    /// Packed bytes of row `y`.
    pub fn row(&self, y: usize) -> &[u8] {
        &self.bytes[y * self.width_bytes..(y + 1) * self.width_bytes]
    }

    /// Whether the pixel at (x, y) is black, assuming MSB-first packing.
    ///
    /// Out-of-bounds pixels are white.
    #[inline]
    pub fn is_black(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width_dots() || y as usize >= self.height {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        let byte = self.bytes[y * self.width_bytes + (x >> 3)];
        (byte >> (7 - (x & 7))) & 1 == 0
    }

    /// Number of black pixels, padding included.
    pub fn black_count(&self) -> usize {
        self.bytes.iter().map(|b| b.count_zeros() as usize).sum()
    }
}

// ============================================================================
// CONVERSION
// ============================================================================

/// Options for [`convert`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Destination width in dots
    pub width: Option<usize>,
    /// Destination height in dots
    pub height: Option<usize>,
    /// Fixed threshold; `None` selects one with Otsu's method
    pub threshold: Option<u8>,
    /// Pixel order inside each byte
    pub bit_order: BitOrder,
}

impl ConvertOptions {
    /// Options targeting a fixed box, the rest defaulted.
    pub fn sized(width: Option<usize>, height: Option<usize>) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

/// Inclusive source rectangle that survives alpha cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CropBox {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl CropBox {
    fn width(&self) -> usize {
        self.x1 - self.x0 + 1
    }

    fn height(&self) -> usize {
        self.y1 - self.y0 + 1
    }
}

/// Bounding box of pixels with alpha >= [`CROP_ALPHA_THRESHOLD`].
///
/// Opaque buffers, and buffers where nothing qualifies, use the full bounds.
fn alpha_crop(pixels: &PixelBuffer) -> CropBox {
    let full = CropBox {
        x0: 0,
        y0: 0,
        x1: pixels.width() - 1,
        y1: pixels.height() - 1,
    };
    if !pixels.has_alpha() {
        return full;
    }

    let mut bounds: Option<CropBox> = None;
    for y in 0..pixels.height() {
        for x in 0..pixels.width() {
            if pixels.alpha_at(x, y) < CROP_ALPHA_THRESHOLD {
                continue;
            }
            bounds = Some(match bounds {
                None => CropBox {
                    x0: x,
                    y0: y,
                    x1: x,
                    y1: y,
                },
                Some(b) => CropBox {
                    x0: b.x0.min(x),
                    y0: b.y0.min(y),
                    x1: b.x1.max(x),
                    y1: b.y1.max(y),
                },
            });
        }
    }
    bounds.unwrap_or(full)
}

/// Fit a size to the requested box, preserving aspect ratio when only one
/// side is given.
///
/// ```
/// use tspl_label::render::bitmap::size_preserve_aspect;
///
/// assert_eq!(size_preserve_aspect(100, 50, Some(20), Some(10)), (20, 10));
/// assert_eq!(size_preserve_aspect(100, 50, None, Some(25)), (50, 25));
/// assert_eq!(size_preserve_aspect(100, 50, Some(20), None), (20, 10));
/// assert_eq!(size_preserve_aspect(100, 50, None, None), (100, 50));
/// ```
pub fn size_preserve_aspect(
    width: usize,
    height: usize,
    desired_width: Option<usize>,
    desired_height: Option<usize>,
) -> (usize, usize) {
    match (desired_width, desired_height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) if width > 0 => {
            let h = (w as f64 * height as f64 / width as f64).round() as usize;
            (w, h.max(1))
        }
        (None, Some(h)) if height > 0 => {
            let w = (h as f64 * width as f64 / height as f64).round() as usize;
            (w.max(1), h)
        }
        _ => (width, height),
    }
}

/// Source interval `[start, end]` covered by destination index `i`.
#[inline]
fn source_span(i: usize, src: usize, dst: usize, offset: usize) -> (usize, usize) {
    let start = offset + (i * src) / dst;
    let end = (offset + ((i + 1) * src) / dst).saturating_sub(1).max(start);
    (start, end)
}

/// Luminance of one destination cell covering source `[x0..=x1] x [y0..=y1]`.
fn cell_luminance(pixels: &PixelBuffer, (x0, x1): (usize, usize), (y0, y1): (usize, usize)) -> u8 {
    let mut count = 0u32;
    let mut opaque_count = 0u32;
    let mut opaque_lum_sum = 0.0f64;
    let mut opaque_weight_sum = 0.0f64;
    let mut min_opaque_lum = 255.0f64;

    for sy in y0..=y1 {
        for sx in x0..=x1 {
            let [r, g, b, a] = pixels.rgba_at(sx, sy);
            count += 1;
            if a == 0 {
                continue;
            }
            let alpha = a as f64 / 255.0;
            let lum = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
            opaque_count += 1;
            opaque_lum_sum += lum * alpha;
            opaque_weight_sum += alpha;
            if lum < min_opaque_lum {
                min_opaque_lum = lum;
            }
        }
    }

    if opaque_count == 0 {
        return 255;
    }

    let opaque_ratio = opaque_count as f64 / count as f64;
    let luminance = if opaque_ratio < SPARSE_OPAQUE_RATIO {
        min_opaque_lum
    } else {
        opaque_lum_sum / opaque_weight_sum
    };
    luminance.round().clamp(0.0, 255.0) as u8
}

/// Convert pixels to a monochrome bitmap.
///
/// ## Example
///
/// ```
/// use tspl_label::render::bitmap::{convert, ConvertOptions};
/// use tspl_label::render::pixels::PixelBuffer;
///
/// // Black, white / transparent, white
/// let pixels = PixelBuffer::rgba(2, 2, vec![
///     0, 0, 0, 255,   255, 255, 255, 255,
///     0, 0, 0, 0,     255, 255, 255, 255,
/// ]).unwrap();
///
/// let bitmap = convert(&pixels, &ConvertOptions::default());
/// assert_eq!(bitmap.width_bytes(), 1);
/// assert_eq!(bitmap.bytes(), &[0x7F, 0xFF]);
/// ```
pub fn convert(pixels: &PixelBuffer, options: &ConvertOptions) -> MonoBitmap {
    if pixels.is_empty() {
        return MonoBitmap::empty();
    }

    let crop = alpha_crop(pixels);
    let (crop_width, crop_height) = (crop.width(), crop.height());
    let (dst_width, dst_height) =
        size_preserve_aspect(crop_width, crop_height, options.width, options.height);
    if dst_width == 0 || dst_height == 0 {
        return MonoBitmap::empty();
    }

    let row_width = dst_width.div_ceil(8) * 8;

    let mut luminances = vec![255u8; row_width * dst_height];
    luminances
        .par_chunks_mut(row_width)
        .enumerate()
        .for_each(|(h, row)| {
            let ys = source_span(h, crop_height, dst_height, crop.y0);
            for (w, lum) in row.iter_mut().take(dst_width).enumerate() {
                let xs = source_span(w, crop_width, dst_width, crop.x0);
                *lum = cell_luminance(pixels, xs, ys);
            }
        });

    let threshold = options.threshold.unwrap_or_else(|| {
        let hist = threshold::histogram(&luminances, dst_width, row_width, dst_height);
        threshold::otsu_threshold(&hist)
    });
    log::debug!(
        "converting {}x{} (cropped {}x{}) to {}x{} at threshold {}",
        pixels.width(),
        pixels.height(),
        crop_width,
        crop_height,
        dst_width,
        dst_height,
        threshold
    );

    let bytes: Vec<u8> = luminances
        .par_chunks(row_width)
        .flat_map_iter(|row| {
            let white: Vec<bool> = row
                .iter()
                .enumerate()
                .map(|(x, &lum)| x >= dst_width || lum > threshold)
                .collect();
            threshold::pack_row(&white, options.bit_order)
        })
        .collect();

    MonoBitmap::from_parts(row_width / 8, dst_height, bytes)
}

// ============================================================================
// TESTS
// ============================================================================
