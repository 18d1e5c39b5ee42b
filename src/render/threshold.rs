//! # Thresholding and Bit Packing
//!
//! Converts 8-bit luminance into 1-bit monochrome rows for the printer.
//!
//! ## Otsu's Method
//!
//! Instead of a fixed cut-off, the threshold is chosen from the luminance
//! histogram so that the two resulting classes (ink and paper) are as far
//! apart as possible:
//!
//! ```text
//! for t in 0..=255:
//!     wB = pixels with lum <= t     mB = their mean
//!     wF = pixels with lum >  t     mF = their mean
//!     between(t) = wB * wF * (mB - mF)^2
//! threshold = first t with the largest between(t)
//! ```
//!
//! A bimodal image (pure black on pure white) splits exactly between the
//! two clusters.
//!
//! ## Bit Packing
//!
//! Label bitmaps use the TSPL polarity, the opposite of most raster
//! formats:
//!
//! - 0 = black (print dot), 1 = white (no dot)
//! - MSB-first by default: bit 7 is the leftmost pixel
//!
//! ```text
//! [black, white, white, white, white, white, white, white] → 0b0111_1111 = 0x7F
//! ```

/// Threshold used when there is nothing to build a histogram from.
pub const DEFAULT_THRESHOLD: u8 = 240;

/// Order of pixels inside a packed byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitOrder {
    /// First pixel in bit 7
    #[default]
    MsbFirst,
    /// First pixel in bit 0
    LsbFirst,
}

/// Build a 256-bin histogram over the content columns of a padded buffer.
///
/// `luminances` holds `height` rows of `row_width` values; only the first
/// `content_width` values of each row are counted.
pub fn histogram(
    luminances: &[u8],
    content_width: usize,
    row_width: usize,
    height: usize,
) -> [u32; 256] {
    let mut hist = [0u32; 256];
    if row_width == 0 {
        return hist;
    }
    for row in luminances.chunks(row_width).take(height) {
        for &lum in &row[..content_width.min(row.len())] {
            hist[lum as usize] += 1;
        }
    }
    hist
}

/// Choose a threshold with Otsu's method.
///
/// Returns [`DEFAULT_THRESHOLD`] for an empty histogram. Ties keep the
/// first split point that reached the maximum.
///
/// ## Example
///
/// ```
/// use tspl_label::render::threshold::otsu_threshold;
///
/// let mut hist = [0u32; 256];
/// hist[0] = 10;
/// hist[255] = 30;
/// assert_eq!(otsu_threshold(&hist), 0);
/// ```
pub fn otsu_threshold(hist: &[u32; 256]) -> u8 {
    let total: u64 = hist.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return DEFAULT_THRESHOLD;
    }

    let sum: f64 = hist
        .iter()
        .enumerate()
        .map(|(t, &c)| t as f64 * c as f64)
        .sum();

    let mut sum_b = 0.0f64;
    let mut w_b = 0u64;
    let mut max_between = -1.0f64;
    let mut threshold = DEFAULT_THRESHOLD;

    for (t, &count) in hist.iter().enumerate() {
        w_b += count as u64;
        if w_b == 0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f == 0 {
            break;
        }

        sum_b += t as f64 * count as f64;

        let m_b = sum_b / w_b as f64;
        let m_f = (sum - sum_b) / w_f as f64;
        let between = w_b as f64 * w_f as f64 * (m_b - m_f) * (m_b - m_f);

        if between > max_between {
            max_between = between;
            threshold = t as u8;
        }
    }

    threshold
}

/// Pack a row of pixel values into bytes.
///
/// `white[i]` is `true` for paper, `false` for ink. A trailing partial
/// byte is padded with white.
///
/// ## Example
///
/// ```
/// use tspl_label::render::threshold::{pack_row, BitOrder};
///
/// let row = [false, true, true, true, true, true, true, true];
/// assert_eq!(pack_row(&row, BitOrder::MsbFirst), vec![0x7F]);
/// assert_eq!(pack_row(&row, BitOrder::LsbFirst), vec![0xFE]);
/// ```
pub fn pack_row(white: &[bool], order: BitOrder) -> Vec<u8> {
    let num_bytes = white.len().div_ceil(8);
    let mut bytes = vec![0xFFu8; num_bytes];

    for (i, &is_white) in white.iter().enumerate() {
        if !is_white {
            let bit_idx = match order {
                BitOrder::MsbFirst => 7 - (i % 8),
                BitOrder::LsbFirst => i % 8,
            };
            bytes[i / 8] &= !(1 << bit_idx);
        }
    }

    bytes
}

// ============================================================================
// TESTS
// ============================================================================
