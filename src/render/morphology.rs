//! # Bitmap Morphology and PBM Export
//!
//! Post-processing for packed [`MonoBitmap`]s:
//!
//! - [`dilate`] thickens strokes that are too thin to survive the print head
//! - [`to_pbm`] / [`save_pbm`] export a bitmap as a binary (P4) portable
//!   bitmap for inspection with any image viewer
//!
//! Both assume MSB-first packing.
//!
//! ## PBM Polarity
//!
//! P4 stores 1 = black, the inverse of the printer bitmap convention, so
//! every byte is inverted on export:
//!
//! ```text
//! label byte 0x7F  (█░░░░░░░)  →  PBM byte 0x80
//! ```

use std::path::Path;

use rayon::prelude::*;

use super::bitmap::MonoBitmap;
use crate::error::LabelError;

/// Grow black regions by one pixel in all 8 directions, `iterations` times.
///
/// Each pass reads only the output of the previous pass. Pixels outside the
/// bitmap count as white. `iterations == 0` returns an identical bitmap.
///
/// ## Example
///
/// ```
/// use tspl_label::render::bitmap::MonoBitmap;
/// use tspl_label::render::morphology::dilate;
///
/// // Single black pixel in the middle of a 8x3 bitmap
/// let bitmap = MonoBitmap::new(1, 3, vec![0xFF, 0b1110_1111, 0xFF]).unwrap();
/// let thick = dilate(&bitmap, 1);
/// assert_eq!(thick.bytes(), &[0b1100_0111, 0b1100_0111, 0b1100_0111]);
/// ```
pub fn dilate(bitmap: &MonoBitmap, iterations: usize) -> MonoBitmap {
    let mut current = bitmap.clone();
    for _ in 0..iterations {
        current = dilate_once(&current);
    }
    current
}

fn dilate_once(src: &MonoBitmap) -> MonoBitmap {
    let width_bytes = src.width_bytes();
    let width_dots = src.width_dots();
    let mut bytes = vec![0xFFu8; src.bytes().len()];

    if width_bytes > 0 {
        bytes
            .par_chunks_mut(width_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as i64;
                for x in 0..width_dots {
                    let xi = x as i64;
                    let black = (-1..=1)
                        .any(|dy| (-1..=1).any(|dx| src.is_black(xi + dx, y + dy)));
                    if black {
                        row[x >> 3] &= !(1 << (7 - (x & 7)));
                    }
                }
            });
    }

    MonoBitmap::from_parts(width_bytes, src.height(), bytes)
}

/// Encode a bitmap as a binary PBM (P4) image.
///
/// `width_dots` overrides the logical width written to the header; by
/// default the full padded row width is used. Each row is `ceil(width / 8)`
/// bytes; bits past `width` in the last byte are cleared. Columns beyond the
/// bitmap's own rows are white.
///
/// ## Example
///
/// ```
/// use tspl_label::render::bitmap::MonoBitmap;
/// use tspl_label::render::morphology::to_pbm;
///
/// let bitmap = MonoBitmap::new(1, 1, vec![0x7F]).unwrap();
/// assert_eq!(to_pbm(&bitmap, Some(2)), b"P4\n2 1\n\x80".to_vec());
/// ```
pub fn to_pbm(bitmap: &MonoBitmap, width_dots: Option<usize>) -> Vec<u8> {
    let width = width_dots.unwrap_or_else(|| bitmap.width_dots());
    let height = bitmap.height();
    let row_bytes = width.div_ceil(8);
    let extra_bits = row_bytes * 8 - width;

    let header = format!("P4\n{} {}\n", width, height);
    let mut out = Vec::with_capacity(header.len() + row_bytes * height);
    out.extend_from_slice(header.as_bytes());

    for y in 0..height {
        let row = bitmap.row(y);
        for xb in 0..row_bytes {
            let byte = row.get(xb).copied().unwrap_or(0xFF);
            out.push(!byte);
        }
        if extra_bits > 0
            && let Some(last) = out.last_mut()
        {
            *last &= 0xFFu8 << extra_bits;
        }
    }

    out
}

/// Write a bitmap to `path` as a binary PBM (P4) file.
pub fn save_pbm(
    bitmap: &MonoBitmap,
    path: impl AsRef<Path>,
    width_dots: Option<usize>,
) -> Result<(), LabelError> {
    std::fs::write(path.as_ref(), to_pbm(bitmap, width_dots))?;
    log::debug!(
        "wrote {}x{} PBM to {}",
        width_dots.unwrap_or_else(|| bitmap.width_dots()),
        bitmap.height(),
        path.as_ref().display()
    );
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn black_pixels(bitmap: &MonoBitmap) -> Vec<(i64, i64)> {
        let mut out = Vec::new();
        for y in 0..bitmap.height() as i64 {
            for x in 0..bitmap.width_dots() as i64 {
                if bitmap.is_black(x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_dilate_zero_is_identity() {
        let bitmap = MonoBitmap::new(2, 2, vec![0x12, 0x34, 0x56, 0x78]).unwrap();
        assert_eq!(dilate(&bitmap, 0), bitmap);
    }

    #[test]
    fn test_dilate_is_monotonic() {
        let bitmap = MonoBitmap::new(2, 3, vec![0xFF, 0xFE, 0xBF, 0xFF, 0xFF, 0x7F]).unwrap();
        let before = black_pixels(&bitmap);
        let after = dilate(&bitmap, 1);
        for (x, y) in before {
            assert!(after.is_black(x, y), "({}, {}) should stay black", x, y);
        }
        assert!(after.black_count() > bitmap.black_count());
    }

    #[test]
    fn test_dilate_corner_clips_at_edges() {
        // Black pixel at the top-left corner
        let bitmap = MonoBitmap::new(1, 2, vec![0x7F, 0xFF]).unwrap();
        let out = dilate(&bitmap, 1);
        assert_eq!(out.bytes(), &[0x3F, 0x3F]);
    }

    #[test]
    fn test_dilate_iterates_from_previous_pass() {
        // Single pixel at (3, 2) in 8x5: two passes give a 5x5 block
        let mut bytes = vec![0xFF; 5];
        bytes[2] = 0b1110_1111;
        let bitmap = MonoBitmap::new(1, 5, bytes).unwrap();
        let out = dilate(&bitmap, 2);
        assert_eq!(out.black_count(), 25);
        assert_eq!(out.bytes(), &[0b1000_0011; 5]);
    }

    #[test]
    fn test_dilate_white_stays_white() {
        let bitmap = MonoBitmap::blank(2, 2);
        assert_eq!(dilate(&bitmap, 3), bitmap);
    }

    #[test]
    fn test_dilate_empty() {
        assert!(dilate(&MonoBitmap::empty(), 2).is_empty());
    }

    #[test]
    fn test_pbm_all_white_body_is_zero() {
        let bitmap = MonoBitmap::blank(2, 3);
        let pbm = to_pbm(&bitmap, None);
        let header = b"P4\n16 3\n";
        assert_eq!(&pbm[..header.len()], header);
        assert_eq!(pbm.len(), header.len() + 6);
        assert!(pbm[header.len()..].iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_pbm_inverts_polarity() {
        let bitmap = MonoBitmap::new(1, 2, vec![0x00, 0x0F]).unwrap();
        let pbm = to_pbm(&bitmap, None);
        assert_eq!(&pbm[b"P4\n8 2\n".len()..], &[0xFF, 0xF0]);
    }

    #[test]
    fn test_pbm_clears_unused_bits() {
        // All black, logical width 5: last 3 bits must be 0
        let bitmap = MonoBitmap::new(1, 1, vec![0x00]).unwrap();
        let pbm = to_pbm(&bitmap, Some(5));
        assert_eq!(pbm, b"P4\n5 1\n\xF8".to_vec());
    }

    #[test]
    fn test_pbm_wider_than_bitmap_is_white() {
        let bitmap = MonoBitmap::new(1, 2, vec![0x00, 0x00]).unwrap();
        let pbm = to_pbm(&bitmap, Some(16));
        assert_eq!(&pbm[b"P4\n16 2\n".len()..], &[0xFF, 0x00, 0xFF, 0x00]);
    }

    #[test]
    fn test_save_pbm_writes_file() {
        let dir = std::env::temp_dir().join(format!("tspl-label-pbm-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.pbm");

        let bitmap = MonoBitmap::new(1, 1, vec![0x7F]).unwrap();
        save_pbm(&bitmap, &path, None).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), to_pbm(&bitmap, None));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
