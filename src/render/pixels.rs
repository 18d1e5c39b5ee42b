//! # Pixel Buffers
//!
//! Raw RGB/RGBA pixel data as produced by an image decoder, plus the
//! [`PixelSource`] boundary that turns an image reference into pixels.
//!
//! ## Layout
//!
//! ```text
//! data = [R G B A][R G B A] ...   (bytes_per_pixel = 4)
//!        [R G B][R G B] ...       (bytes_per_pixel = 3, fully opaque)
//!
//! row-major, top-to-bottom, len = width * height * bytes_per_pixel
//! ```

use std::path::{Path, PathBuf};

use image::imageops::FilterType;

use crate::error::LabelError;

/// A decoded image as raw 8-bit channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a pixel buffer, validating channel count and data length.
    pub fn new(
        width: usize,
        height: usize,
        bytes_per_pixel: usize,
        data: Vec<u8>,
    ) -> Result<Self, LabelError> {
        if bytes_per_pixel != 3 && bytes_per_pixel != 4 {
            return Err(LabelError::InvalidPixels(format!(
                "bytes per pixel must be 3 or 4, got {}",
                bytes_per_pixel
            )));
        }
        let expected = width * height * bytes_per_pixel;
        if data.len() != expected {
            return Err(LabelError::InvalidPixels(format!(
                "expected {} bytes for {}x{}x{}, got {}",
                expected,
                width,
                height,
                bytes_per_pixel,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            bytes_per_pixel,
            data,
        })
    }

    /// Create an RGBA buffer.
    pub fn rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self, LabelError> {
        Self::new(width, height, 4, data)
    }

    /// Create an opaque RGB buffer.
    pub fn rgb(width: usize, height: usize, data: Vec<u8>) -> Result<Self, LabelError> {
        Self::new(width, height, 3, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Whether the buffer carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.bytes_per_pixel > 3
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGBA value at (x, y). Opaque buffers report alpha 255.
    #[inline]
    pub fn rgba_at(&self, x: usize, y: usize) -> [u8; 4] {
        let base = (y * self.width + x) * self.bytes_per_pixel;
        let alpha = if self.has_alpha() {
            self.data[base + 3]
        } else {
            255
        };
        [self.data[base], self.data[base + 1], self.data[base + 2], alpha]
    }

    /// Alpha value at (x, y).
    #[inline]
    pub fn alpha_at(&self, x: usize, y: usize) -> u8 {
        if self.has_alpha() {
            self.data[(y * self.width + x) * self.bytes_per_pixel + 3]
        } else {
            255
        }
    }
}

// ============================================================================
// PIXEL SOURCES
// ============================================================================

/// Reference to an image that a [`PixelSource`] can decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Encoded image bytes (PNG, JPEG, ...)
    Bytes(Vec<u8>),
    /// Path to an image file on disk
    Path(PathBuf),
}

impl From<&Path> for ImageRef {
    fn from(path: &Path) -> Self {
        ImageRef::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageRef {
    fn from(bytes: Vec<u8>) -> Self {
        ImageRef::Bytes(bytes)
    }
}

/// Decodes image references into raw pixels.
pub trait PixelSource {
    /// Decode `source`, optionally rasterizing/resizing to `target` (width, height).
    fn decode(
        &self,
        source: &ImageRef,
        target: Option<(u32, u32)>,
    ) -> Result<PixelBuffer, LabelError>;
}

/// [`PixelSource`] backed by the `image` crate.
///
/// Always produces RGBA. When a target size is requested the image is
/// resized with nearest-neighbour sampling so hard edges stay hard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl PixelSource for ImageDecoder {
    fn decode(
        &self,
        source: &ImageRef,
        target: Option<(u32, u32)>,
    ) -> Result<PixelBuffer, LabelError> {
        let img = match source {
            ImageRef::Bytes(bytes) => image::load_from_memory(bytes)
                .map_err(|e| LabelError::Decode(format!("Failed to decode image: {}", e)))?,
            ImageRef::Path(path) => image::open(path).map_err(|e| {
                LabelError::Decode(format!("Failed to open {}: {}", path.display(), e))
            })?,
        };

        let img = match target {
            Some((w, h)) if w > 0 && h > 0 && (w, h) != (img.width(), img.height()) => {
                img.resize_exact(w, h, FilterType::Nearest)
            }
            _ => img,
        };

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("decoded image {}x{}", width, height);
        PixelBuffer::rgba(width as usize, height as usize, rgba.into_raw())
    }
}

// ============================================================================
// TESTS
// ============================================================================
