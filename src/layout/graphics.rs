//! Line, rectangle and image fields.

use super::Field;
use super::primitive::{CombineMode, Point, Primitive};
use crate::error::LabelError;
use crate::font::FontRegistry;
use crate::render::{self, ConvertOptions, ImageRef, MonoBitmap, PixelSource};

/// Default stroke width for standalone lines, in dots.
pub const DEFAULT_LINE_THICKNESS: u32 = 2;

/// A straight line between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineField {
    pub start: Point,
    pub end: Point,
    pub thickness: u32,
}

impl LineField {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            thickness: DEFAULT_LINE_THICKNESS,
        }
    }

    pub fn with_thickness(mut self, thickness: u32) -> Self {
        self.thickness = thickness;
        self
    }
}

impl Field for LineField {
    fn emit(&self, _fonts: &FontRegistry, out: &mut Vec<Primitive>) {
        out.push(Primitive::line(self.start, self.end, self.thickness));
    }
}

/// A solid black rectangle (`BAR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectField {
    pub position: Point,
    pub width: u32,
    pub height: u32,
}

impl RectField {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            position: Point::new(x, y),
            width,
            height,
        }
    }
}

impl Field for RectField {
    fn emit(&self, _fonts: &FontRegistry, out: &mut Vec<Primitive>) {
        if self.width == 0 || self.height == 0 {
            log::warn!("skipping empty rectangle at {:?}", self.position);
            return;
        }
        out.push(Primitive::Rect {
            position: self.position,
            width: self.width,
            height: self.height,
        });
    }
}

/// A monochrome bitmap placed at a fixed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageField {
    pub position: Point,
    pub bitmap: MonoBitmap,
    pub mode: CombineMode,
}

impl ImageField {
    pub fn new(x: i32, y: i32, bitmap: MonoBitmap) -> Self {
        Self {
            position: Point::new(x, y),
            bitmap,
            mode: CombineMode::Overwrite,
        }
    }

    pub fn with_mode(mut self, mode: CombineMode) -> Self {
        self.mode = mode;
        self
    }

    /// Decode an image and convert it for printing.
    pub fn load(
        x: i32,
        y: i32,
        source: &ImageRef,
        decoder: &impl PixelSource,
        options: &ConvertOptions,
    ) -> Result<Self, LabelError> {
        let bitmap = render::load_bitmap(decoder, source, options)?;
        Ok(Self::new(x, y, bitmap))
    }
}

impl Field for ImageField {
    fn emit(&self, _fonts: &FontRegistry, out: &mut Vec<Primitive>) {
        if self.bitmap.is_empty() {
            log::warn!("skipping empty bitmap at {:?}", self.position);
            return;
        }
        out.push(Primitive::Bitmap {
            bitmap: self.bitmap.clone(),
            position: self.position,
            mode: self.mode,
        });
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PixelBuffer;

    /// Hands out a fixed pixel buffer and records the requested target.
    struct FixedSource {
        pixels: PixelBuffer,
        seen: std::sync::Mutex<Option<Option<(u32, u32)>>>,
    }

    impl PixelSource for FixedSource {
        fn decode(
            &self,
            _source: &ImageRef,
            target: Option<(u32, u32)>,
        ) -> Result<PixelBuffer, LabelError> {
            *self.seen.lock().unwrap() = Some(target);
            Ok(self.pixels.clone())
        }
    }

    struct FailingSource;

    impl PixelSource for FailingSource {
        fn decode(
            &self,
            _source: &ImageRef,
            _target: Option<(u32, u32)>,
        ) -> Result<PixelBuffer, LabelError> {
            Err(LabelError::Decode("unsupported".into()))
        }
    }

    #[test]
    fn test_line_field_emits_one_line() {
        let line = LineField::new(Point::new(0, 0), Point::new(10, 0)).with_thickness(3);
        let out = line.primitives(&FontRegistry::default());
        assert_eq!(out, vec![Primitive::line(Point::new(0, 0), Point::new(10, 0), 3)]);
    }

    #[test]
    fn test_image_field_emits_bitmap() {
        let bitmap = MonoBitmap::new(1, 1, vec![0x41]).unwrap();
        let field = ImageField::new(1, 2, bitmap.clone()).with_mode(CombineMode::Xor);
        let out = field.primitives(&FontRegistry::default());
        assert_eq!(
            out,
            vec![Primitive::Bitmap {
                bitmap,
                position: Point::new(1, 2),
                mode: CombineMode::Xor,
            }]
        );
    }

    #[test]
    fn test_rect_field() {
        let out = RectField::new(1, 2, 3, 4).primitives(&FontRegistry::default());
        assert_eq!(
            out,
            vec![Primitive::Rect {
                position: Point::new(1, 2),
                width: 3,
                height: 4,
            }]
        );
        assert!(RectField::new(1, 2, 0, 4).primitives(&FontRegistry::default()).is_empty());
    }

    #[test]
    fn test_loaded_image_is_a_bitmap_primitive() {
        let source = FixedSource {
            pixels: PixelBuffer::rgb(1, 1, vec![0, 0, 0]).unwrap(),
            seen: std::sync::Mutex::new(None),
        };
        let field = ImageField::load(0, 0, &ImageRef::Bytes(Vec::new()), &source, &ConvertOptions::default())
            .unwrap();
        let out = field.primitives(&FontRegistry::default());
        assert_eq!(out.len(), 1);
        assert!(out[0].is_bitmap());
        assert!(!out[0].is_text() && !out[0].is_line());
    }

    #[test]
    fn test_empty_image_emits_nothing() {
        let field = ImageField::new(0, 0, MonoBitmap::empty());
        assert!(field.primitives(&FontRegistry::default()).is_empty());
    }

    #[test]
    fn test_load_passes_target_only_when_both_sizes_set() {
        let source = FixedSource {
            pixels: PixelBuffer::rgb(2, 1, vec![0, 0, 0, 255, 255, 255]).unwrap(),
            seen: std::sync::Mutex::new(None),
        };
        let image = ImageRef::Bytes(Vec::new());

        let field = ImageField::load(0, 0, &image, &source, &ConvertOptions::sized(Some(2), Some(1)))
            .unwrap();
        assert_eq!(*source.seen.lock().unwrap(), Some(Some((2, 1))));
        assert_eq!(field.bitmap.bytes(), &[0x7F]);

        ImageField::load(0, 0, &image, &source, &ConvertOptions::sized(Some(2), None)).unwrap();
        assert_eq!(*source.seen.lock().unwrap(), Some(None));
    }

    #[test]
    fn test_load_propagates_decode_errors() {
        let result = ImageField::load(
            0,
            0,
            &ImageRef::Bytes(Vec::new()),
            &FailingSource,
            &ConvertOptions::default(),
        );
        assert!(matches!(result, Err(LabelError::Decode(_))));
    }
}
