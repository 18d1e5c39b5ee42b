//! # JSON Label Files
//!
//! Describe a label in JSON and load it into a [`Label`].
//!
//! Font and image paths are resolved relative to the label file.
//!
//! ## Example
//!
//! ```
//! use std::path::Path;
//! use tspl_label::label::json::parse_label;
//!
//! let json = r#"{
//!     "setup": {"width": 50, "height": 25, "unit": "metric"},
//!     "fields": [
//!         {"type": "text", "content": "<b>Hello</b>", "x": 10, "y": 10},
//!         {"type": "line", "start": {"x": 10, "y": 30}, "end": {"x": 200, "y": 30}},
//!         {"type": "table", "x": 10, "y": 40, "rows": [["A", "B"]], "cell_padding": 2},
//!         {"type": "qr_code", "content": "https://example.com", "x": 250, "y": 10, "cell_width": 3}
//!     ]
//! }"#;
//!
//! let label = parse_label(json, Path::new(".")).unwrap();
//! let lines = label.print_commands(1, 1).lines();
//! assert_eq!(lines[0], "SIZE 50 mm, 25 mm");
//! assert!(lines.iter().any(|l| l.starts_with("DIAGONAL")));
//! ```

mod convert;
mod schema;

pub use schema::{
    JsonBarcode, JsonBlock, JsonField, JsonFont, JsonImage, JsonLabel, JsonLine, JsonQrCode,
    JsonRect, JsonTable, JsonText,
};

use std::path::Path;

use super::Label;
use crate::error::LabelError;
use crate::render::ImageDecoder;

/// Parse a label from JSON text, decoding images with the `image` crate.
pub fn parse_label(json: &str, base_dir: &Path) -> Result<Label, LabelError> {
    let doc: JsonLabel = serde_json::from_str(json)?;
    doc.to_label(base_dir, &ImageDecoder)
}

/// Load a label file from disk.
pub fn load_label(path: impl AsRef<Path>) -> Result<Label, LabelError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    log::debug!("loading label from {}", path.display());
    parse_label(&json, base_dir)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_label_uses_defaults() {
        let label = parse_label("{}", Path::new(".")).unwrap();
        assert!(label.is_empty());
        assert_eq!(label.config().dpi, 203);
        let lines = label.print_commands(1, 1).lines();
        assert_eq!(
            lines,
            vec!["SIZE 50 mm, 25 mm", "GAP 2 mm, 0 mm", "DIRECTION 1, 0", "CLS", "PRINT 1, 1"]
        );
    }

    #[test]
    fn test_dot_units_and_direction() {
        let json = r#"{
            "setup": {"width": 400, "height": 200, "unit": "dot", "gap": 16, "direction": "inverse", "mirror": true},
            "dpi": 300
        }"#;
        let label = parse_label(json, Path::new(".")).unwrap();
        assert_eq!(label.config().dpi, 300);
        let lines = label.print_commands(1, 1).lines();
        assert_eq!(lines[0], "SIZE 400 dot, 200 dot");
        assert_eq!(lines[1], "GAP 16 dot, 0 dot");
        assert_eq!(lines[2], "DIRECTION 0, 1");
    }

    #[test]
    fn test_text_field_options() {
        let json = r#"{
            "fields": [{
                "type": "text",
                "content": "This is a long text that should wrap",
                "x": 0, "y": 0,
                "formatted": false,
                "font": {"name": "default", "size": 10},
                "width": 40, "height": 60
            }]
        }"#;
        let label = parse_label(json, Path::new(".")).unwrap();
        let lines = label.commands().lines();
        assert!(lines.iter().filter(|l| l.starts_with("TEXT")).count() > 1);
    }

    #[test]
    fn test_table_options_flatten() {
        let json = r#"{
            "fields": [{
                "type": "table", "x": 10, "y": 10,
                "rows": [["A1", "A2"], ["B1", "B2"]],
                "size": {"width": 200, "height": 100},
                "column_widths": [80, null],
                "row_heights": [40, 60],
                "formatted": false
            }]
        }"#;
        let label = parse_label(json, Path::new(".")).unwrap();
        let lines = label.commands().lines();
        assert_eq!(lines.iter().filter(|l| l.starts_with("DIAGONAL")).count(), 6);
        assert!(lines.contains(&"DIAGONAL 210, 10, 210, 110, 2".to_string()));
    }

    #[test]
    fn test_height_without_width_is_rejected() {
        let json = r#"{"fields": [{"type": "text", "content": "x", "x": 0, "y": 0, "height": 10}]}"#;
        let err = parse_label(json, Path::new(".")).unwrap_err();
        assert!(matches!(err, LabelError::InvalidLabel(ref m) if m.contains("field 0")));
    }

    #[test]
    fn test_zero_dpi_is_rejected() {
        let err = parse_label(r#"{"dpi": 0}"#, Path::new(".")).unwrap_err();
        assert!(matches!(err, LabelError::InvalidLabel(_)));
    }

    #[test]
    fn test_unknown_field_type_is_json_error() {
        let json = r#"{"fields": [{"type": "ellipse", "content": "x"}]}"#;
        let err = parse_label(json, Path::new(".")).unwrap_err();
        assert!(matches!(err, LabelError::Json(_)));
    }

    #[test]
    fn test_barcode_qr_rect_and_block_fields() {
        let json = r#"{
            "fields": [
                {"type": "barcode", "content": "123", "x": 1, "y": 2, "symbology": "CODE128",
                 "height": 50, "readable": "center", "rotation": 90},
                {"type": "qr_code", "content": "DATA", "x": 3, "y": 4, "cell_width": 5,
                 "error_level": "H", "mode": "manual", "mask": 1},
                {"type": "rect", "x": 0, "y": 0, "width": 10, "height": 2},
                {"type": "block", "content": "Hi", "x": 5, "y": 6, "width": 100, "height": 40,
                 "font": {"name": "3", "size": 10}, "alignment": "right"}
            ]
        }"#;
        let label = parse_label(json, Path::new(".")).unwrap();
        assert_eq!(
            label.commands().lines(),
            vec![
                "BARCODE 1,2,\"CODE128\",50,2,90,2,2,\"123\"",
                "QRCODE 3, 4, H, 5, M, 0, M2, S1, \"DATA\"",
                "BAR 0, 0, 10, 2",
                "BLOCK 5,6,100, 40,\"3\",0,1,1,0,3,\"Hi\"",
            ]
        );
    }

    #[test]
    fn test_qr_mask_out_of_range_names_field() {
        let json = r#"{"fields": [
            {"type": "rect", "x": 0, "y": 0, "width": 1, "height": 1},
            {"type": "qr_code", "content": "x", "x": 0, "y": 0, "cell_width": 3, "mask": 9}
        ]}"#;
        let err = parse_label(json, Path::new(".")).unwrap_err();
        assert!(
            matches!(err, LabelError::InvalidCommand(ref m) if m.starts_with("field 1: Invalid mask"))
        );
    }

    #[test]
    fn test_missing_image_is_decode_error() {
        let json = r#"{"fields": [{"type": "image", "path": "does-not-exist.png", "x": 0, "y": 0}]}"#;
        let err = parse_label(json, Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, LabelError::Decode(_)));
    }

    #[test]
    fn test_missing_font_file_is_io_error() {
        let json = r#"{"fonts": [{"family": "x", "path": "missing.ttf"}]}"#;
        let err = parse_label(json, Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, LabelError::Io(_)));
    }
}
