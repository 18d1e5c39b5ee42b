//! # Label Tests
//!
//! End-to-end checks of the byte stream a label produces: setup, text
//! wrapping, tables, images loaded from disk and PBM previews.

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use tspl_label::font::{FontMetrics, FontSpec, FontStyle};
use tspl_label::label::Label;
use tspl_label::label::json::parse_label;
use tspl_label::layout::{
    Alignment, Barcode, LineField, Point, QrCode, QrErrorLevel, QrMode, RectField, Table,
    TableOptions, TableSize, TextField,
};
use tspl_label::printer::Unit;
use tspl_label::render::morphology::{save_pbm, to_pbm};
use tspl_label::render::{ConvertOptions, ImageDecoder, ImageRef, load_bitmap};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

#[derive(Debug)]
struct HalfEm;

impl FontMetrics for HalfEm {
    fn units_per_em(&self) -> f32 {
        1000.0
    }

    fn advance_width(&self, text: &str) -> f32 {
        500.0 * text.chars().count() as f32
    }
}

/// Fresh scratch directory for one test.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tspl-label-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// 8x2 PNG: left half black, right half white.
fn write_half_black_png(path: &std::path::Path) {
    let img = RgbaImage::from_fn(8, 2, |x, _| {
        if x < 4 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    });
    img.save(path).unwrap();
}

fn text_lines(lines: &[String]) -> Vec<&str> {
    lines
        .iter()
        .filter(|l| l.starts_with("TEXT"))
        .map(String::as_str)
        .collect()
}

// ============================================================================
// PRINT JOBS
// ============================================================================

#[test]
fn test_single_text_print_job_bytes() {
    let mut label = Label::new(50.0, 25.0, Unit::Metric, 203);
    label.add(TextField::new("Hello", 10, 10, false));

    let bytes = String::from_utf8(label.print_bytes(1, 1)).unwrap();
    assert_eq!(
        bytes,
        "SIZE 50 mm, 25 mm\n\
         GAP 2 mm, 0 mm\n\
         DIRECTION 1, 0\n\
         CLS\n\
         TEXT 10,10,\"default\",0,1,1,1,\"Hello\"\n\
         PRINT 1, 1\n"
    );
}

#[test]
fn test_quotes_are_escaped_in_text() {
    let mut label = Label::new(50.0, 25.0, Unit::Metric, 203);
    label.add(TextField::new("say \"hi\"", 0, 0, false));

    let lines = label.commands().lines();
    assert_eq!(lines, vec!["TEXT 0,0,\"default\",0,1,1,1,\"say \\[\"]hi\\[\"]\""]);
}

#[test]
fn test_registered_font_is_downloaded_and_scaled() {
    let mut label = Label::new(50.0, 25.0, Unit::Metric, 203);
    label.register_metrics("Sans", Arc::new(HalfEm), vec![1, 2, 3, 4], 400, FontStyle::Normal);
    label.add(TextField::new("Hi", 5, 5, false).with_font(FontSpec::new("Sans", 20)));

    let bytes = label.print_bytes(2, 3);
    assert!(bytes.starts_with(b"DOWNLOAD \"f0.TTF\",4,\x01\x02\x03\x04\n"));

    let lines = label.print_commands(2, 3).lines();
    // 20 dots at 203 dpi is ~7 pt
    assert_eq!(text_lines(&lines), vec!["TEXT 5,5,\"f0.TTF\",0,7,7,1,\"Hi\""]);
    assert_eq!(lines.last().map(String::as_str), Some("PRINT 2, 3"));
}

// ============================================================================
// TEXT LAYOUT
// ============================================================================

#[test]
fn test_text_wraps_one_word_per_line() {
    let mut label = Label::new(50.0, 25.0, Unit::Metric, 203);
    label.add(TextField::new("aaa bbb ccc", 0, 10, false).multi_line(50.0, None));

    let lines = label.commands().lines();
    assert_eq!(
        text_lines(&lines),
        vec![
            "TEXT 0,10,\"default\",0,1,1,1,\"aaa\"",
            "TEXT 0,21,\"default\",0,1,1,1,\"bbb\"",
            "TEXT 0,32,\"default\",0,1,1,1,\"ccc\"",
        ]
    );
}

#[test]
fn test_text_is_clipped_to_height() {
    let mut label = Label::new(50.0, 25.0, Unit::Metric, 203);
    label.add(TextField::new("aaa bbb ccc", 0, 0, false).multi_line(50.0, Some(22.0)));

    let lines = label.commands().lines();
    assert_eq!(text_lines(&lines).len(), 2);
}

#[test]
fn test_bold_run_uses_bold_variant() {
    let mut label = Label::new(50.0, 25.0, Unit::Metric, 203);
    label.register_metrics("Sans", Arc::new(HalfEm), vec![0], 400, FontStyle::Normal);
    label.register_metrics("Sans", Arc::new(HalfEm), vec![0], 700, FontStyle::Normal);
    label.add(TextField::new("a <b>b</b>", 0, 0, true).with_font(FontSpec::new("Sans", 10)));

    let lines = label.commands().lines();
    let texts = text_lines(&lines);
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("\"f0.TTF\""));
    assert!(texts[1].contains("\"f1.TTF\""));
}

// ============================================================================
// TABLES AND LINES
// ============================================================================

#[test]
fn test_table_grid_lines() {
    let mut label = Label::new(50.0, 25.0, Unit::Metric, 203);
    label.add(Table::new(
        10,
        10,
        vec![
            vec!["A1".into(), "A2".into()],
            vec!["B1".into(), "B2".into()],
        ],
        TableOptions {
            size: TableSize {
                width: Some(200.0),
                height: Some(100.0),
            },
            column_widths: vec![Some(80.0), Some(120.0)],
            row_heights: vec![Some(40.0), Some(60.0)],
            formatted: false,
            ..Default::default()
        },
    ));

    let lines = label.commands().lines();
    let diagonals: Vec<&String> = lines.iter().filter(|l| l.starts_with("DIAGONAL")).collect();
    assert_eq!(diagonals.len(), 6);
    for expected in [
        "DIAGONAL 10, 10, 10, 110, 2",
        "DIAGONAL 90, 10, 90, 110, 2",
        "DIAGONAL 210, 10, 210, 110, 2",
        "DIAGONAL 10, 10, 210, 10, 2",
        "DIAGONAL 10, 50, 210, 50, 2",
        "DIAGONAL 10, 110, 210, 110, 2",
    ] {
        assert!(lines.contains(&expected.to_string()), "missing {}", expected);
    }
    assert_eq!(text_lines(&lines).len(), 4);
}

#[test]
fn test_line_field() {
    let mut label = Label::new(50.0, 25.0, Unit::Metric, 203);
    label.add(LineField::new(Point::new(0, 5), Point::new(100, 5)).with_thickness(3));
    assert_eq!(label.commands().lines(), vec!["DIAGONAL 0, 5, 100, 5, 3"]);
}

// ============================================================================
// BARCODES AND DISPLAY
// ============================================================================

#[test]
fn test_barcode_and_qr_print_job() {
    let mut label = Label::new(400.0, 300.0, Unit::Dot, 203);
    label
        .add(Barcode::new("4006381333931", 20, 20, "EAN13", 80).with_readable(Alignment::Center))
        .add(
            QrCode::new("https://example.com", 200, 20, 4)
                .with_error_level(QrErrorLevel::Q)
                .with_mode(QrMode::Manual),
        )
        .add(RectField::new(20, 150, 360, 4));

    let bytes = String::from_utf8(label.print_bytes(1, 1)).unwrap();
    assert_eq!(
        bytes,
        "SIZE 400 dot, 300 dot\n\
         GAP 2 dot, 0 dot\n\
         DIRECTION 1, 0\n\
         CLS\n\
         BARCODE 20,20,\"EAN13\",80,2,0,2,2,\"4006381333931\"\n\
         QRCODE 200, 20, Q, 4, M, 0, M2, \"https://example.com\"\n\
         BAR 20, 150, 360, 4\n\
         PRINT 1, 1\n"
    );
}

#[test]
fn test_display_job_bytes() {
    let mut label = Label::new(50.0, 25.0, Unit::Metric, 203);
    label.add(TextField::new("Hello", 10, 10, false));

    let bytes = String::from_utf8(label.display_bytes()).unwrap();
    assert_eq!(
        bytes,
        "SIZE 50 mm, 25 mm\n\
         GAP 2 mm, 0 mm\n\
         DIRECTION 1, 0\n\
         CLS\n\
         DISPLAY CLS\n\
         TEXT 10,10,\"default\",0,1,1,1,\"Hello\"\n\
         DISPLAY IMAGE\n"
    );
}

// ============================================================================
// IMAGES
// ============================================================================

#[test]
fn test_json_label_with_image_file() {
    let dir = scratch_dir("json-image");
    write_half_black_png(&dir.join("logo.png"));

    let json = r#"{
        "setup": {"width": 400, "height": 200, "unit": "dot"},
        "fields": [{"type": "image", "path": "logo.png", "x": 5, "y": 6}]
    }"#;
    let label = parse_label(json, &dir).unwrap();
    let bytes = label.commands().to_bytes();

    assert_eq!(bytes, b"BITMAP 5, 6,1,2,0,\x0F\x0F\n".to_vec());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_image_to_pbm_file() {
    let dir = scratch_dir("pbm");
    let png = dir.join("logo.png");
    write_half_black_png(&png);

    let bitmap = load_bitmap(&ImageDecoder, &ImageRef::Path(png), &ConvertOptions::default()).unwrap();
    assert_eq!(bitmap.bytes(), &[0x0F, 0x0F]);
    assert_eq!(to_pbm(&bitmap, None), b"P4\n8 2\n\xF0\xF0".to_vec());

    let out = dir.join("logo.pbm");
    save_pbm(&bitmap, &out, None).unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), to_pbm(&bitmap, None));
    std::fs::remove_dir_all(&dir).ok();
}
