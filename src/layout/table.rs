//! # Table Layout
//!
//! A grid of text cells with ruled borders.
//!
//! ## Track Sizing
//!
//! Columns and rows are sized independently by [`resolve_track_sizes`]:
//!
//! | Explicit size | Table total | Result |
//! |---------------|-------------|--------|
//! | set           | any         | explicit size |
//! | unset         | set         | `(total − Σ explicit) / unset tracks` |
//! | unset         | unset       | measured from content |
//!
//! Every track is at least 1 dot.
//!
//! Measured columns use the widest single-line cell text (tags stripped),
//! never less than the font size, plus padding on both sides. Measured rows
//! use the tallest cell's estimated wrapped height inside the already
//! resolved column widths.
//!
//! ## Emission
//!
//! ```text
//!   x0      x1          x2
//! y0 ┌───────┬───────────┐
//!    │ A1    │ A2        │   cell text at (x + padding, y + padding),
//! y1 ├───────┼───────────┤   wrapped and clipped to the cell box
//!    │ B1    │ B2        │   minus padding
//! y2 └───────┴───────────┘
//! ```
//!
//! Cells first (row by row), then `columns + 1` vertical and `rows + 1`
//! horizontal lines. A cell with no visible text still yields one empty
//! text run at its padded origin.

use serde::{Deserialize, Serialize};

use super::Field;
use super::markup::strip_tags;
use super::primitive::{Point, Primitive, Size, TextStyle};
use super::text::{TextField, estimate_line_count};
use crate::font::{FontRegistry, FontSpec};

/// Overall table size in dots. Unset dimensions are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSize {
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
}

/// Table styling and sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    pub size: TableSize,
    /// Per-column widths; `None` entries are flexible or measured
    pub column_widths: Vec<Option<f32>>,
    /// Per-row heights; `None` entries are flexible or measured
    pub row_heights: Vec<Option<f32>>,
    pub line_thickness: u32,
    pub cell_padding: f32,
    /// Interpret cell content as markup
    pub formatted: bool,
    pub font: FontSpec,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            size: TableSize::default(),
            column_widths: Vec::new(),
            row_heights: Vec::new(),
            line_thickness: 2,
            cell_padding: 4.0,
            formatted: true,
            font: FontSpec::default(),
        }
    }
}

/// Resolved column widths and row heights.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSizes {
    pub columns: Vec<f32>,
    pub rows: Vec<f32>,
}

/// Resolve `count` track sizes.
///
/// ## Example
///
/// ```
/// use tspl_label::layout::table::resolve_track_sizes;
///
/// let sizes = resolve_track_sizes(2, &[Some(80.0)], Some(200.0), |_| unreachable!());
/// assert_eq!(sizes, vec![80.0, 120.0]);
/// ```
pub fn resolve_track_sizes(
    count: usize,
    explicit: &[Option<f32>],
    total: Option<f32>,
    mut measure: impl FnMut(usize) -> f32,
) -> Vec<f32> {
    let sizes: Vec<Option<f32>> = (0..count)
        .map(|i| explicit.get(i).copied().flatten())
        .collect();

    if let Some(total) = total {
        let fixed: f32 = sizes.iter().flatten().sum();
        let flexible = sizes.iter().filter(|s| s.is_none()).count();
        let remaining = (total - fixed).max(0.0);
        let flex = if flexible == 0 {
            0.0
        } else {
            remaining / flexible as f32
        };
        return sizes.into_iter().map(|s| s.unwrap_or(flex).max(1.0)).collect();
    }

    sizes
        .into_iter()
        .enumerate()
        .map(|(i, s)| s.unwrap_or_else(|| measure(i)).max(1.0))
        .collect()
}

/// Start positions of consecutive tracks.
fn prefix_positions(origin: f32, sizes: &[f32]) -> Vec<f32> {
    sizes
        .iter()
        .scan(origin, |pos, &size| {
            let start = *pos;
            *pos += size;
            Some(start)
        })
        .collect()
}

/// A grid of text cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub position: Point,
    pub rows: Vec<Vec<String>>,
    pub options: TableOptions,
}

impl Table {
    pub fn new(x: i32, y: i32, rows: Vec<Vec<String>>, options: TableOptions) -> Self {
        Self {
            position: Point::new(x, y),
            rows,
            options,
        }
    }

    /// Number of columns: the length of the longest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn measure_column(&self, fonts: &FontRegistry, column: usize) -> f32 {
        let font = &self.options.font;
        let widest = self
            .rows
            .iter()
            .map(|row| {
                let content = row.get(column).map(String::as_str).unwrap_or("");
                fonts.text_width(&strip_tags(content), font)
            })
            .fold(0.0f32, f32::max);
        widest.max(font.size as f32) + 2.0 * self.options.cell_padding
    }

    fn measure_row(&self, fonts: &FontRegistry, row: usize, columns: &[f32]) -> f32 {
        let font = &self.options.font;
        let padding = self.options.cell_padding;
        let tallest = columns
            .iter()
            .enumerate()
            .map(|(column, width)| {
                let available = (width - 2.0 * padding).max(1.0);
                let plain = strip_tags(self.cell(row, column));
                let lines = estimate_line_count(fonts, &plain, font, available);
                (lines as u32 * font.line_height()) as f32
            })
            .fold(None, |max: Option<f32>, h| Some(max.map_or(h, |m| m.max(h))))
            .unwrap_or(font.size as f32);
        tallest + 2.0 * padding
    }

    /// Resolve column widths, then row heights against those widths.
    pub fn track_sizes(&self, fonts: &FontRegistry) -> TrackSizes {
        let columns = resolve_track_sizes(
            self.column_count(),
            &self.options.column_widths,
            self.options.size.width,
            |i| self.measure_column(fonts, i),
        );
        let rows = resolve_track_sizes(
            self.rows.len(),
            &self.options.row_heights,
            self.options.size.height,
            |i| self.measure_row(fonts, i, &columns),
        );
        log::debug!("table tracks: columns {:?}, rows {:?}", columns, rows);
        TrackSizes { columns, rows }
    }
}

impl Field for Table {
    fn emit(&self, fonts: &FontRegistry, out: &mut Vec<Primitive>) {
        let TrackSizes { columns, rows } = self.track_sizes(fonts);
        let origin_x = self.position.x as f32;
        let origin_y = self.position.y as f32;
        let xs = prefix_positions(origin_x, &columns);
        let ys = prefix_positions(origin_y, &rows);
        let padding = self.options.cell_padding;

        for (row, (&y, &height)) in ys.iter().zip(&rows).enumerate() {
            for (column, (&x, &width)) in xs.iter().zip(&columns).enumerate() {
                let text = TextField::new(
                    self.cell(row, column),
                    (x + padding).round() as i32,
                    (y + padding).round() as i32,
                    self.options.formatted,
                )
                .with_font(self.options.font.clone())
                .multi_line(
                    (width - 2.0 * padding).max(1.0),
                    Some((height - 2.0 * padding).max(1.0)),
                );
                let start = out.len();
                text.emit(fonts, out);
                if !out[start..].iter().any(Primitive::is_text) {
                    out.push(Primitive::Text {
                        content: String::new(),
                        font: text.font.clone(),
                        style: TextStyle::PLAIN,
                        position: text.position,
                        wrap_box: Some(Size {
                            width: text.max_width.unwrap_or(1.0),
                            height: text.max_height.unwrap_or(1.0),
                        }),
                    });
                }
            }
        }

        let total_width: f32 = columns.iter().sum();
        let total_height: f32 = rows.iter().sum();
        let top = self.position.y;
        let bottom = (origin_y + total_height).round() as i32;
        let left = self.position.x;
        let right = (origin_x + total_width).round() as i32;
        let thickness = self.options.line_thickness;

        for x in xs.iter().map(|x| x.round() as i32).chain(std::iter::once(right)) {
            out.push(Primitive::line(
                Point::new(x, top),
                Point::new(x, bottom),
                thickness,
            ));
        }
        for y in ys.iter().map(|y| y.round() as i32).chain(std::iter::once(bottom)) {
            out.push(Primitive::line(
                Point::new(left, y),
                Point::new(right, y),
                thickness,
            ));
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn fonts() -> FontRegistry {
        FontRegistry::default()
    }

    #[test]
    fn test_total_split_among_flexible_tracks() {
        let sizes = resolve_track_sizes(3, &[Some(50.0)], Some(200.0), |_| 999.0);
        assert_eq!(sizes, vec![50.0, 75.0, 75.0]);
    }

    #[test]
    fn test_fixed_exceeding_total_clamps_to_one() {
        let sizes = resolve_track_sizes(2, &[Some(300.0)], Some(200.0), |_| 999.0);
        assert_eq!(sizes, vec![300.0, 1.0]);
    }

    #[test]
    fn test_measure_used_without_total() {
        let sizes = resolve_track_sizes(3, &[None, Some(5.0)], None, |i| i as f32 * 10.0);
        assert_eq!(sizes, vec![1.0, 5.0, 20.0]);
    }

    #[test]
    fn test_zero_tracks() {
        assert!(resolve_track_sizes(0, &[Some(10.0)], Some(100.0), |_| 1.0).is_empty());
    }

    #[test]
    fn test_explicit_column_and_remainder() {
        let table = Table::new(
            0,
            0,
            grid(&[&["A", "B"]]),
            TableOptions {
                size: TableSize {
                    width: Some(200.0),
                    height: None,
                },
                column_widths: vec![Some(80.0)],
                ..Default::default()
            },
        );
        assert_eq!(table.track_sizes(&fonts()).columns, vec![80.0, 120.0]);
    }

    #[test]
    fn test_auto_column_is_content_plus_padding() {
        let table = Table::new(0, 0, grid(&[&["Hello", "<b>Hi</b>", ""]]), TableOptions::default());
        // "Hello" = 50, "Hi" = 20, "" floors at the font size (10); padding 4 on each side
        assert_eq!(table.track_sizes(&fonts()).columns, vec![58.0, 28.0, 18.0]);
    }

    #[test]
    fn test_auto_row_counts_wrapped_lines() {
        let table = Table::new(
            0,
            0,
            grid(&[&["aaaa bbbb cccc"], &["x"]]),
            TableOptions {
                column_widths: vec![Some(48.0)],
                ..Default::default()
            },
        );
        // 40 dots available: 3 lines of 11 dots, plus 8 padding
        assert_eq!(table.track_sizes(&fonts()).rows, vec![41.0, 19.0]);
    }

    #[test]
    fn test_row_without_columns_uses_font_size() {
        let table = Table::new(0, 0, vec![Vec::new()], TableOptions::default());
        let sizes = table.track_sizes(&fonts());
        assert!(sizes.columns.is_empty());
        assert_eq!(sizes.rows, vec![18.0]);
    }

    #[test]
    fn test_grid_and_cells() {
        let table = Table::new(
            10,
            10,
            grid(&[&["A1", "A2"], &["B1", "B2"]]),
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
        );
        let out = table.primitives(&fonts());

        assert_eq!(out.iter().filter(|p| p.is_text()).count(), 4);
        let lines: Vec<&Primitive> = out.iter().filter(|p| p.is_line()).collect();
        assert_eq!(lines.len(), 6);

        // Verticals at 10, 90, 210; horizontals at 10, 50, 110
        assert_eq!(*lines[0], Primitive::line(Point::new(10, 10), Point::new(10, 110), 2));
        assert_eq!(*lines[1], Primitive::line(Point::new(90, 10), Point::new(90, 110), 2));
        assert_eq!(*lines[2], Primitive::line(Point::new(210, 10), Point::new(210, 110), 2));
        assert_eq!(*lines[3], Primitive::line(Point::new(10, 10), Point::new(210, 10), 2));
        assert_eq!(*lines[4], Primitive::line(Point::new(10, 50), Point::new(210, 50), 2));
        assert_eq!(*lines[5], Primitive::line(Point::new(10, 110), Point::new(210, 110), 2));

        match &out[1] {
            Primitive::Text { content, position, .. } => {
                assert_eq!(content, "A2");
                assert_eq!(*position, Point::new(94, 14));
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_cells_are_empty() {
        let table = Table::new(0, 0, grid(&[&["a", "b"], &["c"]]), TableOptions::default());
        let out = table.primitives(&fonts());
        // Every cell gets a text primitive, the missing one an empty run
        let texts: Vec<&Primitive> = out.iter().filter(|p| p.is_text()).collect();
        assert_eq!(texts.len(), 4);
        assert_eq!(out.iter().filter(|p| p.is_line()).count(), 6);

        // Columns and rows are 18 and 19 dots; the padded cell origin is (22, 23)
        match texts[3] {
            Primitive::Text { content, position, .. } => {
                assert_eq!(content, "");
                assert_eq!(*position, Point::new(22, 23));
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_cell_emits_one_empty_text() {
        let table = Table::new(0, 0, grid(&[&["", "x"]]), TableOptions::default());
        let out = table.primitives(&fonts());
        assert!(matches!(&out[0], Primitive::Text { content, .. } if content.is_empty()));
        assert!(matches!(&out[1], Primitive::Text { content, .. } if content == "x"));
    }

    #[test]
    fn test_cell_text_wraps_in_narrow_column() {
        let table = Table::new(
            0,
            0,
            grid(&[&["This is a long text that should wrap"]]),
            TableOptions {
                size: TableSize {
                    width: Some(60.0),
                    height: Some(40.0),
                },
                column_widths: vec![Some(60.0)],
                row_heights: vec![Some(40.0)],
                cell_padding: 2.0,
                formatted: false,
                ..Default::default()
            },
        );
        let out = table.primitives(&fonts());
        assert!(out.iter().filter(|p| p.is_text()).count() > 1);
    }
}
