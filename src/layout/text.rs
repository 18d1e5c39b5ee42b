//! # Rich Text Layout
//!
//! Word-wraps styled runs into [`LayoutLine`]s and turns them into
//! primitives.
//!
//! ## Pipeline
//!
//! ```text
//! markup ──parse──► hard lines ──words──► wrapped lines ──clip──► LayoutLine
//!                                             │
//!                       measure(line + " " + word) ≤ max_width
//! ```
//!
//! Widths come from the [`FontRegistry`], per run and per variant: bold runs
//! are measured with the bold variant, italic runs with the italic one.
//!
//! Every line advances by `size + 1` dots. Underline and strike-through are
//! drawn as separate lines, not glyph features:
//!
//! ```text
//! line_top ─────────────────────
//!              Strike ──────────  line_top + size / 2
//!
//!              Under
//!              ─────────────────  line_top + size
//! ```

use super::Field;
use super::barcode::Alignment;
use super::markup::{HardLine, StyleRun, content_lines, is_break_space};
use super::primitive::{Point, Primitive, Size, TextStyle};
use crate::font::{FontRegistry, FontSpec};

/// A positioned run inside a [`LayoutLine`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRun {
    pub text: String,
    pub style: TextStyle,
    /// Offset from the start of the line, in dots
    pub x: f32,
    pub width: f32,
}

/// One wrapped output line.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    /// Offset of the line's top from the top of the text block
    pub y: u32,
    pub width: f32,
    pub runs: Vec<LayoutRun>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    Underline,
    Strike,
}

/// A horizontal decoration segment, relative to the text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub x_start: f32,
    pub x_end: f32,
    pub y: u32,
    pub thickness: u32,
}

impl LayoutLine {
    /// Underline and strike segments for this line.
    ///
    /// Consecutive decorated runs share one segment. Underlines come first.
    pub fn decorations(&self, font: &FontSpec) -> Vec<Decoration> {
        let thickness = (font.size / 10).max(1);
        let mut out = Vec::new();

        for (kind, offset) in [
            (DecorationKind::Underline, font.size),
            (DecorationKind::Strike, font.size / 2),
        ] {
            let mut span: Option<(f32, f32)> = None;
            for run in &self.runs {
                let decorated = match kind {
                    DecorationKind::Underline => run.style.underline,
                    DecorationKind::Strike => run.style.strike,
                };
                if decorated {
                    let end = run.x + run.width;
                    span = Some(match span {
                        Some((start, _)) => (start, end),
                        None => (run.x, end),
                    });
                } else if let Some((x_start, x_end)) = span.take() {
                    out.push(Decoration {
                        kind,
                        x_start,
                        x_end,
                        y: self.y + offset,
                        thickness,
                    });
                }
            }
            if let Some((x_start, x_end)) = span {
                out.push(Decoration {
                    kind,
                    x_start,
                    x_end,
                    y: self.y + offset,
                    thickness,
                });
            }
        }
        out
    }
}

// ============================================================================
// MEASUREMENT
// ============================================================================

struct Measure<'a> {
    fonts: &'a FontRegistry,
    font: &'a FontSpec,
}

impl Measure<'_> {
    fn run(&self, text: &str, style: TextStyle) -> f32 {
        self.fonts
            .text_width(text, &self.font.styled(style.bold, style.italic))
    }

    fn runs(&self, runs: &[StyleRun]) -> f32 {
        runs.iter().map(|r| self.run(&r.text, r.style)).sum()
    }
}

fn push_text(runs: &mut Vec<StyleRun>, text: &str, style: TextStyle) {
    match runs.last_mut() {
        Some(run) if run.style == style => run.text.push_str(text),
        _ => runs.push(StyleRun::new(text, style)),
    }
}

// ============================================================================
// WORDS
// ============================================================================

/// A whitespace-delimited word, possibly mixing styles (`a<b>b</b>`).
#[derive(Debug, Clone)]
struct Word {
    pieces: Vec<StyleRun>,
    /// Style of the whitespace before this word
    gap: TextStyle,
}

fn split_words(line: &[StyleRun]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut word: Option<Word> = None;
    let mut gap: Option<TextStyle> = None;

    for run in line {
        for c in run.text.chars() {
            if is_break_space(c) {
                if let Some(w) = word.take() {
                    words.push(w);
                }
                gap.get_or_insert(run.style);
            } else {
                let w = word.get_or_insert_with(|| Word {
                    pieces: Vec::new(),
                    gap: gap.take().unwrap_or(run.style),
                });
                let mut buf = [0u8; 4];
                push_text(&mut w.pieces, c.encode_utf8(&mut buf), run.style);
            }
        }
    }
    if let Some(w) = word {
        words.push(w);
    }
    words
}

fn append_word(line: &mut Vec<StyleRun>, word: &Word) {
    if !line.is_empty() {
        push_text(line, " ", word.gap);
    }
    for piece in &word.pieces {
        push_text(line, &piece.text, piece.style);
    }
}

/// Characters per chunk when a word is too long for an empty line.
fn force_split_chars(max_width: f32, size: u32) -> usize {
    ((max_width / size.max(1) as f32).floor() as usize).max(1)
}

fn force_split(word: &Word, chunk_chars: usize) -> Vec<Vec<StyleRun>> {
    let chars: Vec<(char, TextStyle)> = word
        .pieces
        .iter()
        .flat_map(|p| p.text.chars().map(move |c| (c, p.style)))
        .collect();

    chars
        .chunks(chunk_chars)
        .map(|chunk| {
            let mut runs = Vec::new();
            let mut buf = [0u8; 4];
            for &(c, style) in chunk {
                push_text(&mut runs, c.encode_utf8(&mut buf), style);
            }
            runs
        })
        .collect()
}

/// Wrap one hard line. Always yields at least one (possibly empty) line.
fn wrap(line: &HardLine, max_width: Option<f32>, measure: &Measure<'_>) -> Vec<Vec<StyleRun>> {
    let words = split_words(line);

    let Some(max_width) = max_width else {
        let mut joined = Vec::new();
        for word in &words {
            append_word(&mut joined, word);
        }
        return vec![joined];
    };

    let mut lines = Vec::new();
    let mut current: Vec<StyleRun> = Vec::new();

    for word in &words {
        if !current.is_empty() {
            let mut candidate = current.clone();
            append_word(&mut candidate, word);
            if measure.runs(&candidate) <= max_width {
                current = candidate;
                continue;
            }
            lines.push(std::mem::take(&mut current));
        }

        if measure.runs(&word.pieces) <= max_width {
            append_word(&mut current, word);
        } else {
            let mut chunks = force_split(word, force_split_chars(max_width, measure.font.size));
            if let Some(last) = chunks.pop() {
                lines.extend(chunks);
                current = last;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Lay out text into positioned lines.
///
/// Lines are produced until their accumulated height reaches `max_height`;
/// the rest are dropped.
///
/// ## Example
///
/// ```
/// use tspl_label::font::{FontRegistry, FontSpec};
/// use tspl_label::layout::text::layout;
///
/// // Unregistered fonts measure as chars × size
/// let fonts = FontRegistry::default();
/// let font = FontSpec::new("default", 10);
///
/// let lines = layout(&fonts, "aaa bbb", &font, Some(50.0), None, true);
/// let ys: Vec<u32> = lines.iter().map(|l| l.y).collect();
/// assert_eq!(ys, vec![0, 11]);
/// ```
pub fn layout(
    fonts: &FontRegistry,
    markup: &str,
    font: &FontSpec,
    max_width: Option<f32>,
    max_height: Option<f32>,
    formatted: bool,
) -> Vec<LayoutLine> {
    let measure = Measure { fonts, font };
    let line_height = font.line_height();
    let mut out = Vec::new();
    let mut y = 0u32;

    for hard_line in content_lines(markup, formatted) {
        let wrapped = match max_width {
            None if !formatted => vec![hard_line],
            _ => wrap(&hard_line, max_width, &measure),
        };
        for runs in wrapped {
            if let Some(max_height) = max_height
                && y as f32 >= max_height
            {
                return out;
            }

            let mut x = 0.0f32;
            let runs: Vec<LayoutRun> = runs
                .into_iter()
                .map(|run| {
                    let width = measure.run(&run.text, run.style);
                    let positioned = LayoutRun {
                        text: run.text,
                        style: run.style,
                        x,
                        width,
                    };
                    x += width;
                    positioned
                })
                .collect();

            out.push(LayoutLine { y, width: x, runs });
            y += line_height;
        }
    }

    out
}

/// Number of lines `text` would wrap to in `width` dots.
///
/// A lighter estimate than [`layout`]: no markup, one font variant, and a
/// force-split word leaves only its last chunk on the current line. Blank
/// text counts as one line.
pub fn estimate_line_count(fonts: &FontRegistry, text: &str, font: &FontSpec, width: f32) -> usize {
    let words: Vec<&str> = text.split(is_break_space).filter(|w| !w.is_empty()).collect();
    if words.is_empty() {
        return 1;
    }

    let chars_per_line = force_split_chars(width, font.size);
    let mut lines = 1usize;
    let mut current = String::new();

    for word in words {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if fonts.text_width(&candidate, font) <= width {
            current = candidate;
        } else if current.is_empty() {
            let chars: Vec<char> = word.chars().collect();
            let needed = chars.len().div_ceil(chars_per_line);
            lines += needed - 1;
            current = chars[(needed - 1) * chars_per_line..].iter().collect();
        } else {
            lines += 1;
            current = word.to_string();
        }
    }

    lines
}

// ============================================================================
// TEXT FIELD
// ============================================================================

/// A block of (optionally formatted) text at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub content: String,
    pub position: Point,
    pub formatted: bool,
    pub font: FontSpec,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
}

impl TextField {
    pub fn new(content: impl Into<String>, x: i32, y: i32, formatted: bool) -> Self {
        Self {
            content: content.into(),
            position: Point::new(x, y),
            formatted,
            font: FontSpec::default(),
            max_width: None,
            max_height: None,
        }
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    /// Wrap at `width` dots and clip at `height` dots, if given.
    pub fn multi_line(mut self, width: f32, height: Option<f32>) -> Self {
        self.max_width = Some(width);
        self.max_height = height;
        self
    }

    pub fn lines(&self, fonts: &FontRegistry) -> Vec<LayoutLine> {
        layout(
            fonts,
            &self.content,
            &self.font,
            self.max_width,
            self.max_height,
            self.formatted,
        )
    }
}

impl Field for TextField {
    fn emit(&self, fonts: &FontRegistry, out: &mut Vec<Primitive>) {
        let wrap_box = self.max_width.map(|width| Size {
            width,
            height: self.max_height.unwrap_or(f32::INFINITY),
        });

        for line in self.lines(fonts) {
            for run in &line.runs {
                out.push(Primitive::Text {
                    content: run.text.replace('\u{a0}', " "),
                    font: self.font.styled(run.style.bold, run.style.italic),
                    style: run.style,
                    position: self.position.offset(run.x.round() as i32, line.y as i32),
                    wrap_box,
                });
            }
            for deco in line.decorations(&self.font) {
                let y = deco.y as i32;
                out.push(Primitive::line(
                    self.position.offset(deco.x_start.round() as i32, y),
                    self.position.offset(deco.x_end.round() as i32, y),
                    deco.thickness,
                ));
            }
        }
    }
}

// ============================================================================
// TEXT BLOCK
// ============================================================================

/// Text the printer wraps itself inside a `width × height` box (`BLOCK`).
///
/// Unlike [`TextField`] nothing is measured here: no markup, no
/// decorations, and line breaking follows the firmware's font metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub content: String,
    pub position: Point,
    pub width: u32,
    pub height: u32,
    pub font: FontSpec,
    pub rotation: u16,
    /// Extra space between lines, in dots
    pub spacing: u32,
    pub alignment: Alignment,
}

impl TextBlock {
    pub fn new(content: impl Into<String>, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            content: content.into(),
            position: Point::new(x, y),
            width,
            height,
            font: FontSpec::default(),
            rotation: 0,
            spacing: 0,
            alignment: Alignment::Left,
        }
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    pub fn with_rotation(mut self, rotation: u16) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

impl Field for TextBlock {
    fn emit(&self, _fonts: &FontRegistry, out: &mut Vec<Primitive>) {
        out.push(Primitive::Block(self.clone()));
    }
}

// ============================================================================
// TESTS
// ============================================================================
