//! # Inline Markup
//!
//! Parses the small HTML subset text fields accept into a tagged AST, then
//! flattens it into hard lines of [`StyleRun`]s.
//!
//! ## Recognised Tags
//!
//! | Tags | Effect |
//! |------|--------|
//! | `<b>`, `<strong>` | bold |
//! | `<i>`, `<em>` | italic |
//! | `<u>` | underline |
//! | `<s>`, `<strike>`, `<del>` | strike-through |
//! | `<p>` | paragraph |
//! | `<br>`, `<br/>` | line break |
//!
//! Other tags are dropped and their content kept. A `<` that doesn't start a
//! well-formed tag is literal text. Closing tags with no matching open tag
//! are ignored, and anything still open at the end of input is closed there.
//!
//! ## Line Breaks
//!
//! ```text
//! <p>First</p><p>Second</p>        →  First / Second
//! <p>First<br/></p><p>Second</p>   →  First / Second
//! a<br><br>b                        →  a / (blank) / b
//! ```

use super::primitive::TextStyle;

/// Markup AST node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Bold(Vec<Node>),
    Italic(Vec<Node>),
    Underline(Vec<Node>),
    Strike(Vec<Node>),
    Paragraph(Vec<Node>),
    LineBreak,
}

/// A span of text sharing one set of emphasis flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRun {
    pub text: String,
    pub style: TextStyle,
}

impl StyleRun {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// One line of content that must start on a new line, before wrapping.
pub type HardLine = Vec<StyleRun>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Bold,
    Italic,
    Underline,
    Strike,
    Paragraph,
}

impl Container {
    fn from_tag(name: &str) -> Option<Self> {
        match name {
            "b" | "strong" => Some(Container::Bold),
            "i" | "em" => Some(Container::Italic),
            "u" => Some(Container::Underline),
            "s" | "strike" | "del" => Some(Container::Strike),
            "p" => Some(Container::Paragraph),
            _ => None,
        }
    }

    fn wrap(self, children: Vec<Node>) -> Node {
        match self {
            Container::Bold => Node::Bold(children),
            Container::Italic => Node::Italic(children),
            Container::Underline => Node::Underline(children),
            Container::Strike => Node::Strike(children),
            Container::Paragraph => Node::Paragraph(children),
        }
    }
}

// ============================================================================
// TOKENIZER
// ============================================================================

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Open(String),
    Close(String),
    SelfClosing(String),
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'<'
            && let Some((tag, len)) = parse_tag(&input[i..])
        {
            if text_start < i {
                tokens.push(Token::Text(&input[text_start..i]));
            }
            tokens.push(tag);
            i += len;
            text_start = i;
            continue;
        }
        i += 1;
    }

    if text_start < input.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }
    tokens
}

/// Parse a tag at the start of `s` (which begins with `<`).
///
/// Returns the token and the number of bytes consumed.
fn parse_tag(s: &str) -> Option<(Token<'static>, usize)> {
    let rest = &s[1..];
    let (closing, rest) = match rest.strip_prefix('/') {
        Some(r) => (true, r),
        None => (false, rest),
    };

    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let name_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    let name = rest[..name_len].to_ascii_lowercase();

    let after = &rest[name_len..];
    let end = after.find(['>', '<'])?;
    if after.as_bytes()[end] != b'>' {
        return None;
    }
    let attrs = &after[..end];
    if !attrs.is_empty() && !attrs.starts_with(|c: char| c.is_whitespace() || c == '/') {
        return None;
    }

    let consumed = 1 + usize::from(closing) + name_len + end + 1;
    let token = if closing {
        Token::Close(name)
    } else if attrs.trim_end().ends_with('/') {
        Token::SelfClosing(name)
    } else {
        Token::Open(name)
    };
    Some((token, consumed))
}

const ENTITIES: [(&str, char); 6] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
    ("&nbsp;", '\u{a0}'),
];

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(name, _)| rest.starts_with(name)) {
            Some((name, ch)) => {
                out.push(*ch);
                rest = &rest[name.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// PARSER
// ============================================================================

/// Parse markup into an AST. Never fails; malformed input degrades to text.
///
/// ## Example
///
/// ```
/// use tspl_label::layout::markup::{parse, Node};
///
/// let nodes = parse("<b>Hi</b> there");
/// assert_eq!(nodes, vec![
///     Node::Bold(vec![Node::Text("Hi".into())]),
///     Node::Text(" there".into()),
/// ]);
/// ```
pub fn parse(markup: &str) -> Vec<Node> {
    let mut stack: Vec<(Option<Container>, Vec<Node>)> = vec![(None, Vec::new())];

    for token in tokenize(markup) {
        match token {
            Token::Text(text) => push_node(&mut stack, Node::Text(decode_entities(text))),
            Token::Open(name) => {
                if name == "br" {
                    push_node(&mut stack, Node::LineBreak);
                } else if let Some(kind) = Container::from_tag(&name) {
                    stack.push((Some(kind), Vec::new()));
                }
            }
            Token::SelfClosing(name) => {
                if name == "br" {
                    push_node(&mut stack, Node::LineBreak);
                } else if let Some(kind) = Container::from_tag(&name) {
                    push_node(&mut stack, kind.wrap(Vec::new()));
                }
            }
            Token::Close(name) => {
                let Some(kind) = Container::from_tag(&name) else {
                    continue;
                };
                if let Some(depth) = stack.iter().rposition(|(k, _)| *k == Some(kind)) {
                    while stack.len() > depth {
                        close_top(&mut stack);
                    }
                }
            }
        }
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }
    stack.pop().map(|(_, nodes)| nodes).unwrap_or_default()
}

fn push_node(stack: &mut [(Option<Container>, Vec<Node>)], node: Node) {
    if let Some((_, nodes)) = stack.last_mut() {
        nodes.push(node);
    }
}

fn close_top(stack: &mut Vec<(Option<Container>, Vec<Node>)>) {
    if let Some((Some(kind), children)) = stack.pop() {
        push_node(stack, kind.wrap(children));
    }
}

/// Remove everything between `<` and the next `>`.
///
/// Used for measurement, where formatting doesn't matter.
pub fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(start) = rest.find('<') {
        match rest[start..].find('>') {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + end + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// FLATTENING
// ============================================================================

/// Whitespace that separates words. Non-breaking spaces don't.
pub fn is_break_space(c: char) -> bool {
    c.is_whitespace() && c != '\u{a0}'
}

#[derive(Default)]
struct LineCollector {
    lines: Vec<HardLine>,
    current: HardLine,
}

impl LineCollector {
    fn push_text(&mut self, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        match self.current.last_mut() {
            Some(run) if run.style == style => run.text.push_str(text),
            _ => self.current.push(StyleRun::new(text, style)),
        }
    }

    fn has_content(&self) -> bool {
        self.current
            .iter()
            .any(|run| run.text.chars().any(|c| !is_break_space(c)))
    }

    fn line_break(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
    }

    /// Paragraph edge: ends the current line unless nothing visible is on it.
    fn block_boundary(&mut self) {
        if self.has_content() {
            self.line_break();
        } else {
            self.current.clear();
        }
    }

    fn finish(mut self) -> Vec<HardLine> {
        self.block_boundary();
        self.lines
    }
}

fn collect(nodes: &[Node], style: TextStyle, out: &mut LineCollector) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_text(text, style),
            Node::LineBreak => out.line_break(),
            Node::Bold(children) => collect(children, TextStyle { bold: true, ..style }, out),
            Node::Italic(children) => collect(children, TextStyle { italic: true, ..style }, out),
            Node::Underline(children) => {
                collect(children, TextStyle { underline: true, ..style }, out)
            }
            Node::Strike(children) => collect(children, TextStyle { strike: true, ..style }, out),
            Node::Paragraph(children) => {
                out.block_boundary();
                collect(children, style, out);
                out.block_boundary();
            }
        }
    }
}

/// Flatten an AST into hard lines.
///
/// A `<br>` always ends the current line, so consecutive breaks leave a
/// blank line. Paragraph edges only end a line that has visible content.
pub fn hard_lines(nodes: &[Node]) -> Vec<HardLine> {
    let mut collector = LineCollector::default();
    collect(nodes, TextStyle::PLAIN, &mut collector);
    collector.finish()
}

/// Hard lines for a text field's content.
///
/// Unformatted content is taken literally as a single line, tags and
/// whitespace included. Empty content is one line with no runs.
pub fn content_lines(content: &str, formatted: bool) -> Vec<HardLine> {
    if formatted {
        hard_lines(&parse(content))
    } else if content.is_empty() {
        vec![Vec::new()]
    } else {
        vec![vec![StyleRun::new(content, TextStyle::PLAIN)]]
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    fn line_texts(lines: &[HardLine]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.iter().map(|r| r.text.as_str()).collect::<String>())
            .collect()
    }

    #[test]
    fn test_nested_tags() {
        let nodes = parse("<b>bold <i>both</i></b>");
        assert_eq!(
            nodes,
            vec![Node::Bold(vec![text("bold "), Node::Italic(vec![text("both")])])]
        );
    }

    #[test]
    fn test_synonyms() {
        let nodes = parse("<strong>a</strong><em>b</em><del>c</del><strike>d</strike>");
        assert_eq!(
            nodes,
            vec![
                Node::Bold(vec![text("a")]),
                Node::Italic(vec![text("b")]),
                Node::Strike(vec![text("c")]),
                Node::Strike(vec![text("d")]),
            ]
        );
    }

    #[test]
    fn test_tags_are_case_insensitive() {
        assert_eq!(parse("<B>x</B>"), vec![Node::Bold(vec![text("x")])]);
    }

    #[test]
    fn test_unknown_tags_keep_content() {
        assert_eq!(
            parse("<span class=\"x\">hi</span>"),
            vec![text("hi")]
        );
    }

    #[test]
    fn test_unmatched_close_is_ignored() {
        assert_eq!(parse("a</b>b"), vec![text("a"), text("b")]);
    }

    #[test]
    fn test_unclosed_tag_closes_at_end() {
        assert_eq!(parse("<u>open"), vec![Node::Underline(vec![text("open")])]);
    }

    #[test]
    fn test_close_pops_intervening_tags() {
        let nodes = parse("<b><i>x</b>y");
        assert_eq!(
            nodes,
            vec![Node::Bold(vec![Node::Italic(vec![text("x")])]), text("y")]
        );
    }

    #[test]
    fn test_stray_angle_bracket_is_text() {
        let nodes = parse("1 < 2 and 3 > 2");
        let lines = hard_lines(&nodes);
        assert_eq!(line_texts(&lines), vec!["1 < 2 and 3 > 2"]);
    }

    #[test]
    fn test_unterminated_tag_is_text() {
        let lines = hard_lines(&parse("a <b b"));
        assert_eq!(line_texts(&lines), vec!["a <b b"]);
    }

    #[test]
    fn test_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt; &quot;&#39;"), "a & b <c> \"'");
        assert_eq!(decode_entities("&nbsp;"), "\u{a0}");
        assert_eq!(decode_entities("AT&T &unknown;"), "AT&T &unknown;");
    }

    #[test]
    fn test_paragraphs_yield_one_line_each() {
        let lines = hard_lines(&parse("<p>First</p><p>Second</p>"));
        assert_eq!(line_texts(&lines), vec!["First", "Second"]);
    }

    #[test]
    fn test_trailing_break_in_paragraph_adds_no_blank_line() {
        let lines = hard_lines(&parse("<p>First<br/></p><p>Second</p>"));
        assert_eq!(line_texts(&lines), vec!["First", "Second"]);
    }

    #[test]
    fn test_whitespace_between_paragraphs_is_ignored() {
        let lines = hard_lines(&parse("<p>A</p>\n  <p>B</p>\n"));
        assert_eq!(line_texts(&lines), vec!["A", "B"]);
    }

    #[test]
    fn test_double_break_leaves_blank_line() {
        let lines = hard_lines(&parse("a<br><br>b"));
        assert_eq!(line_texts(&lines), vec!["a", "", "b"]);
    }

    #[test]
    fn test_styles_flatten_into_runs() {
        let lines = hard_lines(&parse("<u>U</u><s>S</s>"));
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            vec![
                StyleRun::new("U", TextStyle { underline: true, ..TextStyle::PLAIN }),
                StyleRun::new("S", TextStyle { strike: true, ..TextStyle::PLAIN }),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(hard_lines(&parse("")).is_empty());
    }

    #[test]
    fn test_unformatted_keeps_tags() {
        let lines = content_lines("<b>x</b>", false);
        assert_eq!(line_texts(&lines), vec!["<b>x</b>"]);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>Bold</b> and <i>it</i>"), "Bold and it");
        assert_eq!(strip_tags("a < b"), "a < b");
    }
}
