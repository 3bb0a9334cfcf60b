//! Line lexer — classifies each input line into a [`LineKind`].
//!
//! Classification is purely local to a single trimmed line; no cross-line
//! context is consulted. Rules are tried in a fixed order — first match
//! wins.
//!
//! The lexer never fails (`LexError` is uninhabited): worst case a line
//! falls through to `Text`.

mod patterns;

use std::fmt;

/// The closed, stable set of line classifications.
///
/// `BlockAttrs` and `StemAttrLine` are part of the enumeration but are never
/// produced by this lexer. Block attribute lines (`[source,python]`) fall
/// through as `Text` and are recognized by the parser's metadata routine
/// from their bracket shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Eof,
    Blank,
    BlockAnchor,
    BlockAttrs,
    BlockTitle,
    Section,
    Admonition,
    LineComment,
    Thematic,
    Pagebreak,
    UlItem,
    OlItem,
    DescTerm,
    ListCont,
    DelimListing,
    DelimLiteral,
    DelimQuote,
    DelimExample,
    DelimSidebar,
    DelimOpen,
    DelimComment,
    TableDelim,
    TableLine,
    BlockMacro,
    Directive,
    StemAttrLine,
    Text,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One classified input line.
///
/// `level` holds the run length for section/list markers (1–6) or the
/// colon-count for description terms; `head` the admonition label or
/// macro/directive name; `rest` the remainder of the line after the marker.
/// `raw` is the untrimmed original line, used by literal paragraphs to tell
/// leading whitespace apart from trimmed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTok {
    pub kind: LineKind,
    pub line_no: usize,
    pub raw: String,
    pub level: u8,
    pub head: String,
    pub rest: String,
}

impl LineTok {
    fn new(kind: LineKind, line_no: usize, raw: &str) -> Self {
        Self {
            kind,
            line_no,
            raw: raw.to_string(),
            level: 0,
            head: String::new(),
            rest: String::new(),
        }
    }

    fn eof(line_no: usize) -> Self {
        Self::new(LineKind::Eof, line_no, "")
    }
}

/// Splits `text` into [`LineTok`]s, eagerly, then offers bounded lookahead.
///
/// The parser never needs more than `peek(5)` (k≤6 total including the
/// current token), so a `Vec` with an index satisfies an O(1)-peek contract
/// without the complexity of a ring buffer; callers reading very large
/// inputs under memory pressure can swap this for a streaming variant
/// without changing the parser.
pub struct Lexer {
    tokens: Vec<LineTok>,
    pos: usize,
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            tokens: vec![LineTok::eof(0)],
            pos: 0,
        }
    }

    pub fn set_input(&mut self, text: &str) {
        self.tokens = tokenize(text);
        self.pos = 0;
    }

    /// Look `k` tokens ahead of the cursor (`k = 0` is the next token to be
    /// taken). Past the end, returns the synthetic `EOF` token.
    pub fn peek(&self, k: usize) -> &LineTok {
        let idx = self.pos + k;
        self.tokens
            .get(idx)
            .unwrap_or_else(|| self.tokens.last().expect("EOF token always present"))
    }

    /// Consume and return the next token.
    pub fn take(&mut self) -> LineTok {
        let tok = self.peek(0).clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    pub fn at_end(&self) -> bool {
        self.peek(0).kind == LineKind::Eof
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

fn tokenize(text: &str) -> Vec<LineTok> {
    let mut tokens: Vec<LineTok> = patterns::split_lines(text)
        .enumerate()
        .map(|(i, raw)| classify_line(i + 1, raw))
        .collect();
    let eof_line = tokens.len() + 1;
    tokens.push(LineTok::eof(eof_line));
    tokens
}

/// Classifies a single raw (untrimmed) line, per the ordered rule table.
fn classify_line(line_no: usize, raw: &str) -> LineTok {
    let s = raw.trim();

    if s.is_empty() {
        return LineTok::new(LineKind::Blank, line_no, raw);
    }

    if s.starts_with("[[") && s.ends_with("]]") {
        let mut t = LineTok::new(LineKind::BlockAnchor, line_no, raw);
        t.rest = s.to_string();
        return t;
    }

    if s.len() >= 2 && s.starts_with('.') && !s[1..].starts_with(char::is_whitespace) {
        let mut t = LineTok::new(LineKind::BlockTitle, line_no, raw);
        t.rest = s[1..].to_string();
        return t;
    }

    for directive in ["ifdef", "ifndef", "endif"] {
        let prefix = format!("{directive}::");
        if let Some(rest) = s.strip_prefix(&prefix) {
            let mut t = LineTok::new(LineKind::Directive, line_no, raw);
            t.head = directive.to_string();
            t.rest = rest.to_string();
            return t;
        }
    }

    if let Some(rest) = s.strip_prefix("include::") {
        let mut t = LineTok::new(LineKind::BlockMacro, line_no, raw);
        t.head = "include".to_string();
        t.rest = rest.to_string();
        return t;
    }

    if let Some((head, rest)) = patterns::split_block_macro(s) {
        let mut t = LineTok::new(LineKind::BlockMacro, line_no, raw);
        t.head = head;
        t.rest = rest;
        return t;
    }

    if let Some(rest) = s.strip_prefix("//") {
        let mut t = LineTok::new(LineKind::LineComment, line_no, raw);
        t.rest = rest.to_string();
        return t;
    }

    if s == "'''" || s == "---" || s == "***" {
        return LineTok::new(LineKind::Thematic, line_no, raw);
    }

    if s.starts_with("<<<") {
        return LineTok::new(LineKind::Pagebreak, line_no, raw);
    }

    if let Some((level, rest)) = patterns::match_run(s, '=') {
        let mut t = LineTok::new(LineKind::Section, line_no, raw);
        t.level = level;
        t.rest = rest;
        return t;
    }

    if let Some((level, rest)) = patterns::match_run(s, '*') {
        let mut t = LineTok::new(LineKind::UlItem, line_no, raw);
        t.level = level;
        t.rest = rest;
        return t;
    }

    if let Some((level, rest)) = patterns::match_run(s, '.') {
        let mut t = LineTok::new(LineKind::OlItem, line_no, raw);
        t.level = level;
        t.rest = rest;
        return t;
    }

    if s == "+" {
        return LineTok::new(LineKind::ListCont, line_no, raw);
    }

    if let Some((level, term)) = patterns::match_desc_term(s) {
        let mut t = LineTok::new(LineKind::DescTerm, line_no, raw);
        t.level = level;
        t.rest = term;
        return t;
    }

    if s == "|===" {
        return LineTok::new(LineKind::TableDelim, line_no, raw);
    }

    if s.starts_with('|') {
        let mut t = LineTok::new(LineKind::TableLine, line_no, raw);
        t.rest = s.to_string();
        return t;
    }

    if let Some(kind) = patterns::match_delimiter_fence(s) {
        return LineTok::new(kind, line_no, raw);
    }

    if let Some((label, rest)) = patterns::match_admonition(s) {
        let mut t = LineTok::new(LineKind::Admonition, line_no, raw);
        t.head = label;
        t.rest = rest;
        return t;
    }

    let mut t = LineTok::new(LineKind::Text, line_no, raw);
    t.rest = raw.to_string();
    t
}
