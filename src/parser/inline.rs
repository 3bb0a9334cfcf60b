//! Inline scanner: a single left-to-right pass over a joined block of text
//! (paragraph body, table cell, list item, admonition text, description
//! definition) producing an ordered run of inline nodes.
//!
//! Recognizers are tried in a fixed priority order: attribute reference,
//! cross-reference, inline anchor, URL autolink, inline macro, emphasis
//! (unconstrained pair before constrained single), then passthrough fences.
//! Anything none of these match falls into a running `Text` accumulator
//! that is flushed on the next structural match (or at the end of the
//! scan).
//!
//! Paired constructs re-scan their inner text recursively, except monospace,
//! which stores its inner text raw (the constrained-emphasis rule that
//! preserves literal characters). A depth counter bounds that recursion,
//! past which the scanner stops trying to match anything and just
//! accumulates the remaining text.

use crate::ast::{Node, NodeId, NodeKind, Position};
use crate::parser::Parser;

const MAX_RECURSION_DEPTH: usize = 16;

const URL_SCHEMES: [&str; 5] = ["https:", "http:", "ftp:", "irc:", "mailto:"];

/// Scans `text` for inline markup and appends the resulting nodes as
/// children of `parent`. `pos` is the position of the enclosing block; every
/// inline node it produces is stamped with that same position (the joining
/// of physical source lines into one scan string means per-character column
/// tracking isn't attempted — see DESIGN.md).
pub fn scan_into(parser: &mut Parser, parent: NodeId, text: &str, pos: Position) {
    scan(parser, parent, text, pos, 0);
}

fn scan(parser: &mut Parser, parent: NodeId, text: &str, pos: Position, depth: usize) {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0usize;
    let mut buf = String::new();

    while i < chars.len() {
        if depth < MAX_RECURSION_DEPTH {
            if let Some(m) = try_match(&chars, i) {
                flush_text(parser, parent, &mut buf, pos);
                let len = match_len(&m).max(1);
                emit(parser, parent, m, pos, depth);
                i += len;
                continue;
            }
        }
        buf.push(chars[i]);
        i += 1;
    }
    flush_text(parser, parent, &mut buf, pos);
}

fn flush_text(parser: &mut Parser, parent: NodeId, buf: &mut String, pos: Position) {
    if !buf.is_empty() {
        let node = Node::with_text(NodeKind::Text, pos, std::mem::take(buf));
        parser.append(parent, node);
    }
}

/// One recognized inline construct, with everything needed to both build its
/// node and know how many source characters it consumed.
enum Match {
    AttrRef { name: String, len: usize },
    Xref { id: String, text: Option<String>, len: usize },
    Anchor { id: String, text: Option<String>, len: usize },
    Autolink { url: String, text: Option<String>, len: usize },
    Image { target: String, alt: String, len: usize },
    InlineMacro { name: String, target: String, args: String, len: usize },
    Emph { kind: &'static str, inner: String, raw: bool, len: usize },
    Super { inner: String, len: usize },
    Sub { inner: String, len: usize },
    Passthrough { inner: String, len: usize },
}

fn try_match(chars: &[char], i: usize) -> Option<Match> {
    match_attr_ref(chars, i)
        .or_else(|| match_xref(chars, i))
        .or_else(|| match_anchor(chars, i))
        .or_else(|| match_autolink(chars, i))
        .or_else(|| match_inline_macro(chars, i))
        .or_else(|| match_emphasis(chars, i))
        .or_else(|| match_passthrough(chars, i))
}

fn emit(parser: &mut Parser, parent: NodeId, m: Match, pos: Position, depth: usize) {
    match m {
        Match::AttrRef { name, .. } => {
            let node = Node::new(NodeKind::AttrRef, pos).with_name(name);
            parser.append(parent, node);
        }
        Match::Xref { id, text, .. } => {
            let node = Node::new(NodeKind::Xref, pos).with_target(id);
            let node_id = parser.append(parent, node);
            if let Some(t) = text {
                scan(parser, node_id, &t, pos, depth + 1);
            }
        }
        Match::Anchor { id, text, .. } => {
            let mut node = Node::new(NodeKind::AnchorInline, pos).with_target(id);
            if let Some(t) = text {
                node = node.with_name(t);
            }
            parser.append(parent, node);
        }
        Match::Autolink { url, text, .. } => {
            let node = Node::new(NodeKind::Link, pos).with_target(url);
            let node_id = parser.append(parent, node);
            if let Some(t) = text {
                scan(parser, node_id, &t, pos, depth + 1);
            }
        }
        Match::Image { target, alt, .. } => {
            let node = Node::new(NodeKind::ImageInline, pos)
                .with_target(target)
                .with_name(alt);
            parser.append(parent, node);
        }
        Match::InlineMacro {
            name, target, args, ..
        } => {
            let node = Node::new(NodeKind::InlineMacro, pos)
                .with_name(name)
                .with_target(target);
            let node_id = parser.append(parent, node);
            if !args.is_empty() {
                scan(parser, node_id, &args, pos, depth + 1);
            }
        }
        Match::Emph {
            kind, inner, raw, ..
        } => {
            let node = Node::new(NodeKind::Emph, pos).with_name(kind);
            let node_id = parser.append(parent, node);
            if raw {
                parser.tree.get_mut(node_id).unwrap().value().text = Some(inner);
            } else {
                scan(parser, node_id, &inner, pos, depth + 1);
            }
        }
        Match::Super { inner, .. } => {
            let node = Node::new(NodeKind::Superscript, pos);
            let node_id = parser.append(parent, node);
            scan(parser, node_id, &inner, pos, depth + 1);
        }
        Match::Sub { inner, .. } => {
            let node = Node::new(NodeKind::Subscript, pos);
            let node_id = parser.append(parent, node);
            scan(parser, node_id, &inner, pos, depth + 1);
        }
        Match::Passthrough { inner, .. } => {
            let node = Node::with_text(NodeKind::PassthroughInline, pos, inner);
            parser.append(parent, node);
        }
    }
}

fn match_len(m: &Match) -> usize {
    match m {
        Match::AttrRef { len, .. }
        | Match::Xref { len, .. }
        | Match::Anchor { len, .. }
        | Match::Autolink { len, .. }
        | Match::Image { len, .. }
        | Match::InlineMacro { len, .. }
        | Match::Emph { len, .. }
        | Match::Super { len, .. }
        | Match::Sub { len, .. }
        | Match::Passthrough { len, .. } => *len,
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric()
}

/// Finds the earliest occurrence of `marker` in `chars` at or after `from`.
fn find_marker(chars: &[char], from: usize, marker: &str) -> Option<usize> {
    let marker: Vec<char> = marker.chars().collect();
    if marker.is_empty() || from + marker.len() > chars.len() {
        return None;
    }
    (from..=chars.len().saturating_sub(marker.len())).find(|&start| chars[start..start + marker.len()] == marker[..])
}

fn slice_matches(chars: &[char], i: usize, marker: &str) -> bool {
    let marker: Vec<char> = marker.chars().collect();
    i + marker.len() <= chars.len() && chars[i..i + marker.len()] == marker[..]
}

fn to_string(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end].iter().collect()
}

/// `{name}` — name is restricted to identifier-ish characters so a bare `{`
/// in running prose (rare, but not impossible) doesn't get swallowed.
fn match_attr_ref(chars: &[char], i: usize) -> Option<Match> {
    if chars.get(i) != Some(&'{') {
        return None;
    }
    let mut j = i + 1;
    while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_' || chars[j] == '-' || chars[j] == '.') {
        j += 1;
    }
    if j == i + 1 || chars.get(j) != Some(&'}') {
        return None;
    }
    let name = to_string(chars, i + 1, j);
    Some(Match::AttrRef { name, len: j + 1 - i })
}

/// `<<id[,text]>>`
fn match_xref(chars: &[char], i: usize) -> Option<Match> {
    if !slice_matches(chars, i, "<<") {
        return None;
    }
    let close = find_marker(chars, i + 2, ">>")?;
    if close == i + 2 {
        return None;
    }
    let inner = to_string(chars, i + 2, close);
    let mut parts = inner.splitn(2, ',');
    let id = parts.next().unwrap_or("").trim().to_string();
    let text = parts.next().map(|s| s.trim().to_string());
    if id.is_empty() {
        return None;
    }
    Some(Match::Xref {
        id,
        text,
        len: close + 2 - i,
    })
}

/// `[[id[,text]]]`
fn match_anchor(chars: &[char], i: usize) -> Option<Match> {
    if !slice_matches(chars, i, "[[") {
        return None;
    }
    let close = find_marker(chars, i + 2, "]]")?;
    if close == i + 2 {
        return None;
    }
    let inner = to_string(chars, i + 2, close);
    let mut parts = inner.splitn(2, ',');
    let id = parts.next().unwrap_or("").trim().to_string();
    let text = parts.next().map(|s| s.trim().to_string());
    if id.is_empty() {
        return None;
    }
    Some(Match::Anchor {
        id,
        text,
        len: close + 2 - i,
    })
}

/// URL autolink: a scheme prefix followed by non-whitespace, non-bracket
/// characters, optionally followed by a bracketed link text.
fn match_autolink(chars: &[char], i: usize) -> Option<Match> {
    let scheme = URL_SCHEMES.iter().find(|s| slice_matches(chars, i, s))?;
    let mut j = i + scheme.chars().count();
    let body_start = j;
    while j < chars.len() && !chars[j].is_whitespace() && chars[j] != '[' && chars[j] != ']' {
        j += 1;
    }
    if j == body_start {
        return None;
    }
    let url = to_string(chars, i, j);
    let mut len = j - i;
    let mut text = None;
    if chars.get(j) == Some(&'[') {
        if let Some(close) = find_marker(chars, j + 1, "]") {
            text = Some(to_string(chars, j + 1, close));
            len = close + 1 - i;
        }
    }
    Some(Match::Autolink { url, text, len })
}

/// `name:target[args]` — `image:` is promoted to a dedicated `ImageInline`
/// node; every other macro name becomes a generic `InlineMacro`.
fn match_inline_macro(chars: &[char], i: usize) -> Option<Match> {
    let mut j = i;
    while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_' || chars[j] == '-') {
        j += 1;
    }
    if j == i || chars.get(j) != Some(&':') {
        return None;
    }
    // a second `:` right after means this is block-macro shaped (`name::`),
    // not the single-colon inline-macro shape.
    if chars.get(j + 1) == Some(&':') {
        return None;
    }
    let name = to_string(chars, i, j);
    let mut k = j + 1;
    while k < chars.len() && chars[k] != '[' {
        if chars[k].is_whitespace() {
            return None;
        }
        k += 1;
    }
    if chars.get(k) != Some(&'[') {
        return None;
    }
    let target = to_string(chars, j + 1, k);
    let close = find_marker(chars, k + 1, "]")?;
    let args = to_string(chars, k + 1, close);
    let len = close + 1 - i;

    if name == "image" {
        Some(Match::Image {
            target,
            alt: args,
            len,
        })
    } else {
        Some(Match::InlineMacro {
            name,
            target,
            args,
            len,
        })
    }
}

/// Bold/italic/mono each try an unconstrained (double-character) marker
/// first, then fall back to a constrained (single-character) one that
/// requires word-boundary context on both sides. Highlight/superscript/
/// subscript have only a single marker each, with no boundary requirement.
fn match_emphasis(chars: &[char], i: usize) -> Option<Match> {
    if let Some(m) = match_pair(chars, i, "**", "bold", false) {
        return Some(m);
    }
    if let Some(m) = match_constrained_pair(chars, i, '*', "bold") {
        return Some(m);
    }
    if let Some(m) = match_pair(chars, i, "__", "italic", false) {
        return Some(m);
    }
    if let Some(m) = match_constrained_pair(chars, i, '_', "italic") {
        return Some(m);
    }
    if let Some(m) = match_pair(chars, i, "``", "mono", true) {
        return Some(m);
    }
    if let Some(m) = match_constrained_mono(chars, i) {
        return Some(m);
    }
    if let Some(m) = match_single(chars, i, '#', "highlight") {
        return Some(m);
    }
    if chars.get(i) == Some(&'^') {
        if let Some(close) = find_marker(chars, i + 1, "^") {
            if close > i + 1 {
                return Some(Match::Super {
                    inner: to_string(chars, i + 1, close),
                    len: close + 1 - i,
                });
            }
        }
    }
    if chars.get(i) == Some(&'~') {
        if let Some(close) = find_marker(chars, i + 1, "~") {
            if close > i + 1 {
                return Some(Match::Sub {
                    inner: to_string(chars, i + 1, close),
                    len: close + 1 - i,
                });
            }
        }
    }
    None
}

fn match_pair(chars: &[char], i: usize, marker: &str, kind: &'static str, raw: bool) -> Option<Match> {
    if !slice_matches(chars, i, marker) {
        return None;
    }
    let mlen = marker.chars().count();
    let close = find_marker(chars, i + mlen, marker)?;
    if close == i + mlen {
        return None;
    }
    let inner = to_string(chars, i + mlen, close);
    Some(Match::Emph {
        kind,
        inner,
        raw,
        len: close + mlen - i,
    })
}

fn match_constrained_pair(chars: &[char], i: usize, marker: char, kind: &'static str) -> Option<Match> {
    if chars.get(i) != Some(&marker) {
        return None;
    }
    let before_ok = i == 0 || !is_word(chars[i - 1]);
    if !before_ok {
        return None;
    }
    let mut search_from = i + 1;
    loop {
        let close = find_single(chars, search_from, marker)?;
        if close == i + 1 {
            return None;
        }
        let after_ok = close + 1 >= chars.len() || !is_word(chars[close + 1]);
        if after_ok {
            let inner = to_string(chars, i + 1, close);
            return Some(Match::Emph {
                kind,
                inner,
                raw: false,
                len: close + 1 - i,
            });
        }
        search_from = close + 1;
    }
}

fn match_constrained_mono(chars: &[char], i: usize) -> Option<Match> {
    if chars.get(i) != Some(&'`') {
        return None;
    }
    let before_ok = i == 0 || !is_word(chars[i - 1]);
    if !before_ok {
        return None;
    }
    let mut search_from = i + 1;
    loop {
        let close = find_single(chars, search_from, '`')?;
        if close == i + 1 {
            return None;
        }
        let after_ok = close + 1 >= chars.len() || !is_word(chars[close + 1]);
        if after_ok {
            let inner = to_string(chars, i + 1, close);
            return Some(Match::Emph {
                kind: "mono",
                inner,
                raw: true,
                len: close + 1 - i,
            });
        }
        search_from = close + 1;
    }
}

fn match_single(chars: &[char], i: usize, marker: char, kind: &'static str) -> Option<Match> {
    if chars.get(i) != Some(&marker) {
        return None;
    }
    let close = find_single(chars, i + 1, marker)?;
    if close == i + 1 {
        return None;
    }
    let inner = to_string(chars, i + 1, close);
    Some(Match::Emph {
        kind,
        inner,
        raw: false,
        len: close + 1 - i,
    })
}

fn find_single(chars: &[char], from: usize, marker: char) -> Option<usize> {
    (from..chars.len()).find(|&idx| chars[idx] == marker)
}

/// `+++…+++`, `++…++`, `+…+` — content is never re-parsed.
fn match_passthrough(chars: &[char], i: usize) -> Option<Match> {
    for marker in ["+++", "++", "+"] {
        if let Some(m) = match_pair_raw(chars, i, marker) {
            return Some(Match::Passthrough {
                inner: m.0,
                len: m.1,
            });
        }
    }
    None
}

fn match_pair_raw(chars: &[char], i: usize, marker: &str) -> Option<(String, usize)> {
    if !slice_matches(chars, i, marker) {
        return None;
    }
    let mlen = marker.chars().count();
    let close = find_marker(chars, i + mlen, marker)?;
    if close == i + mlen {
        return None;
    }
    Some((to_string(chars, i + mlen, close), close + mlen - i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{new_document_tree, NodeKind};
    use crate::lexer::Lexer;

    fn scan_text(text: &str) -> Vec<(NodeKind, Option<String>)> {
        let mut tree = new_document_tree();
        let root_id = tree.root().id();
        let mut lexer = Lexer::new();
        let mut parser = Parser {
            lexer: &mut lexer,
            tree: &mut tree,
        };
        scan_into(&mut parser, root_id, text, Position::new(1, 1));
        tree.root()
            .children()
            .map(|n| (n.value().kind, n.value().text.clone()))
            .collect()
    }

    #[test]
    fn plain_text_is_one_node() {
        let nodes = scan_text("hello world");
        assert_eq!(nodes, vec![(NodeKind::Text, Some("hello world".to_string()))]);
    }

    #[test]
    fn bold_italic_mono_are_separated_by_text() {
        let nodes = scan_text("**bold** and _italic_ and ``mono``");
        let kinds: Vec<NodeKind> = nodes.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Emph,
                NodeKind::Text,
                NodeKind::Emph,
                NodeKind::Text,
                NodeKind::Emph,
            ]
        );
    }

    #[test]
    fn attr_ref_round_trips_name() {
        let mut tree = new_document_tree();
        let root_id = tree.root().id();
        let mut lexer = Lexer::new();
        let mut parser = Parser {
            lexer: &mut lexer,
            tree: &mut tree,
        };
        scan_into(&mut parser, root_id, "{version}", Position::new(1, 1));
        let child = tree.root().first_child().unwrap();
        assert_eq!(child.value().kind, NodeKind::AttrRef);
        assert_eq!(child.value().name, Some("version".to_string()));
    }

    #[test]
    fn xref_with_text() {
        let mut tree = new_document_tree();
        let root_id = tree.root().id();
        let mut lexer = Lexer::new();
        let mut parser = Parser {
            lexer: &mut lexer,
            tree: &mut tree,
        };
        scan_into(&mut parser, root_id, "see <<intro,the intro>>", Position::new(1, 1));
        let xref = tree
            .root()
            .children()
            .find(|n| n.value().kind == NodeKind::Xref)
            .unwrap();
        assert_eq!(xref.value().target, Some("intro".to_string()));
        let text_child = xref.children().next().unwrap();
        assert_eq!(text_child.value().text, Some("the intro".to_string()));
    }

    #[test]
    fn autolink_without_brackets() {
        let mut tree = new_document_tree();
        let root_id = tree.root().id();
        let mut lexer = Lexer::new();
        let mut parser = Parser {
            lexer: &mut lexer,
            tree: &mut tree,
        };
        scan_into(&mut parser, root_id, "visit https://example.com today", Position::new(1, 1));
        let link = tree
            .root()
            .children()
            .find(|n| n.value().kind == NodeKind::Link)
            .unwrap();
        assert_eq!(link.value().target, Some("https://example.com".to_string()));
        assert_eq!(link.children().count(), 0);
    }

    #[test]
    fn inline_macro_footnote() {
        let mut tree = new_document_tree();
        let root_id = tree.root().id();
        let mut lexer = Lexer::new();
        let mut parser = Parser {
            lexer: &mut lexer,
            tree: &mut tree,
        };
        scan_into(&mut parser, root_id, "text footnote:[a note]", Position::new(1, 1));
        let m = tree
            .root()
            .children()
            .find(|n| n.value().kind == NodeKind::InlineMacro)
            .unwrap();
        assert_eq!(m.value().name, Some("footnote".to_string()));
    }

    #[test]
    fn mono_preserves_raw_inner_text() {
        let mut tree = new_document_tree();
        let root_id = tree.root().id();
        let mut lexer = Lexer::new();
        let mut parser = Parser {
            lexer: &mut lexer,
            tree: &mut tree,
        };
        scan_into(&mut parser, root_id, "`*not bold*`", Position::new(1, 1));
        let emph = tree.root().first_child().unwrap();
        assert_eq!(emph.value().kind, NodeKind::Emph);
        assert_eq!(emph.value().name, Some("mono".to_string()));
        assert_eq!(emph.value().text, Some("*not bold*".to_string()));
        assert_eq!(emph.children().count(), 0);
    }

    #[test]
    fn passthrough_is_not_reparsed() {
        let mut tree = new_document_tree();
        let root_id = tree.root().id();
        let mut lexer = Lexer::new();
        let mut parser = Parser {
            lexer: &mut lexer,
            tree: &mut tree,
        };
        scan_into(&mut parser, root_id, "+++*literal*+++", Position::new(1, 1));
        let node = tree.root().first_child().unwrap();
        assert_eq!(node.value().kind, NodeKind::PassthroughInline);
        assert_eq!(node.value().text, Some("*literal*".to_string()));
    }

    #[test]
    fn deep_nesting_does_not_overflow_stack() {
        let depth = 200;
        let mut text = String::new();
        for _ in 0..depth {
            text.push_str("**");
        }
        text.push('x');
        for _ in 0..depth {
            text.push_str("**");
        }
        let mut tree = new_document_tree();
        let root_id = tree.root().id();
        let mut lexer = Lexer::new();
        let mut parser = Parser {
            lexer: &mut lexer,
            tree: &mut tree,
        };
        scan_into(&mut parser, root_id, &text, Position::new(1, 1));
        // Must terminate without panicking; exact shape is not asserted.
        assert!(tree.root().children().count() >= 1);
    }
}
