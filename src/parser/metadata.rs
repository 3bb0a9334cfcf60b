//! Block metadata runs: `[[anchor]]`, `.Title`, and bracketed attribute
//! lists, consumed as a contiguous run that attaches to the block
//! immediately following it.
//!
//! The lexer never emits a dedicated `BLOCK_ATTRS`/`STEM_ATTR_LINE` kind;
//! attribute-list lines are recognized here, from `Text` tokens, by their
//! `[...]` shape.

use std::collections::HashMap;

use crate::ast::BlockMeta;
use crate::error::ParseError;
use crate::lexer::{LineKind, Lexer, LineTok};

/// Returns `true` if a `Text` token's raw content is shaped like a
/// bracketed attribute list: `[source,python]`, `[.lead]`, `[stem]`.
/// Double-bracketed `[[...]]` anchors are a distinct lexer kind and never
/// reach here.
fn is_attr_list_shape(tok: &LineTok) -> bool {
    let s = tok.rest.trim();
    s.len() >= 2 && s.starts_with('[') && s.ends_with(']') && !s.starts_with("[[")
}

/// Splits `[source,python,.lead,id="x y"]` into its comma-separated items,
/// respecting double-quoted values that may themselves contain commas.
fn split_attr_items(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in inner.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                items.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        items.push(current.trim().to_string());
    }
    items
}

fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

fn apply_attr_list(meta: &mut BlockMeta, s: &str) {
    let inner = &s[1..s.len() - 1];
    for item in split_attr_items(inner) {
        if let Some(role) = item.strip_prefix('.') {
            meta.attrs.insert(format!(".{role}"), String::new());
            meta.roles.push(role.to_string());
        } else if let Some(idx) = item.find('=') {
            let key = item[..idx].trim().to_string();
            let value = strip_quotes(&item[idx + 1..]);
            meta.attrs.insert(key, value);
        } else if !item.is_empty() {
            meta.attrs.insert("style".to_string(), item);
        }
    }
}

/// Consumes a contiguous metadata run. Returns the built `BlockMeta` and the
/// line number the run started on, if any lines were consumed.
///
/// A metadata run followed by end-of-input or a blank line is discarded
/// *with an error* rather than silently dropped — the lexer cannot
/// un-consume it, so the only honest outcome is to fail loudly rather than
/// risk a misattached tree.
pub fn parse_metadata_run(lexer: &mut Lexer) -> Result<(BlockMeta, Option<usize>), ParseError> {
    let mut meta = BlockMeta::default();
    let mut first_line = None;

    loop {
        let tok = lexer.peek(0).clone();
        match tok.kind {
            LineKind::BlockAnchor => {
                lexer.take();
                first_line.get_or_insert(tok.line_no);
                let inner = tok.rest[2..tok.rest.len() - 2].to_string();
                let mut parts = inner.splitn(2, ',');
                meta.anchor_id = parts.next().map(|s| s.trim().to_string());
                meta.anchor_text = parts.next().map(|s| s.trim().to_string());
            }
            LineKind::BlockTitle => {
                lexer.take();
                first_line.get_or_insert(tok.line_no);
                meta.title = Some(tok.rest.clone());
            }
            LineKind::Text if is_attr_list_shape(&tok) => {
                lexer.take();
                first_line.get_or_insert(tok.line_no);
                apply_attr_list(&mut meta, tok.rest.trim());
            }
            _ => break,
        }
    }

    if first_line.is_some() {
        let next = lexer.peek(0);
        if matches!(next.kind, LineKind::Blank | LineKind::Eof) {
            return Err(ParseError::new(
                first_line.unwrap(),
                1,
                "metadata run is not followed by a block",
            ));
        }
    }

    Ok((meta, first_line))
}

/// Consumes `:name: value` document-header attribute entries until a
/// non-matching line is reached.
pub fn parse_attribute_entries_block(lexer: &mut Lexer) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    loop {
        let tok = lexer.peek(0).clone();
        if tok.kind != LineKind::Text {
            break;
        }
        match parse_attribute_entry(&tok.rest) {
            Some((name, value)) => {
                lexer.take();
                attrs.insert(name, value);
            }
            None => break,
        }
    }
    attrs
}

pub fn parse_attribute_entry(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix(':')?;
    let idx = rest.find(':')?;
    let name = &rest[..idx];
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return None;
    }
    let value = rest[idx + 1..].trim().to_string();
    Some((name.to_string(), value))
}
