//! Small, line-local recognizers used by [`super::classify_line`].
//!
//! Kept separate from `mod.rs` so the ordered dispatch table stays readable;
//! nothing here looks past the current line.

use super::LineKind;

const ADMONITION_LABELS: [&str; 5] = ["NOTE", "TIP", "IMPORTANT", "CAUTION", "WARNING"];

/// Splits `text` on `\n`, `\r\n`, or `\r` — input may use any of the three.
/// A trailing line terminator does not produce a spurious empty final line;
/// a blank line before EOF does.
pub fn split_lines(text: &str) -> std::vec::IntoIter<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if i < bytes.len() && bytes[i] == b'\n' {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines.into_iter()
}

/// Matches a leading run of 1–6 copies of `marker` followed by a space:
/// the shared shape of `SECTION` (`=`), `UL_ITEM` (`*`), and `OL_ITEM` (`.`)
/// markers. Returns `(run length, trimmed remainder)`.
pub fn match_run(s: &str, marker: char) -> Option<(u8, String)> {
    let bytes = s.as_bytes();
    let marker_byte = marker as u8;
    debug_assert!(marker.is_ascii());

    let mut count = 0usize;
    while count < bytes.len() && bytes[count] == marker_byte {
        count += 1;
    }
    if count == 0 || count > 6 {
        return None;
    }
    if bytes.get(count) != Some(&b' ') {
        return None;
    }
    Some((count as u8, s[count + 1..].trim_start().to_string()))
}

/// Matches a description-list term: a line ending in two or more colons
/// with non-empty content before them. `level` is the trailing colon count.
pub fn match_desc_term(s: &str) -> Option<(u8, String)> {
    let trimmed_end = s.trim_end();
    let colon_count = trimmed_end
        .chars()
        .rev()
        .take_while(|&c| c == ':')
        .count();
    if colon_count < 2 {
        return None;
    }
    let term_end = trimmed_end.len() - colon_count;
    let term = trimmed_end[..term_end].trim_end();
    if term.is_empty() || colon_count > 255 {
        return None;
    }
    Some((colon_count as u8, term.to_string()))
}

/// Matches `name::target[...]` (or any line containing `::` with a `[`
/// somewhere after it) — the generic `BLOCK_MACRO` shape, `include::`
/// already handled by the caller as a dedicated case.
pub fn split_block_macro(s: &str) -> Option<(String, String)> {
    let idx = s.find("::")?;
    let head = &s[..idx];
    if head.is_empty()
        || !head
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return None;
    }
    let rest = &s[idx + 2..];
    if !rest.contains('[') {
        return None;
    }
    Some((head.to_string(), rest.to_string()))
}

/// Matches one of the fixed-length delimited-block fences.
pub fn match_delimiter_fence(s: &str) -> Option<LineKind> {
    match s {
        "----" => Some(LineKind::DelimListing),
        "...." => Some(LineKind::DelimLiteral),
        "____" => Some(LineKind::DelimQuote),
        "====" => Some(LineKind::DelimExample),
        "****" => Some(LineKind::DelimSidebar),
        "--" => Some(LineKind::DelimOpen),
        "////" => Some(LineKind::DelimComment),
        _ => None,
    }
}

/// Matches `NOTE:`/`TIP:`/`IMPORTANT:`/`CAUTION:`/`WARNING:` prefixes.
/// Returns `(label, trimmed text after the colon)`.
pub fn match_admonition(s: &str) -> Option<(String, String)> {
    for label in ADMONITION_LABELS {
        let prefix = format!("{label}:");
        if let Some(rest) = s.strip_prefix(&prefix) {
            return Some((label.to_string(), rest.trim_start().to_string()));
        }
    }
    None
}
