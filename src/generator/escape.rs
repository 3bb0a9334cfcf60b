//! The two escaping functions the generator needs: one for text dropped
//! into Typst markup context, one for text dropped inside a Typst `"…"`
//! string literal. Kept separate from `mod.rs` so every call site is
//! forced to say which context it's escaping for.

/// Escapes `s` for use in Typst markup context: prefixes a backslash before
/// any of `\ * _ \` # [ ] < >`.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '#' | '[' | ']' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escapes `s` for use inside a Typst `"…"` string literal: `\` doubles,
/// `"` gets a backslash, `\n` is kept as an escaped newline, `\r` is
/// dropped (it never appears in well-formed Typst string literals).
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_escape_covers_all_markers() {
        assert_eq!(escape_text("a*b_c`d#e[f]g<h>i\\j"), "a\\*b\\_c\\`d\\#e\\[f\\]g\\<h\\>i\\\\j");
    }

    #[test]
    fn text_escape_is_noop_on_plain_text() {
        assert_eq!(escape_text("hello world"), "hello world");
    }

    #[test]
    fn string_escape_handles_quotes_and_newlines() {
        assert_eq!(escape_string("a\"b\nc\\d\re"), "a\\\"b\\nc\\\\de");
    }
}
