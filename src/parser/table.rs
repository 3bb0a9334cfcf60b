//! Tables: `|===` ... `|===` blocks, rows of `|`-separated cells.
//!
//! The first row parsed establishes the column count; every later row is
//! re-flowed against it rather than trusting its own line breaks — a table
//! row is free to wrap a cell's content onto a following physical line, so
//! "one physical line" and "one logical row" are not the same thing.

use crate::ast::{BlockMeta, Node, NodeId, NodeKind, Position};
use crate::error::ParseError;
use crate::lexer::LineKind;
use crate::parser::{inline, Parser};

/// Splits a `TABLE_LINE`'s `rest` (the full trimmed line, leading `|`
/// included) into cell texts.
///
/// A `|` is a cell separator unless it is escaped by a preceding backslash;
/// `\|` collapses to a literal `|` in the cell text, and any other `\x`
/// passes both characters through unchanged — only the pipe is a defined
/// escape target (§4.2). Counting trailing backslashes before each `|`
/// determines escaping: an odd count means the last one escapes the pipe
/// (and is consumed); an even count (including zero) means the pipe is a
/// real separator. The empty segment before the line's leading `|` is
/// discarded — it is not a cell.
fn split_table_cells(rest: &str) -> Vec<String> {
    let chars: Vec<char> = rest.chars().collect();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' && i + 1 < chars.len() && chars[i + 1] == '|' {
            current.push('|');
            i += 2;
            continue;
        }
        if c == '|' {
            cells.push(std::mem::take(&mut current));
            i += 1;
            continue;
        }
        current.push(c);
        i += 1;
    }
    cells.push(current);
    // The segment before the line's own leading `|` is always empty and is
    // not a cell.
    if !cells.is_empty() {
        cells.remove(0);
    }
    cells.into_iter().map(|c| c.trim().to_string()).collect()
}

pub fn parse_table(parser: &mut Parser, parent: NodeId, meta: BlockMeta) -> Result<(), ParseError> {
    let open = parser.lexer.take();
    let table_node = Node::new(NodeKind::Table, Position::new(open.line_no, 1)).with_meta(meta);
    let table_id = parser.append(parent, table_node);

    // Every physical `TABLE_LINE` is split into cells and flattened into one
    // stream; the first physical line's cell count fixes the column width
    // `W`, then the whole stream is re-chunked into `W`-wide logical rows —
    // a row's content may wrap onto a following physical line.
    let mut flat: Vec<(String, usize)> = Vec::new();
    let mut width: Option<usize> = None;

    loop {
        while parser.lexer.peek(0).kind == LineKind::Blank {
            parser.lexer.take();
        }
        let tok = parser.lexer.peek(0).clone();
        match tok.kind {
            LineKind::TableDelim => {
                parser.lexer.take();
                break;
            }
            LineKind::Eof => {
                return Err(ParseError::new(
                    tok.line_no,
                    1,
                    "missing closing `|===` before end of input",
                ));
            }
            LineKind::TableLine => {
                parser.lexer.take();
                let cells = split_table_cells(&tok.rest);
                if width.is_none() {
                    width = Some(cells.len().max(1));
                }
                for cell in cells {
                    flat.push((cell, tok.line_no));
                }
            }
            _ => {
                return Err(ParseError::new(
                    tok.line_no,
                    1,
                    "expected a table row or `|===` inside a table",
                ));
            }
        }
    }

    let width = width.unwrap_or(0);
    if width > 0 && flat.len() % width != 0 {
        let last_line = flat.last().map(|(_, l)| *l).unwrap_or(open.line_no);
        return Err(ParseError::new(
            last_line,
            1,
            format!(
                "table has {} cell(s), not a multiple of the {}-column width set by the first row",
                flat.len(),
                width
            ),
        ));
    }

    for row_cells in flat.chunks(width.max(1)) {
        if row_cells.is_empty() {
            continue;
        }
        let row_line = row_cells[0].1;
        let row_node = Node::new(NodeKind::TableRow, Position::new(row_line, 1));
        let row_id = parser.append(table_id, row_node);
        for (cell_text, line_no) in row_cells {
            let cell_node = Node::new(NodeKind::TableCell, Position::new(*line_no, 1));
            let cell_id = parser.append(row_id, cell_node);
            inline::scan_into(parser, cell_id, cell_text, Position::new(*line_no, 1));
        }
    }

    parser
        .tree
        .get_mut(table_id)
        .unwrap()
        .value()
        .kv
        .insert("columns".to_string(), width.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_row() {
        assert_eq!(split_table_cells("|a|b|c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn escaped_pipe_is_literal() {
        assert_eq!(split_table_cells("|a\\|b |c"), vec!["a|b", "c"]);
    }

    #[test]
    fn non_pipe_escape_passes_through() {
        assert_eq!(split_table_cells("|a\\nb|c"), vec!["a\\nb", "c"]);
    }

    #[test]
    fn trims_each_cell() {
        assert_eq!(split_table_cells("|  a  |  b  "), vec!["a", "b"]);
    }
}
