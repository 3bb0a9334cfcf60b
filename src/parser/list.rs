//! Lists: unordered (`*`), ordered (`.`), and description (`Term::`) lists,
//! with `+` continuations and nesting by marker-run depth.
//!
//! Nesting depth isn't spelled out by the grammar explicitly; the rule
//! applied here (documented in DESIGN.md) is that a deeper marker run
//! starts a list nested inside the current item, the same way a deeper
//! indent nests a sublist in most outline notations.

use crate::ast::{BlockMeta, Node, NodeId, NodeKind, Position};
use crate::error::ParseError;
use crate::lexer::LineKind;
use crate::parser::{inline, Parser};

fn list_kind_name(kind: LineKind) -> &'static str {
    match kind {
        LineKind::UlItem => "unordered",
        LineKind::OlItem => "ordered",
        LineKind::DescTerm => "description",
        _ => "unknown",
    }
}

/// Splits a leading checklist marker (`[ ] `, `[x] `, `[X] `) off a
/// `UL_ITEM`'s `rest`, if present.
fn split_checklist(rest: &str) -> (Option<bool>, &str) {
    if let Some(tail) = rest.strip_prefix("[ ] ") {
        return (Some(false), tail);
    }
    if let Some(tail) = rest.strip_prefix("[x] ").or_else(|| rest.strip_prefix("[X] ")) {
        return (Some(true), tail);
    }
    (None, rest)
}

pub fn parse_list(
    parser: &mut Parser,
    parent: NodeId,
    meta: BlockMeta,
    level: u8,
    kind: LineKind,
) -> Result<(), ParseError> {
    let first = parser.lexer.peek(0).clone();
    let list_node = Node::new(NodeKind::List, Position::new(first.line_no, 1))
        .with_kv("type", list_kind_name(kind))
        .with_meta(meta);
    let list_id = parser.append(parent, list_node);

    loop {
        let tok = parser.lexer.peek(0).clone();
        if tok.kind != kind || tok.level != level {
            break;
        }
        parser.lexer.take();
        // `parse_item` itself owns consuming any blank run trailing the item
        // (it needs to look past blanks to tell a continuation or a deeper
        // nested item from the end of the list), so by the time it returns
        // here the next token is never a `Blank`.
        parse_item(parser, list_id, kind, tok.level, &tok.head, &tok.rest, tok.line_no)?;
    }

    Ok(())
}

fn parse_item(
    parser: &mut Parser,
    list_id: NodeId,
    kind: LineKind,
    level: u8,
    head: &str,
    rest: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    let item_node = Node::new(NodeKind::ListItem, Position::new(line_no, 1));
    let item_id = parser.append(list_id, item_node);

    match kind {
        LineKind::DescTerm => {
            parser
                .tree
                .get_mut(item_id)
                .unwrap()
                .value()
                .kv
                .insert("term".to_string(), rest.to_string());

            if parser.lexer.peek(0).kind == LineKind::Text {
                let def = parser.lexer.take();
                let para = Node::new(NodeKind::Paragraph, Position::new(def.line_no, 1));
                let para_id = parser.append(item_id, para);
                inline::scan_into(
                    parser,
                    para_id,
                    def.rest.trim(),
                    Position::new(def.line_no, 1),
                );
            }
        }
        LineKind::UlItem => {
            let (checked, text) = split_checklist(rest);
            if let Some(done) = checked {
                parser
                    .tree
                    .get_mut(item_id)
                    .unwrap()
                    .value()
                    .kv
                    .insert("checked".to_string(), done.to_string());
            }
            let para = Node::new(NodeKind::Paragraph, Position::new(line_no, 1));
            let para_id = parser.append(item_id, para);
            inline::scan_into(parser, para_id, text.trim(), Position::new(line_no, 1));
        }
        LineKind::OlItem => {
            let _ = head;
            let para = Node::new(NodeKind::Paragraph, Position::new(line_no, 1));
            let para_id = parser.append(item_id, para);
            inline::scan_into(parser, para_id, rest.trim(), Position::new(line_no, 1));
        }
        _ => unreachable!("parse_item only called for list marker kinds"),
    }

    loop {
        let mut save_point = parser.lexer.peek(0).clone();
        while save_point.kind == LineKind::Blank {
            parser.lexer.take();
            save_point = parser.lexer.peek(0).clone();
        }

        if save_point.kind == LineKind::ListCont {
            parser.lexer.take();
            while parser.lexer.peek(0).kind == LineKind::Blank {
                parser.lexer.take();
            }
            // A continuation attaches exactly one following block (a
            // paragraph or a delimited block), not the rest of the document.
            if !matches!(parser.lexer.peek(0).kind, LineKind::Eof) {
                parser.parse_block(item_id, 0)?;
            }
            continue;
        }

        if matches!(
            save_point.kind,
            LineKind::UlItem | LineKind::OlItem | LineKind::DescTerm
        ) && save_point.level > level
        {
            parse_list(
                parser,
                item_id,
                BlockMeta::default(),
                save_point.level,
                save_point.kind,
            )?;
            continue;
        }

        break;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    #[test]
    fn checklist_marker_splits_off() {
        assert_eq!(split_checklist("[x] done"), (Some(true), "done"));
        assert_eq!(split_checklist("[ ] todo"), (Some(false), "todo"));
        assert_eq!(split_checklist("plain item"), (None, "plain item"));
    }

    #[test]
    fn continuation_attaches_only_the_next_block_not_the_rest_of_the_document() {
        let tree = parse_document(
            "* item one\n+\nContinued paragraph.\n\n* item two\n\n== Trailing Section\nTail body.\n",
        )
        .unwrap();
        let list = tree.root().children().next().unwrap();
        assert_eq!(list.value().kind, NodeKind::List);

        let items: Vec<_> = list.children().collect();
        assert_eq!(items.len(), 2, "continuation must not swallow the second item");

        let first_item = items[0];
        // The item's own inline paragraph, plus exactly one continuation block.
        assert_eq!(first_item.children().count(), 2);

        let trailing = tree
            .root()
            .children()
            .find(|n| n.value().kind == NodeKind::Section)
            .expect("trailing section must remain a sibling of the list, not nested in it");
        assert_eq!(trailing.value().name.as_deref(), Some("Trailing Section"));
    }
}
