//! Boundary cases: edge inputs the seed scenarios don't cover.

use leandoc::ast::NodeKind;
use leandoc::parse_document;

#[test]
fn empty_input_has_no_children() {
    let tree = parse_document("").unwrap();
    assert_eq!(tree.root().value().kind, NodeKind::Document);
    assert_eq!(tree.root().children().count(), 0);
}

#[test]
fn section_immediately_followed_by_deeper_section_attaches_metadata_only_to_the_deeper_one() {
    let tree = parse_document("== A\n\n[[anchor-id]]\n=== B\n").unwrap();
    let a = tree.root().children().next().unwrap();
    assert!(a.value().meta.is_none());

    let b = a.children().next().unwrap();
    assert_eq!(b.value().name.as_deref(), Some("B"));
    assert_eq!(
        b.value().meta.as_ref().unwrap().anchor_id.as_deref(),
        Some("anchor-id")
    );
}

#[test]
fn table_cell_with_escaped_pipe_is_one_literal_pipe() {
    let tree = parse_document("|===\n|x\\|y\n|===\n").unwrap();
    let table = tree.root().children().next().unwrap();
    let row = table.children().next().unwrap();
    let cell = row.children().next().unwrap();
    let text_node = cell.children().next().unwrap();
    assert_eq!(text_node.value().text.as_deref(), Some("x|y"));
}

#[test]
fn fence_exactly_matching_raw_content_closes_prematurely() {
    // Known limitation: a listing whose content is meant to contain a
    // line identical to the fence marker ("----") has no way to escape it —
    // the raw scanner closes on the first line matching the opening fence's
    // token kind, so the intended single-line content is swallowed by the
    // close instead of becoming the block's text.
    let tree = parse_document("----\n----\n").unwrap();
    let block = tree.root().children().next().unwrap();
    assert_eq!(block.value().kind, NodeKind::DelimitedBlock);
    assert_eq!(block.value().text.as_deref(), Some(""));
    assert_eq!(tree.root().children().count(), 1);
}

#[test]
fn deeply_nested_inline_markup_does_not_overflow() {
    let mut text = "x".to_string();
    for _ in 0..40 {
        text = format!("*{text}*");
    }
    let input = format!("{text}\n");
    let tree = parse_document(&input).unwrap();
    assert_eq!(tree.root().children().count(), 1);
}

#[test]
fn metadata_run_with_nothing_after_it_is_an_error() {
    assert!(parse_document("[[orphan]]\n").is_err());
    assert!(parse_document("[[orphan]]\n\nBody.\n").is_err());
}

#[test]
fn table_line_outside_a_table_is_an_error() {
    let err = parse_document("|a|b|\n").unwrap_err();
    assert!(err.message.contains("table"));
}
