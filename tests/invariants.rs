//! Property-based checks for invariants that quantify over arbitrarily
//! generated structure rather than a single fixed example: section
//! nesting, table row width, and inline recursion-depth-guard termination.

use proptest::prelude::*;

use leandoc::ast::{NodeKind, NodeRef};
use leandoc::parse_document;

fn section_level(node: NodeRef) -> Option<u8> {
    if node.value().kind != NodeKind::Section {
        return None;
    }
    node.value().kv.get("level").and_then(|s| s.parse().ok())
}

fn check_section_nesting(node: NodeRef) -> bool {
    let parent_level = section_level(node).unwrap_or(0);
    for child in node.children() {
        if let Some(child_level) = section_level(child) {
            if child_level <= parent_level {
                return false;
            }
        }
        if !check_section_nesting(child) {
            return false;
        }
    }
    true
}

fn arb_section_level() -> impl Strategy<Value = u8> {
    1u8..=6u8
}

proptest! {
    /// Every section's direct child sections carry a level strictly greater
    /// than the parent's, no matter how the document nests them.
    #[test]
    fn section_children_always_deeper(levels in prop::collection::vec(arb_section_level(), 1..12)) {
        let mut doc = String::new();
        for level in &levels {
            doc.push_str(&"=".repeat(*level as usize));
            doc.push_str(" Heading\n");
            doc.push_str("Some body text.\n\n");
        }
        if let Ok(tree) = parse_document(&doc) {
            prop_assert!(check_section_nesting(tree.root()));
        }
    }

    /// Every table produced by the parser has a consistent row width: either
    /// the parse failed (inconsistent cell count reported as an error), or
    /// every row has exactly the column count recorded on the table node.
    #[test]
    fn table_rows_are_consistent_width(widths in prop::collection::vec(1usize..6, 1..6)) {
        let mut doc = String::from("|===\n");
        let first_width = widths[0];
        for w in &widths {
            let cells: Vec<String> = (0..*w).map(|i| format!("c{i}")).collect();
            doc.push('|');
            doc.push_str(&cells.join("|"));
            doc.push('\n');
        }
        doc.push_str("|===\n");

        let all_same = widths.iter().all(|w| *w == first_width);
        match parse_document(&doc) {
            Ok(tree) => {
                let table = tree.root().children().next().unwrap();
                prop_assert_eq!(table.value().kind, NodeKind::Table);
                let columns: usize = table.value().kv.get("columns").unwrap().parse().unwrap();
                for row in table.children() {
                    prop_assert_eq!(row.children().count(), columns);
                }
                // A parse that succeeds with mismatched physical widths only
                // happens when the total cell count still divides evenly by
                // the first row's width (re-flow absorbs the mismatch).
                let total: usize = widths.iter().sum();
                prop_assert_eq!(total % first_width, 0);
                let _ = all_same;
            }
            Err(_) => {
                // Rejected: total cell count wasn't a multiple of the
                // first row's width. Acceptable outcome.
            }
        }
    }

    /// Deeply nested emphasis markers never blow the stack; the scanner's
    /// recursion guard always lets the scan terminate.
    #[test]
    fn nested_emphasis_terminates(depth in 1usize..120) {
        let mut text = "x".to_string();
        for _ in 0..depth {
            text = format!("*{text}*");
        }
        let doc = format!("{text}\n");
        let result = parse_document(&doc);
        prop_assert!(result.is_ok());
    }
}
