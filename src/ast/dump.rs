//! `--ast` dump support: a Unicode box-drawing tree render (the connector/
//! prefix algorithm used by `--ast`'s default, human-facing output) and a
//! `serde_json` dump for `--ast --format json` (every node already derives
//! `Serialize`, so this is a thin wrapper).

use serde::Serialize;

use super::{NodeKind, NodeRef, Tree};

/// Renders `tree` as an indented Unicode box-drawing tree, one line per
/// node, with a short inline summary of each node's distinguishing fields.
pub fn render_tree(tree: &Tree) -> String {
    let mut out = String::new();
    out.push_str(&summarize(tree.root()));
    out.push('\n');
    let children: Vec<NodeRef> = tree.root().children().collect();
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        render_node(child, "", i + 1 == count, &mut out);
    }
    out
}

fn render_node(node: NodeRef, prefix: &str, is_last: bool, out: &mut String) {
    let connector = if is_last { "└── " } else { "├── " };
    out.push_str(prefix);
    out.push_str(connector);
    out.push_str(&summarize(node));
    out.push('\n');

    let child_prefix = if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };

    let children: Vec<NodeRef> = node.children().collect();
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        render_node(child, &child_prefix, i + 1 == count, out);
    }
}

fn summarize(node: NodeRef) -> String {
    let val = node.value();
    let mut s = format!("{:?}", val.kind);

    match val.kind {
        NodeKind::Section => {
            if let Some(name) = &val.name {
                s.push_str(&format!(" \"{name}\""));
            }
        }
        NodeKind::Text => {
            if let Some(text) = &val.text {
                s.push_str(&format!(" {:?}", truncate(text)));
            }
        }
        NodeKind::Emph | NodeKind::AdmonitionParagraph | NodeKind::InlineMacro | NodeKind::BlockMacro
        | NodeKind::Directive => {
            if let Some(name) = &val.name {
                s.push_str(&format!(" ({name})"));
            }
        }
        NodeKind::Link | NodeKind::Xref | NodeKind::AnchorInline | NodeKind::ImageInline => {
            if let Some(target) = &val.target {
                s.push_str(&format!(" -> {target}"));
            }
        }
        NodeKind::AttrRef => {
            if let Some(name) = &val.name {
                s.push_str(&format!(" {{{name}}}"));
            }
        }
        _ => {}
    }

    if let Some(meta) = &val.meta {
        if let Some(id) = &meta.anchor_id {
            s.push_str(&format!(" [anchor={id}]"));
        }
    }
    s.push_str(&format!(" @{}:{}", val.pos.line, val.pos.column));
    s
}

fn truncate(s: &str) -> String {
    const MAX: usize = 40;
    if s.chars().count() > MAX {
        let head: String = s.chars().take(MAX).collect();
        format!("{head}…")
    } else {
        s.to_string()
    }
}

/// A serde-friendly mirror of the tree, used only for `--ast --format json`.
#[derive(Serialize)]
struct JsonNode {
    #[serde(flatten)]
    node: super::Node,
    children: Vec<JsonNode>,
}

fn to_json_node(node: NodeRef) -> JsonNode {
    JsonNode {
        node: node.value().clone(),
        children: node.children().map(to_json_node).collect(),
    }
}

/// Serializes `tree` to pretty-printed JSON.
pub fn render_json(tree: &Tree) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_json_node(tree.root()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    #[test]
    fn tree_render_includes_section_title() {
        let tree = parse_document("== A Section\nBody.\n").unwrap();
        let rendered = render_tree(&tree);
        assert!(rendered.contains("Section \"A Section\""));
        assert!(rendered.contains("Paragraph"));
    }

    #[test]
    fn json_render_round_trips_through_serde() {
        let tree = parse_document("NOTE: careful\n").unwrap();
        let json = render_json(&tree).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["children"][0]["name"], "NOTE");
    }

    #[test]
    fn empty_document_renders_just_the_root() {
        let tree = parse_document("").unwrap();
        let rendered = render_tree(&tree);
        assert_eq!(rendered.trim_end(), "Document @1:1");
    }
}
