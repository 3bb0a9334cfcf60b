//! The document tree: a strict ownership forest rooted at a single
//! `Document` node, built once by the parser and read only by the generator
//! and the `--ast` dump tool.
//!
//! Nodes are stored in an [`ego_tree::Tree`] arena, addressed by
//! [`ego_tree::NodeId`] — an arena of nodes indexed by integer handles,
//! rather than a parent-owns-children pointer forest. Destroying the `Tree`
//! destroys every node in one step, with no manual recursive destructor.

use std::collections::HashMap;

use serde::Serialize;

pub mod dump;

pub type Tree = ego_tree::Tree<Node>;
pub type NodeRef<'a> = ego_tree::NodeRef<'a, Node>;
pub type NodeId = ego_tree::NodeId;

/// The closed set of document-tree node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Document,
    Section,
    Paragraph,
    LiteralParagraph,
    AdmonitionParagraph,
    DelimitedBlock,
    List,
    ListItem,
    Table,
    TableRow,
    TableCell,
    BlockMacro,
    Directive,
    ThematicBreak,
    PageBreak,
    LineComment,
    Text,
    Space,
    LineBreak,
    Emph,
    Superscript,
    Subscript,
    Link,
    ImageInline,
    AnchorInline,
    Xref,
    AttrRef,
    InlineMacro,
    PassthroughInline,
}

/// Source position of a node, 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Block metadata: attaches to the block immediately following the
/// metadata run that produced it. `roles` is derived from `attrs` entries
/// whose key begins with `.`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct BlockMeta {
    pub anchor_id: Option<String>,
    pub anchor_text: Option<String>,
    pub title: Option<String>,
    pub attrs: HashMap<String, String>,
    pub roles: Vec<String>,
}

impl BlockMeta {
    pub fn is_empty(&self) -> bool {
        self.anchor_id.is_none()
            && self.anchor_text.is_none()
            && self.title.is_none()
            && self.attrs.is_empty()
            && self.roles.is_empty()
    }
}

/// A document-tree node. Every node carries the same uniform set of fields;
/// most node kinds use only a subset — e.g. `text` is
/// meaningful for `Text`/`LiteralParagraph`/raw `DelimitedBlock`s, `kv` holds
/// node-kind-specific attributes (list type, delimiter kind, checklist
/// mark, column count).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub pos: Position,
    pub meta: Option<BlockMeta>,
    pub text: Option<String>,
    pub name: Option<String>,
    pub target: Option<String>,
    pub kv: HashMap<String, String>,
}

impl Node {
    pub fn new(kind: NodeKind, pos: Position) -> Self {
        Self {
            kind,
            pos,
            meta: None,
            text: None,
            name: None,
            target: None,
            kv: HashMap::new(),
        }
    }

    pub fn with_text(kind: NodeKind, pos: Position, text: impl Into<String>) -> Self {
        let mut n = Self::new(kind, pos);
        n.text = Some(text.into());
        n
    }

    pub fn with_meta(mut self, meta: BlockMeta) -> Self {
        if !meta.is_empty() {
            self.meta = Some(meta);
        }
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_kv(mut self, key: &str, value: impl Into<String>) -> Self {
        self.kv.insert(key.to_string(), value.into());
        self
    }
}

/// Builds a fresh document tree rooted at an empty `Document` node.
pub fn new_document_tree() -> Tree {
    Tree::new(Node::new(NodeKind::Document, Position::new(1, 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_meta_role_is_dot_prefixed_attr() {
        let mut meta = BlockMeta::default();
        meta.attrs.insert(".lead".to_string(), "".to_string());
        meta.roles.push("lead".to_string());
        assert!(!meta.is_empty());
        assert_eq!(meta.roles, vec!["lead".to_string()]);
    }

    #[test]
    fn empty_tree_has_single_document_root() {
        let tree = new_document_tree();
        assert_eq!(tree.root().value().kind, NodeKind::Document);
        assert_eq!(tree.root().children().count(), 0);
    }
}
