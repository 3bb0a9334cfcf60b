//! Typst generator: a pure tree-walker turning a [`crate::ast::Tree`] into
//! Typst source. Read-only over the tree; no part of it performs I/O.
//!
//! One function handles every [`NodeKind`] so the match stays exhaustive —
//! a compile-time guarantee in place of an open-ended visitor.
//! `ListItem`/`TableRow`/`TableCell` are only ever visited from their parent
//! `List`/`Table` arm (they need column/row bookkeeping the generic walk
//! doesn't have), so reaching them through the generic dispatch is a bug,
//! not a valid tree shape — hence the `unreachable!()` there.

mod escape;
mod preamble;

use crate::ast::{NodeKind, NodeRef, Tree};
use crate::error::GenError;

/// The two built-in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateName {
    Plain,
    Report,
}

impl TemplateName {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "plain" => Some(TemplateName::Plain),
            "report" => Some(TemplateName::Report),
            _ => None,
        }
    }
}

/// The generator's options record: `{templateName, templateFile?,
/// allowRawPassthrough}`. `template_name` is a plain string so an unknown
/// name surfaces as a [`GenError`] from inside the core rather than being
/// rejected earlier by a typed CLI flag.
#[derive(Debug, Clone)]
pub struct GenOptions {
    pub template_name: String,
    pub template_file: Option<String>,
    pub allow_raw_passthrough: bool,
    /// Constant heading shift applied to every section level (`L+shift`).
    /// Fixed at 0, per DESIGN.md: section level maps 1:1 onto Typst heading
    /// depth.
    pub heading_shift: i8,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            template_name: "plain".to_string(),
            template_file: None,
            allow_raw_passthrough: true,
            heading_shift: 0,
        }
    }
}

/// Emits Typst source for the whole tree.
pub fn generate(tree: &Tree, opts: &GenOptions) -> Result<String, GenError> {
    let mut out = String::new();
    emit_preamble(&mut out, opts)?;

    let root = tree.root();
    let root_val = root.value();
    if let Some(title) = &root_val.name {
        out.push_str("= ");
        out.push_str(&escape::escape_text(title));
        out.push_str("\n\n");
    }
    if let Some(author) = root_val.kv.get("author") {
        out.push_str("// Author: ");
        out.push_str(author);
        out.push('\n');
    }
    if let Some(revision) = root_val.kv.get("revision") {
        out.push_str("// Revision: ");
        out.push_str(revision);
        out.push('\n');
    }
    if root_val.name.is_some() || root_val.kv.contains_key("author") || root_val.kv.contains_key("revision") {
        out.push('\n');
    }

    for child in root.children() {
        emit_node(child, &mut out, opts)?;
    }
    Ok(out)
}

fn emit_preamble(out: &mut String, opts: &GenOptions) -> Result<(), GenError> {
    if let Some(file) = &opts.template_file {
        out.push_str("#import \"");
        out.push_str(&escape::escape_string(file));
        out.push_str("\": *\n\n");
        return Ok(());
    }
    let template = TemplateName::parse(&opts.template_name)
        .ok_or_else(|| GenError::new(0, format!("unknown template name '{}'", opts.template_name)))?;
    out.push_str(&preamble::render(template));
    Ok(())
}

fn heading_run(level: u8, shift: i8) -> usize {
    ((level as i16) + shift as i16).max(1) as usize
}

/// Dispatches on a single node's kind. Handles both block-level and
/// inline-level nodes — the inline ones are reached when a block's children
/// are emitted via the same function (paragraphs, table cells, emphasis
/// interiors, ...).
fn emit_node(node: NodeRef, out: &mut String, opts: &GenOptions) -> Result<(), GenError> {
    let val = node.value();
    let line = val.pos.line;

    match val.kind {
        NodeKind::Document => {
            for child in node.children() {
                emit_node(child, out, opts)?;
            }
        }
        NodeKind::Section => {
            let level = section_level(node);
            let run = heading_run(level, opts.heading_shift);
            out.push_str(&"=".repeat(run));
            out.push(' ');
            out.push_str(&escape::escape_text(val.name.as_deref().unwrap_or("")));
            if let Some(meta) = &val.meta {
                if let Some(id) = &meta.anchor_id {
                    out.push_str(" <");
                    out.push_str(id);
                    out.push('>');
                }
            }
            out.push_str("\n\n");
            for child in node.children() {
                emit_node(child, out, opts)?;
            }
        }
        NodeKind::Paragraph => {
            emit_inline_children(node, out, opts)?;
            out.push_str("\n\n");
        }
        NodeKind::LiteralParagraph => {
            out.push_str("#raw(\"");
            out.push_str(&escape::escape_string(val.text.as_deref().unwrap_or("")));
            out.push_str("\", block: true)\n\n");
        }
        NodeKind::AdmonitionParagraph => {
            out.push_str("#admon(\"");
            out.push_str(val.name.as_deref().unwrap_or(""));
            out.push_str("\", [");
            emit_inline_children(node, out, opts)?;
            out.push_str("])\n\n");
        }
        NodeKind::DelimitedBlock => {
            emit_delimited_block(node, out, opts, line)?;
        }
        NodeKind::List => {
            emit_list(node, out, opts)?;
        }
        NodeKind::Table => {
            emit_table(node, out, opts)?;
        }
        NodeKind::ThematicBreak => {
            out.push_str("---\n\n");
        }
        NodeKind::PageBreak => {
            out.push_str("#pagebreak()\n\n");
        }
        NodeKind::LineComment => {
            out.push_str("// ");
            out.push_str(val.text.as_deref().unwrap_or(""));
            out.push('\n');
        }
        NodeKind::BlockMacro => {
            let name = val.name.as_deref().unwrap_or("");
            if name == "image" {
                out.push_str("#image(\"");
                out.push_str(&escape::escape_string(val.target.as_deref().unwrap_or("")));
                out.push_str("\")\n\n");
            } else {
                return Err(GenError::new(
                    line,
                    format!("block macro '{name}' requires the semantic phase"),
                ));
            }
        }
        NodeKind::Directive => {
            return Err(GenError::new(
                line,
                format!(
                    "directive '{}' requires the semantic phase",
                    val.name.as_deref().unwrap_or("")
                ),
            ));
        }
        NodeKind::Text => {
            out.push_str(&escape::escape_text(val.text.as_deref().unwrap_or("")));
        }
        NodeKind::Space => {
            out.push(' ');
        }
        NodeKind::LineBreak => {
            out.push_str(" \\\n");
        }
        NodeKind::Emph => {
            emit_emph(node, out, opts)?;
        }
        NodeKind::Superscript => {
            out.push_str("#super[");
            emit_inline_children(node, out, opts)?;
            out.push(']');
        }
        NodeKind::Subscript => {
            out.push_str("#sub[");
            emit_inline_children(node, out, opts)?;
            out.push(']');
        }
        NodeKind::Link => {
            out.push_str("#link(\"");
            out.push_str(&escape::escape_string(val.target.as_deref().unwrap_or("")));
            out.push_str("\")[");
            if node.children().count() > 0 {
                emit_inline_children(node, out, opts)?;
            } else {
                out.push_str(&escape::escape_text(val.target.as_deref().unwrap_or("")));
            }
            out.push(']');
        }
        NodeKind::ImageInline => {
            out.push_str("#image(\"");
            out.push_str(&escape::escape_string(val.target.as_deref().unwrap_or("")));
            out.push_str("\")");
        }
        NodeKind::AnchorInline => {
            out.push('<');
            out.push_str(val.target.as_deref().unwrap_or(""));
            out.push('>');
        }
        NodeKind::Xref => {
            if node.children().count() == 0 {
                out.push('@');
                out.push_str(val.target.as_deref().unwrap_or(""));
            } else {
                out.push_str("#link(<");
                out.push_str(val.target.as_deref().unwrap_or(""));
                out.push_str(">)[");
                emit_inline_children(node, out, opts)?;
                out.push(']');
            }
        }
        NodeKind::AttrRef => {
            out.push('{');
            out.push_str(val.name.as_deref().unwrap_or(""));
            out.push('}');
        }
        NodeKind::InlineMacro => {
            emit_inline_macro(node, out, opts, line)?;
        }
        NodeKind::PassthroughInline => {
            if !opts.allow_raw_passthrough {
                return Err(GenError::new(line, "passthrough content is disabled"));
            }
            out.push_str(val.text.as_deref().unwrap_or(""));
        }
        NodeKind::ListItem | NodeKind::TableRow | NodeKind::TableCell => {
            unreachable!("{:?} is only ever visited from its parent List/Table arm", val.kind)
        }
    }
    Ok(())
}

fn section_level(node: NodeRef) -> u8 {
    node.value()
        .kv
        .get("level")
        .and_then(|s| s.parse::<u8>().ok())
        .unwrap_or(1)
}

fn emit_inline_children(node: NodeRef, out: &mut String, opts: &GenOptions) -> Result<(), GenError> {
    for child in node.children() {
        emit_node(child, out, opts)?;
    }
    Ok(())
}

fn emit_emph(node: NodeRef, out: &mut String, opts: &GenOptions) -> Result<(), GenError> {
    let val = node.value();
    match val.name.as_deref() {
        Some("mono") => {
            out.push('`');
            out.push_str(val.text.as_deref().unwrap_or(""));
            out.push('`');
        }
        Some("highlight") => {
            out.push_str("#highlight([");
            emit_inline_children(node, out, opts)?;
            out.push_str("])");
        }
        Some("italic") => {
            out.push('_');
            emit_inline_children(node, out, opts)?;
            out.push('_');
        }
        _ => {
            out.push('*');
            emit_inline_children(node, out, opts)?;
            out.push('*');
        }
    }
    Ok(())
}

fn emit_inline_macro(node: NodeRef, out: &mut String, opts: &GenOptions, line: usize) -> Result<(), GenError> {
    let val = node.value();
    match val.name.as_deref() {
        Some("footnote") => {
            out.push_str("#footnote[");
            emit_inline_children(node, out, opts)?;
            out.push(']');
        }
        Some("kbd") | Some("btn") | Some("menu") => {
            out.push_str("#smallcaps[");
            emit_inline_children(node, out, opts)?;
            out.push(']');
        }
        Some("stem") => {
            if !opts.allow_raw_passthrough {
                return Err(GenError::new(line, "stem content is disabled"));
            }
            out.push('$');
            out.push_str(val.target.as_deref().unwrap_or(""));
            out.push('$');
        }
        other => {
            return Err(GenError::new(
                line,
                format!("unsupported inline macro '{}'", other.unwrap_or("")),
            ));
        }
    }
    Ok(())
}

fn emit_delimited_block(node: NodeRef, out: &mut String, opts: &GenOptions, line: usize) -> Result<(), GenError> {
    let val = node.value();
    let delim = val.kv.get("delim").map(String::as_str).unwrap_or("");
    let is_stem = val.kv.get("content-style").map(String::as_str) == Some("stem");
    let is_container = matches!(delim, "quote" | "example" | "sidebar" | "open");

    if is_container {
        out.push_str("#block([\n");
        for child in node.children() {
            emit_node(child, out, opts)?;
        }
        out.push_str("])\n\n");
        return Ok(());
    }

    if is_stem {
        if !opts.allow_raw_passthrough {
            return Err(GenError::new(line, "stem block passthrough is disabled"));
        }
        out.push_str(val.text.as_deref().unwrap_or(""));
        out.push_str("\n\n");
        return Ok(());
    }

    out.push_str("#raw(\"");
    out.push_str(&escape::escape_string(val.text.as_deref().unwrap_or("")));
    out.push_str("\", block: true)\n\n");
    Ok(())
}

fn emit_list(node: NodeRef, out: &mut String, opts: &GenOptions) -> Result<(), GenError> {
    let list_type = node.value().kv.get("type").cloned().unwrap_or_default();

    match list_type.as_str() {
        "description" => {
            out.push_str("#table(columns: 2,\n");
            for item in node.children() {
                let term = item.value().kv.get("term").cloned().unwrap_or_default();
                out.push_str("  [");
                out.push_str(&escape::escape_text(&term));
                out.push_str("], [");
                emit_inline_children(item, out, opts)?;
                out.push_str("],\n");
            }
            out.push_str(")\n\n");
        }
        "ordered" => {
            out.push_str("#enum(\n");
            emit_list_items(node, out, opts)?;
            out.push_str(")\n\n");
        }
        _ => {
            out.push_str("#list(\n");
            emit_list_items(node, out, opts)?;
            out.push_str(")\n\n");
        }
    }
    Ok(())
}

fn emit_list_items(node: NodeRef, out: &mut String, opts: &GenOptions) -> Result<(), GenError> {
    for item in node.children() {
        out.push_str("  [");
        for child in item.children() {
            emit_node(child, out, opts)?;
        }
        out.push_str("],\n");
    }
    Ok(())
}

fn emit_table(node: NodeRef, out: &mut String, opts: &GenOptions) -> Result<(), GenError> {
    let columns = node
        .value()
        .kv
        .get("columns")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1);
    out.push_str(&format!("#table(columns: {columns},\n"));
    for row in node.children() {
        for cell in row.children() {
            out.push_str("  [");
            emit_inline_children(cell, out, opts)?;
            out.push_str("],\n");
        }
    }
    out.push_str(")\n\n");
    Ok(())
}
