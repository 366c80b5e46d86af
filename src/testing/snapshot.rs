//! Snapshot helpers.
//!
//! Functions for turning a document subtree or a component subtree into plain
//! text suitable for snapshot testing and assertions.

use std::fmt::Write as _;

use crate::dom::{Document, ElementId, MemoryDocument};
use crate::ui::{ComponentKey, ComponentTree, Visibility};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Serialize `root` and its descendants as single-line HTML.
///
/// Attributes come out in a fixed order (`class`, `tabindex`, `style`).
/// Listeners are not part of the markup.
///
/// # Examples
///
/// ```
/// use trellis_ui::dom::{Document, MemoryDocument};
/// use trellis_ui::testing::markup;
///
/// let mut doc = MemoryDocument::new();
/// let p = doc.create_element("p");
/// let text = doc.create_text_node("a < b");
/// doc.insert_before(p, text, None);
/// assert_eq!(markup(&doc, p), "<p>a &lt; b</p>");
/// ```
pub fn markup(doc: &MemoryDocument, root: ElementId) -> String {
    let mut out = String::new();
    write_node(doc, root, &mut out);
    out
}

/// One line per component, indented by depth, with its lifecycle and control
/// state in brackets.
pub fn outline(tree: &ComponentTree<MemoryDocument>, root: ComponentKey) -> String {
    let mut lines = Vec::new();
    outline_into(tree, root, 0, &mut lines);
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn write_node(doc: &MemoryDocument, id: ElementId, out: &mut String) {
    let Some(data) = doc.get(id) else {
        return;
    };
    let Some(tag) = data.tag.as_deref() else {
        out.push_str(&escape(data.text.as_deref().unwrap_or_default()));
        return;
    };

    out.push('<');
    out.push_str(tag);
    if !data.classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", escape(&data.classes.join(" ")));
    }
    if let Some(index) = data.tab_index {
        let _ = write!(out, " tabindex=\"{index}\"");
    }
    if !data.style.is_empty() {
        let style = data
            .style
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        let _ = write!(out, " style=\"{}\"", escape(&style));
    }
    out.push('>');

    for &child in doc.children(id) {
        write_node(doc, child, out);
    }
    let _ = write!(out, "</{tag}>");
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn outline_into(
    tree: &ComponentTree<MemoryDocument>,
    key: ComponentKey,
    depth: usize,
    lines: &mut Vec<String>,
) {
    let Some(component) = tree.get(key) else {
        return;
    };

    let mut line = format!(
        "{}{}#{}",
        "  ".repeat(depth),
        tree.component_type(key).unwrap_or("?"),
        component.id()
    );
    if let Some(name) = component.name() {
        let _ = write!(line, " {name:?}");
    }

    let mut flags = Vec::new();
    if component.is_disposed() {
        flags.push("disposed");
    } else if component.is_in_document() {
        flags.push("in-document");
    } else if component.element().is_some() {
        flags.push("detached");
    }
    if component.was_applied() {
        flags.push("applied");
    }
    if tree.is_control(key) {
        if !tree.is_enabled(key) {
            flags.push("disabled");
        }
        match tree.visibility(key) {
            Visibility::Visible if !tree.is_visible(key) => flags.push("inherited-hidden"),
            Visibility::Visible => {}
            Visibility::Hidden => flags.push("hidden"),
            Visibility::Collapsed => flags.push("collapsed"),
        }
    }
    if !flags.is_empty() {
        let _ = write!(line, " [{}]", flags.join(", "));
    }
    lines.push(line);

    for &child in component.children() {
        outline_into(tree, child, depth + 1, lines);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
