//! Positional tree reconciliation.
//!
//! [`reconcile`] patches a live subtree of one [`Document`] until it matches
//! a freshly rendered subtree of another. Children are paired by position,
//! not by key: a reordered list is patched as a chain of replacements.

use crate::dom::{Document, NodeId, NodeKind};

/// Attributes whose live property follows the attribute value: a property
/// is on exactly when the attribute reads `"true"`.
pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "checked",
    "disabled",
    "readonly",
    "required",
    "autofocus",
    "multiple",
    "selected",
    "hidden",
    "open",
    "ismap",
    "defer",
    "async",
    "novalidate",
    "formnovalidate",
    "allowfullscreen",
    "itemscope",
    "reversed",
    "autoplay",
    "controls",
    "loop",
    "muted",
    "default",
];

/// Elements whose live value is synced directly.
const FORM_CONTROLS: &[&str] = &["input", "textarea", "select"];

/// Patch `old` in `doc` to match `new` in `source`.
///
/// Returns the node now standing where `old` was: `old` itself, or the
/// imported replacement when kind or tag differ. A missing side is a no-op.
pub fn reconcile(
    doc: &mut Document,
    old: Option<NodeId>,
    source: &Document,
    new: Option<NodeId>,
) -> Option<NodeId> {
    let (Some(old), Some(new)) = (old, new) else {
        return old;
    };
    Some(patch(doc, old, source, new))
}

fn patch(doc: &mut Document, old: NodeId, source: &Document, new: NodeId) -> NodeId {
    if doc.deep_equal(old, source, new) {
        return old;
    }

    match (doc.kind(old), source.kind(new)) {
        (Some(NodeKind::Text(current)), Some(NodeKind::Text(wanted))) => {
            if current != wanted {
                tracing::trace!(node = %old, "text updated");
                doc.set_text(old, wanted);
            }
            old
        }
        (Some(NodeKind::Element(a)), Some(NodeKind::Element(b))) if a.tag == b.tag => {
            patch_element(doc, old, source, new);
            old
        }
        _ => replace(doc, old, source, new),
    }
}

fn replace(doc: &mut Document, old: NodeId, source: &Document, new: NodeId) -> NodeId {
    let Some(copy) = doc.import(source, new) else {
        return old;
    };
    tracing::trace!(node = %old, "node replaced");
    doc.replace(old, copy)
}

fn patch_element(doc: &mut Document, old: NodeId, source: &Document, new: NodeId) {
    if source
        .tag(new)
        .is_some_and(|tag| FORM_CONTROLS.contains(&tag))
    {
        let wanted = source.value(new);
        if let Some(wanted) = wanted {
            if doc.value(old).as_deref() != Some(wanted.as_str()) {
                doc.set_value(old, &wanted);
            }
        }
    }

    let stale: Vec<String> = doc
        .element(old)
        .map(|e| {
            e.attributes
                .iter()
                .filter(|(name, _)| source.attribute(new, name).is_none())
                .map(|(name, _)| name.clone())
                .collect()
        })
        .unwrap_or_default();
    for name in stale {
        doc.remove_attribute(old, &name);
    }

    if let Some(element) = source.element(new) {
        for (name, value) in &element.attributes {
            if doc.attribute(old, name) != Some(value.as_str()) {
                doc.set_attribute(old, name, value);
            }
        }
    }

    let old_children = doc.children(old).to_vec();
    let new_children = source.children(new);
    for (i, child) in new_children.iter().enumerate() {
        match old_children.get(i) {
            Some(existing) => {
                patch(doc, *existing, source, *child);
            }
            None => {
                if let Some(copy) = doc.import(source, *child) {
                    doc.append_child(old, copy);
                }
            }
        }
    }
    for extra in old_children.iter().skip(new_children.len()) {
        doc.remove(*extra);
    }
}

/// Sync the live boolean properties under `root` (inclusive) with their
/// attributes. Only properties that differ are written.
pub fn sync_boolean_properties(doc: &mut Document, root: NodeId) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        for name in BOOLEAN_ATTRIBUTES {
            let Some(value) = doc.attribute(node, name) else {
                continue;
            };
            let wanted = value == "true";
            // A present attribute reads as on until a property is written.
            let current = doc.property(node, name).unwrap_or(true);
            if current != wanted {
                doc.set_property(node, name, wanted);
            }
        }
        stack.extend(doc.children(node).iter().rev().copied());
    }
}

#[cfg(test)]
mod tests;
