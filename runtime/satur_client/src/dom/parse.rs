//! Markup to arena, tokenized with html5gum.

use html5gum::{State, Token, Tokenizer};

use super::{Document, ElementData, NodeId, NodeKind};

/// Elements that never have children or an end tag.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Parse `html` and attach the resulting nodes under `parent`.
///
/// Stray end tags are ignored and unclosed elements are closed at the end
/// of input. Comments and doctypes are dropped.
pub(super) fn parse_into(doc: &mut Document, parent: NodeId, html: &str) {
    let mut tokenizer = Tokenizer::new(html);
    let mut stack: Vec<(String, NodeId)> = Vec::new();

    while let Some(Ok(token)) = tokenizer.next() {
        let current = stack.last().map_or(parent, |(_, id)| *id);
        match token {
            Token::StartTag(tag) => {
                let name = String::from_utf8_lossy(&tag.name).to_ascii_lowercase();
                let attributes: Vec<(String, String)> = tag
                    .attributes
                    .iter()
                    .map(|(k, v)| {
                        (
                            String::from_utf8_lossy(k).into_owned(),
                            String::from_utf8_lossy(v).into_owned(),
                        )
                    })
                    .collect();
                let id = doc.alloc(NodeKind::Element(ElementData::new(
                    name.clone(),
                    attributes,
                )));
                doc.attach(current, id);

                if !(tag.self_closing || is_void_element(&name)) {
                    match name.as_str() {
                        "script" | "style" => tokenizer.set_state(State::ScriptData),
                        "textarea" | "title" => tokenizer.set_state(State::RcData),
                        _ => {}
                    }
                    stack.push((name, id));
                }
            }
            Token::EndTag(tag) => {
                let end_name = String::from_utf8_lossy(&tag.name).to_ascii_lowercase();
                if let Some(idx) = stack.iter().rposition(|(name, _)| *name == end_name) {
                    stack.truncate(idx);
                }
            }
            Token::String(text) => {
                let text = String::from_utf8_lossy(&text);
                push_text(doc, current, &text);
            }
            Token::Doctype(_) | Token::Comment(_) | Token::Error(_) => {}
        }
    }
}

/// Append text to `parent`, merging with a trailing text child.
fn push_text(doc: &mut Document, parent: NodeId, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = doc.children(parent).last().copied() {
        if let Some(NodeKind::Text(existing)) = doc.node_mut(last).map(|n| &mut n.kind) {
            existing.push_str(text);
            return;
        }
    }
    let id = doc.alloc(NodeKind::Text(text.to_owned()));
    doc.attach(parent, id);
}
