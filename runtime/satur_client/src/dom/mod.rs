//! A minimal live document.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. The document
//! keeps what the reconciler needs from a browser DOM: element tags and
//! attributes, text nodes, the live `value` of form controls, live boolean
//! properties, and a log of every mutation applied.
//!
//! Removed subtrees are freed and their slots reused, so a [`NodeId`] held
//! across mutations must be checked with [`Document::contains`] before use.

mod parse;
mod serialize;

use std::fmt;

use rustc_hash::FxHashMap;

/// Tag of the synthetic root every document and fragment has.
pub const ROOT_TAG: &str = "#document";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElementData {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Live `value` of a form control, once set.
    value: Option<String>,
    /// Live boolean properties (`checked`, `disabled`, ...).
    properties: FxHashMap<String, bool>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        ElementData {
            tag: tag.into(),
            attributes,
            value: None,
            properties: FxHashMap::default(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Clone, Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A change applied to a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    SetText { node: NodeId },
    SetAttribute { node: NodeId, name: String },
    RemoveAttribute { node: NodeId, name: String },
    SetValue { node: NodeId },
    SetProperty { node: NodeId, name: String, value: bool },
    Append { parent: NodeId, child: NodeId },
    Remove { node: NodeId },
    Replace { old: NodeId, new: NodeId },
}

pub struct Document {
    nodes: Vec<Option<NodeData>>,
    free: Vec<NodeId>,
    root: NodeId,
    mutations: Vec<Mutation>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Document {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
            mutations: Vec::new(),
        };
        doc.root = doc.alloc(NodeKind::Element(ElementData::new(ROOT_TAG, Vec::new())));
        doc
    }

    /// Parse markup into a new document; top-level nodes become children of
    /// the root.
    pub fn parse(html: &str) -> Self {
        let mut doc = Document::new();
        let root = doc.root;
        parse::parse_into(&mut doc, root, html);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let data = NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        };
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = Some(data);
            id
        } else {
            let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
            self.nodes.push(Some(data));
            id
        }
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.node_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    // === Construction ===

    /// A detached element.
    pub fn create_element(&mut self, tag: &str, attributes: Vec<(String, String)>) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(
            tag.to_ascii_lowercase(),
            attributes,
        )))
    }

    /// A detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    /// Deep-copy `node` of `other` into this document, detached.
    pub fn import(&mut self, other: &Document, node: NodeId) -> Option<NodeId> {
        let source = other.node(node)?;
        let copy = self.alloc(source.kind.clone());
        for child in &source.children {
            if let Some(child_copy) = self.import(other, *child) {
                self.attach(copy, child_copy);
            }
        }
        Some(copy)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    // === Queries ===

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.node(node).map(|n| &n.kind)
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.kind(node) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.kind(node) {
            Some(NodeKind::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|e| e.attribute(name))
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[], |n| n.children.as_slice())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    /// Whether `node` exists and is attached under the root.
    pub fn contains(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return self.node(id).is_some();
            }
            current = self.parent(id);
        }
        false
    }

    pub fn first_element_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .find(|child| self.element(*child).is_some())
    }

    /// First element in document order under `scope` (inclusive) whose
    /// attribute `name` equals `value`.
    pub fn find_by_attribute(&self, scope: NodeId, name: &str, value: &str) -> Option<NodeId> {
        if self.attribute(scope, name) == Some(value) {
            return Some(scope);
        }
        self.children(scope)
            .iter()
            .find_map(|child| self.find_by_attribute(*child, name, value))
    }

    /// Nearest element at or above `node` that carries attribute `name`.
    pub fn closest_with_attribute(&self, node: NodeId, name: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.attribute(id, name).is_some() {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match self.kind(node) {
            Some(NodeKind::Text(text)) => out.push_str(text),
            Some(NodeKind::Element(_)) => {
                for child in self.children(node) {
                    self.collect_text(*child, out);
                }
            }
            None => {}
        }
    }

    /// Current value of a form control: the live value once set, otherwise
    /// the value its markup implies.
    pub fn value(&self, node: NodeId) -> Option<String> {
        let element = self.element(node)?;
        if let Some(value) = &element.value {
            return Some(value.clone());
        }
        match element.tag.as_str() {
            "input" => Some(element.attribute("value").unwrap_or_default().to_owned()),
            "textarea" => Some(self.text_content(node)),
            "select" => Some(self.default_select_value(node)),
            "option" => Some(
                element
                    .attribute("value")
                    .map_or_else(|| self.text_content(node), str::to_owned),
            ),
            _ => None,
        }
    }

    fn default_select_value(&self, select: NodeId) -> String {
        let mut options = Vec::new();
        self.collect_tag(select, "option", &mut options);
        let chosen = options
            .iter()
            .copied()
            .find(|option| self.attribute(*option, "selected").is_some())
            .or_else(|| options.first().copied());
        chosen.and_then(|option| self.value(option)).unwrap_or_default()
    }

    fn collect_tag(&self, node: NodeId, tag: &str, out: &mut Vec<NodeId>) {
        for child in self.children(node) {
            if self.tag(*child) == Some(tag) {
                out.push(*child);
            }
            self.collect_tag(*child, tag, out);
        }
    }

    /// Live boolean property; `None` until one is set.
    pub fn property(&self, node: NodeId, name: &str) -> Option<bool> {
        self.element(node)
            .and_then(|e| e.properties.get(name).copied())
    }

    /// Structural equality of `node` here and `other_node` in `other`: same
    /// kind, tag, attribute set and children. Live values and properties are
    /// not compared.
    pub fn deep_equal(&self, node: NodeId, other: &Document, other_node: NodeId) -> bool {
        let (Some(a), Some(b)) = (self.node(node), other.node(other_node)) else {
            return false;
        };
        let same_shape = match (&a.kind, &b.kind) {
            (NodeKind::Text(x), NodeKind::Text(y)) => x == y,
            (NodeKind::Element(x), NodeKind::Element(y)) => {
                x.tag == y.tag
                    && x.attributes.len() == y.attributes.len()
                    && x
                        .attributes
                        .iter()
                        .all(|(name, value)| y.attribute(name) == Some(value.as_str()))
            }
            _ => false,
        };
        same_shape
            && a.children.len() == b.children.len()
            && a
                .children
                .iter()
                .zip(&b.children)
                .all(|(x, y)| self.deep_equal(*x, other, *y))
    }

    // === Mutation ===

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        match element.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => value.clone_into(existing),
            None => element
                .attributes
                .push((name.to_owned(), value.to_owned())),
        }
        self.mutations.push(Mutation::SetAttribute {
            node,
            name: name.to_owned(),
        });
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        let before = element.attributes.len();
        element.attributes.retain(|(key, _)| key != name);
        if element.attributes.len() != before {
            self.mutations.push(Mutation::RemoveAttribute {
                node,
                name: name.to_owned(),
            });
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(NodeKind::Text(existing)) = self.node_mut(node).map(|n| &mut n.kind) {
            text.clone_into(existing);
            self.mutations.push(Mutation::SetText { node });
        }
    }

    /// Set the live value of a form control (what the user typed).
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.value = Some(value.to_owned());
            self.mutations.push(Mutation::SetValue { node });
        }
    }

    pub fn set_property(&mut self, node: NodeId, name: &str, value: bool) {
        if let Some(element) = self.element_mut(node) {
            element.properties.insert(name.to_owned(), value);
            self.mutations.push(Mutation::SetProperty {
                node,
                name: name.to_owned(),
                value,
            });
        }
    }

    /// Append a detached node to `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.attach(parent, child);
        self.mutations.push(Mutation::Append { parent, child });
    }

    /// Detach `node` and free its subtree.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        self.detach(node);
        self.free_subtree(node);
        self.mutations.push(Mutation::Remove { node });
    }

    /// Put detached `new` where `old` is and free `old`. Returns `new`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> NodeId {
        if old == self.root || old == new {
            return old;
        }
        self.detach(new);
        if let Some(parent) = self.parent(old) {
            if let Some(slot) = self
                .node_mut(parent)
                .and_then(|p| p.children.iter_mut().find(|c| **c == old))
            {
                *slot = new;
            }
            if let Some(node) = self.node_mut(new) {
                node.parent = Some(parent);
            }
        }
        if let Some(node) = self.node_mut(old) {
            node.parent = None;
        }
        self.free_subtree(old);
        self.mutations.push(Mutation::Replace { old, new });
        new
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != node);
        }
        if let Some(n) = self.node_mut(node) {
            n.parent = None;
        }
    }

    fn free_subtree(&mut self, node: NodeId) {
        let children = self
            .node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.free_subtree(child);
        }
        if let Some(slot) = self.nodes.get_mut(node.index()) {
            if slot.take().is_some() {
                self.free.push(node);
            }
        }
    }

    // === Mutation log ===

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    /// Number of live nodes, detached ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("html", &self.inner_html(self.root))
            .field("nodes", &self.node_count())
            .finish_non_exhaustive()
    }
}
