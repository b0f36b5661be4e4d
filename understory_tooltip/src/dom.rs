// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small arena document: the host-side tree that tooltips attach to.
//!
//! The document stands in for a browser DOM. It stores elements, text, and
//! opaque markup fragments in a slot arena addressed by generational
//! [`NodeId`]s, so a handle to a removed node never aliases a later one.
//! Hosts mirror their real tree into it, write layout boxes with
//! [`Document::set_bounds`], and feed events through
//! [`TooltipHost::dispatch_event`](crate::TooltipHost::dispatch_event).
//!
//! ## Example
//!
//! ```rust
//! use understory_tooltip::Document;
//!
//! let mut doc = Document::new();
//! let button = doc.create_element("button");
//! doc.add_class(button, "primary");
//! doc.append_child(doc.body(), button);
//!
//! assert!(doc.is_connected(button));
//! assert_eq!(doc.query_selector_all("button.primary").unwrap(), vec![button]);
//!
//! doc.remove(button);
//! assert!(!doc.is_alive(button));
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use kurbo::Rect;

use crate::selector::{Selector, SelectorError};

/// Identifier for a node in a [`Document`] (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32, u32);

impl NodeId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// What a node holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    /// The document root. There is exactly one per [`Document`].
    Root,
    /// An element with a lowercase tag name.
    Element(String),
    /// Plain text; never interpreted as markup.
    Text(String),
    /// A raw markup fragment, kept opaque. Only produced when a tooltip allows HTML.
    Markup(String),
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
    attributes: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    bounds: Rect,
}

impl Node {
    fn new(generation: u32, data: NodeData) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data,
            attributes: Vec::new(),
            styles: Vec::new(),
            bounds: Rect::ZERO,
        }
    }
}

/// Arena-backed document tree.
///
/// A fresh document contains a root and a `body` element. Nodes created with
/// [`create_element`](Self::create_element) and friends start detached; they
/// become part of the document once appended under a connected parent.
#[derive(Clone)]
pub struct Document {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    body: NodeId,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Document")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding a root and an empty `body`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 0),
            body: NodeId::new(0, 0),
        };
        doc.root = doc.alloc(NodeData::Root);
        doc.body = doc.alloc(NodeData::Element("body".into()));
        doc.link_parent(doc.body, doc.root);
        doc
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The `body` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Number of live nodes, including the root and `body`.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Always false: a document has at least its root and `body`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element(tag.to_ascii_lowercase()))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(text.to_string()))
    }

    /// Create a detached, opaque markup node.
    pub fn create_markup(&mut self, markup: &str) -> NodeId {
        self.alloc(NodeData::Markup(markup.to_string()))
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, data));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, data)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Returns true if `id` is live and reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_alive(id) && self.contains(self.root, id)
    }

    /// Returns true if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) {
            return false;
        }
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent_of(id);
        }
        false
    }

    /// Returns the parent of a node if live, or `None` for detached or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Returns what the node holds.
    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.node(id).map(|n| &n.data)
    }

    /// Returns the tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.data(id)? {
            NodeData::Element(tag) => Some(tag),
            _ => None,
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    ///
    /// Returns `false` (and changes nothing) if either node is stale, if
    /// `child` is the root, or if `child` is an ancestor of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.is_alive(parent)
            || !self.is_alive(child)
            || child == self.root
            || self.contains(child, parent)
        {
            return false;
        }
        self.detach(child);
        self.link_parent(child, parent);
        true
    }

    /// Detach a node (and its subtree) from its parent without freeing it.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent_of(id) {
            self.unlink_parent(id, parent);
        }
    }

    /// Remove a node and its subtree from the document and free their slots.
    ///
    /// Handles to removed nodes become stale. The root and `body` cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.root || id == self.body {
            return;
        }
        self.detach(id);
        let mut stack = alloc::vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes[cur.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(cur.idx());
            }
        }
    }

    /// Remove every child of `id`, freeing them.
    pub fn clear_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.children_of(id).to_vec();
        for child in children {
            self.remove(child);
        }
    }

    /// Returns the value of an attribute.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the attribute is present.
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(n) = self.node_mut(id) {
            set_pair(&mut n.attributes, name, value);
        }
    }

    /// Remove an attribute if present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(n) = self.node_mut(id) {
            n.attributes.retain(|(k, _)| k != name);
        }
    }

    /// Iterate the whitespace-separated entries of the `class` attribute.
    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.attribute(id, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Returns true if the element carries `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).any(|c| c == class)
    }

    /// Add a class if not already present.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if class.is_empty() || !self.is_alive(id) || self.has_class(id, class) {
            return;
        }
        let value = match self.attribute(id, "class") {
            Some(existing) if !existing.trim().is_empty() => alloc::format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attribute(id, "class", &value);
    }

    /// Remove a class if present.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if !self.has_class(id, class) {
            return;
        }
        let value = self
            .classes(id)
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(id, "class", &value);
    }

    /// Returns an inline style property.
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.node(id)?
            .styles
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    /// Set an inline style property.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        if let Some(n) = self.node_mut(id) {
            set_pair(&mut n.styles, property, value);
        }
    }

    /// Remove an inline style property.
    pub fn remove_style(&mut self, id: NodeId, property: &str) {
        if let Some(n) = self.node_mut(id) {
            n.styles.retain(|(k, _)| k != property);
        }
    }

    /// Concatenated text of the subtree, markup fragments included verbatim.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for n in self.descendants(id) {
            match self.data(n) {
                Some(NodeData::Text(t) | NodeData::Markup(t)) => out.push_str(t),
                _ => {}
            }
        }
        out
    }

    /// Layout box of a node in document coordinates, as last written by the host.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.node(id).map(|n| n.bounds)
    }

    /// Record the layout box of a node.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_mut(id) {
            n.bounds = bounds;
        }
    }

    /// Iterate `id` and its descendants in document (pre-)order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.is_alive(id) {
            alloc::vec![id]
        } else {
            Vec::new()
        };
        Descendants { doc: self, stack }
    }

    /// Returns every connected element matching `selector`, in document order.
    ///
    /// Supports type, `#id`, `.class`, `[attr]` and `[attr=value]` selectors,
    /// compounds of those, the descendant combinator, and `,` groups.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(self.root)
            .filter(|&n| selector.matches(self, n))
            .collect())
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }
}

fn set_pair(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    if let Some(slot) = pairs.iter_mut().find(|(k, _)| k == key) {
        slot.1 = value.to_string();
    } else {
        pairs.push((key.to_string(), value.to_string()));
    }
}

/// Pre-order iterator returned by [`Document::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children_of(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn fresh_document_has_connected_body() {
        let doc = Document::new();
        assert!(doc.is_connected(doc.body()));
        assert_eq!(doc.parent_of(doc.body()), Some(doc.root()));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn append_moves_between_parents() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(doc.body(), a);
        doc.append_child(doc.body(), b);

        assert!(doc.append_child(a, child));
        assert!(doc.append_child(b, child));
        assert!(doc.children_of(a).is_empty());
        assert_eq!(doc.children_of(b), &[child]);
        assert_eq!(doc.parent_of(child), Some(b));
    }

    #[test]
    fn append_rejects_cycles() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner);
        assert!(!doc.append_child(inner, outer));
        assert!(!doc.append_child(inner, inner));
        assert_eq!(doc.parent_of(inner), Some(outer));
    }

    #[test]
    fn remove_frees_subtree_and_stales_ids() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_text("hi");
        doc.append_child(doc.body(), outer);
        doc.append_child(outer, inner);
        assert_eq!(doc.len(), 4);

        doc.remove(outer);
        assert!(!doc.is_alive(outer));
        assert!(!doc.is_alive(inner));
        assert!(doc.children_of(doc.body()).is_empty());
        assert_eq!(doc.len(), 2);

        // Slot reuse bumps the generation.
        let again = doc.create_element("p");
        assert!(doc.is_alive(again));
        assert!(!doc.is_alive(outer));
        assert_ne!(again, outer);
    }

    #[test]
    fn body_and_root_cannot_be_removed() {
        let mut doc = Document::new();
        doc.remove(doc.body());
        doc.remove(doc.root());
        assert!(doc.is_connected(doc.body()));
    }

    #[test]
    fn class_list_round_trip() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.add_class(el, "a");
        doc.add_class(el, "b");
        doc.add_class(el, "a");
        assert_eq!(doc.attribute(el, "class"), Some("a b"));
        doc.remove_class(el, "a");
        assert_eq!(doc.attribute(el, "class"), Some("b"));
        assert!(!doc.has_class(el, "a"));
    }

    #[test]
    fn text_content_walks_in_order() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        let a = doc.create_text("a");
        let b = doc.create_markup("<b>b</b>");
        doc.append_child(el, a);
        doc.append_child(el, b);
        assert_eq!(doc.text_content(el), "a<b>b</b>");
    }

    #[test]
    fn detached_nodes_are_not_connected() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        assert!(doc.is_alive(el));
        assert!(!doc.is_connected(el));
        doc.append_child(doc.body(), el);
        assert!(doc.is_connected(el));
        doc.detach(el);
        assert!(!doc.is_connected(el));
    }

    #[test]
    fn descendants_are_preorder() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let c = doc.create_element("c");
        doc.append_child(doc.body(), a);
        doc.append_child(a, b);
        doc.append_child(doc.body(), c);
        let order: Vec<NodeId> = doc.descendants(doc.body()).collect();
        assert_eq!(order, vec![doc.body(), a, b, c]);
    }
}
