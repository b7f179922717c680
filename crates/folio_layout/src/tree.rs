//! Element tree
//!
//! Nodes live in a slotmap and reference each other by [`NodeId`]. Every
//! accessor tolerates stale ids so widgets can treat a missing anchor as a
//! no-op.

use crate::element::{BuilderChild, ElementBuilder};
use folio_core::Rect;
use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::fmt::Write;

new_key_type! {
    pub struct NodeId;
}

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Element { tag: String },
    Text(String),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub classes: SmallVec<[String; 4]>,
    pub attributes: IndexMap<String, String>,
    pub style: IndexMap<String, String>,
    pub bounds: Option<Rect>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            classes: SmallVec::new(),
            attributes: IndexMap::new(),
            style: IndexMap::new(),
            bounds: None,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// A document of elements and text nodes
#[derive(Clone, Debug, Default)]
pub struct ElementTree {
    nodes: SlotMap<NodeId, Node>,
    root: Option<NodeId>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree whose root is `builder`
    pub fn from_root(builder: ElementBuilder) -> Self {
        let mut tree = Self::new();
        let root = tree.build(builder);
        tree.root = Some(root);
        tree
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.nodes
            .insert(Node::new(NodeKind::Element { tag: tag.into() }))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Text(text.into())))
    }

    /// Materialize a builder as a detached subtree
    pub fn build(&mut self, builder: ElementBuilder) -> NodeId {
        let ElementBuilder {
            tag,
            classes,
            attributes,
            style,
            bounds,
            children,
        } = builder;

        let mut node = Node::new(NodeKind::Element { tag });
        node.classes = classes;
        node.attributes = attributes;
        node.style = style;
        node.bounds = bounds;
        let id = self.nodes.insert(node);

        for child in children {
            let child_id = match child {
                BuilderChild::Element(b) => self.build(b),
                BuilderChild::Text(text) => self.create_text(text),
            };
            self.append_child(id, child_id);
        }
        id
    }

    /// Attach `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return false;
        }
        if self.is_ancestor(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        true
    }

    /// Remove `id` from its parent, keeping the subtree alive
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|c| *c != id);
        }
    }

    /// Remove a node and its whole subtree
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, of: NodeId) -> bool {
        let mut current = self.parent(of);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Element children only, in order
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| matches!(self.nodes[*c].kind, NodeKind::Element { .. }))
            .collect()
    }

    /// Copy a subtree, returning the detached copy
    pub fn deep_clone(&mut self, id: NodeId) -> Option<NodeId> {
        let source = self.nodes.get(id)?;
        let mut copy = Node::new(source.kind.clone());
        copy.classes = source.classes.clone();
        copy.attributes = source.attributes.clone();
        copy.style = source.style.clone();
        copy.bounds = source.bounds;
        let children = source.children.clone();

        let copy_id = self.nodes.insert(copy);
        for child in children {
            if let Some(child_copy) = self.deep_clone(child) {
                self.append_child(copy_id, child_copy);
            }
        }
        Some(copy_id)
    }

    /// Depth-first pre-order walk starting at `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.nodes.get(next) else {
                continue;
            };
            out.push(next);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// First element in document order with `id="..."`
    pub fn find_by_id(&self, element_id: &str) -> Option<NodeId> {
        let root = self.root?;
        self.descendants(root)
            .into_iter()
            .find(|n| self.attribute(*n, "id") == Some(element_id))
    }

    /// Every element under `scope` (inclusive) carrying `class`
    pub fn find_by_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    /// First element under `scope` (inclusive) carrying `class`
    pub fn first_by_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|n| self.has_class(*n, class))
    }

    /// Find by class anywhere under the root
    pub fn query_class(&self, class: &str) -> Vec<NodeId> {
        self.root
            .map(|root| self.find_by_class(root, class))
            .unwrap_or_default()
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.attributes.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.attributes.shift_remove(name);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes.get(id).is_some_and(|n| n.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            if !node.has_class(class) {
                node.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.classes.retain(|c| c != class);
        }
    }

    pub fn set_class(&mut self, id: NodeId, class: &str, enabled: bool) {
        if enabled {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    /// Replace every class on the node
    pub fn set_class_name(&mut self, id: NodeId, class_name: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.classes = class_name.split_whitespace().map(str::to_string).collect();
        }
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|n| n.style.get(property))
            .map(String::as_str)
    }

    pub fn set_style(&mut self, id: NodeId, property: &str, value: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.style.insert(property.to_string(), value.into());
        }
    }

    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id).and_then(|n| n.bounds)
    }

    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.bounds = Some(bounds);
        }
    }

    /// Concatenated text of the subtree
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| match &self.nodes[n].kind {
                NodeKind::Text(text) => Some(text.as_str()),
                NodeKind::Element { .. } => None,
            })
            .collect()
    }

    /// Serialize a subtree to HTML
    pub fn render_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let tag = match &node.kind {
            NodeKind::Text(text) => {
                out.push_str(&html_escape::encode_text(text));
                return;
            }
            NodeKind::Element { tag } => tag,
        };

        out.push('<');
        out.push_str(tag);
        for (name, value) in &node.attributes {
            write_attribute(out, name, value);
        }
        if !node.classes.is_empty() {
            write_attribute(out, "class", &node.classes.join(" "));
        }
        if !node.style.is_empty() {
            let mut style = String::new();
            for (i, (property, value)) in node.style.iter().enumerate() {
                if i > 0 {
                    style.push(' ');
                }
                let _ = write!(style, "{property}: {value};");
            }
            write_attribute(out, "style", &style);
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&tag.as_str()) {
            return;
        }
        for child in &node.children {
            self.write_html(*child, out);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn write_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(value));
    out.push('"');
}
