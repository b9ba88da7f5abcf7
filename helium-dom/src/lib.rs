//! In-memory DOM with reference identity.
//!
//! A [`Node`] is a cheap handle; clones refer to the same node and
//! [`Node::ptr_eq`] compares identity. Parents own their children, the link
//! back to the parent is weak. Nodes also own the subscriptions that keep
//! them in sync with dynamic values, so dropping a node releases them.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use helium_core::Subscription;
use tracing::trace;

pub mod events;
pub mod namespace;
mod serialize;

pub use events::{Event, EventListener, dispatch, event_listener};
pub use namespace::{HTML_NAMESPACE, Namespace, SVG_NAMESPACE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { namespace: Namespace, tag: String },
    Text,
    Comment,
    Fragment,
}

struct NodeData {
    kind: NodeKind,
    text: RefCell<String>,
    attributes: RefCell<Vec<(String, String)>>,
    listeners: RefCell<Vec<(String, EventListener)>>,
    parent: RefCell<Weak<NodeData>>,
    children: RefCell<Vec<Node>>,
    bindings: RefCell<Vec<Subscription>>,
}

#[derive(Clone)]
pub struct Node(Rc<NodeData>);

/// Non-owning reference to a [`Node`].
#[derive(Clone, Default)]
pub struct WeakNode(Weak<NodeData>);

impl WeakNode {
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(Node)
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl Node {
    fn with_kind(kind: NodeKind, text: String) -> Self {
        Node(Rc::new(NodeData {
            kind,
            text: RefCell::new(text),
            attributes: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            bindings: RefCell::new(Vec::new()),
        }))
    }

    pub fn element(namespace: Namespace, tag: impl Into<String>) -> Self {
        Self::with_kind(
            NodeKind::Element {
                namespace,
                tag: tag.into(),
            },
            String::new(),
        )
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Text, text.into())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Comment, text.into())
    }

    pub fn fragment() -> Self {
        Self::with_kind(NodeKind::Fragment, String::new())
    }

    pub fn kind(&self) -> &NodeKind {
        &self.0.kind
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.0.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn namespace(&self) -> Option<Namespace> {
        match &self.0.kind {
            NodeKind::Element { namespace, .. } => Some(*namespace),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.0.kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        self.0.kind == NodeKind::Text
    }

    pub fn is_comment(&self) -> bool {
        self.0.kind == NodeKind::Comment
    }

    pub fn is_fragment(&self) -> bool {
        self.0.kind == NodeKind::Fragment
    }

    /// True if both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.0))
    }

    pub fn parent(&self) -> Option<Node> {
        self.0.parent.borrow().upgrade().map(Node)
    }

    pub fn children(&self) -> Vec<Node> {
        self.0.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    pub fn first_child(&self) -> Option<Node> {
        self.0.children.borrow().first().cloned()
    }

    /// Text of a text or comment node; for elements and fragments the
    /// concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        match self.0.kind {
            NodeKind::Text | NodeKind::Comment => self.0.text.borrow().clone(),
            _ => {
                let mut out = String::new();
                self.collect_text(&mut out);
                out
            }
        }
    }

    fn collect_text(&self, out: &mut String) {
        for child in self.0.children.borrow().iter() {
            match child.0.kind {
                NodeKind::Text => out.push_str(&child.0.text.borrow()),
                NodeKind::Comment => {}
                _ => child.collect_text(out),
            }
        }
    }

    /// On text and comment nodes, replace the text. On elements and
    /// fragments, replace all children with a single text node.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        match self.0.kind {
            NodeKind::Text | NodeKind::Comment => *self.0.text.borrow_mut() = text,
            _ => {
                let old = std::mem::take(&mut *self.0.children.borrow_mut());
                for child in &old {
                    *child.0.parent.borrow_mut() = Weak::new();
                }
                drop(old);
                if !text.is_empty() {
                    self.append_child(&Node::text(text));
                }
            }
        }
    }

    /// Nodes to insert for `node` under `self`: a fragment gives up its
    /// children (and its bindings move to `self`), anything else is detached
    /// from its current parent first.
    fn insertable(&self, node: &Node) -> Vec<Node> {
        if node.is_fragment() {
            let children = std::mem::take(&mut *node.0.children.borrow_mut());
            for child in &children {
                *child.0.parent.borrow_mut() = Weak::new();
            }
            self.adopt_bindings(node);
            children
        } else {
            node.detach();
            vec![node.clone()]
        }
    }

    fn detach(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        let removed = {
            let mut children = parent.0.children.borrow_mut();
            let index = children.iter().position(|c| c.ptr_eq(self));
            index.map(|i| children.remove(i))
        };
        *self.0.parent.borrow_mut() = Weak::new();
        drop(removed);
    }

    fn claim(&self, nodes: &[Node]) {
        for node in nodes {
            *node.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        }
    }

    /// Append `child` as the last child. A fragment contributes its children.
    pub fn append_child(&self, child: &Node) {
        if child.ptr_eq(self) {
            return;
        }
        let nodes = self.insertable(child);
        self.claim(&nodes);
        self.0.children.borrow_mut().extend(nodes);
    }

    /// Remove this node from its parent.
    pub fn remove(&self) {
        self.detach();
    }

    /// Put `replacement` where this node is. Does nothing if this node has
    /// no parent.
    pub fn replace_with(&self, replacement: &Node) {
        if replacement.ptr_eq(self) {
            return;
        }
        let Some(parent) = self.parent() else {
            return;
        };
        let nodes = parent.insertable(replacement);
        parent.claim(&nodes);
        let old: Vec<Node> = {
            let mut children = parent.0.children.borrow_mut();
            let Some(index) = children.iter().position(|c| c.ptr_eq(self)) else {
                return;
            };
            children.splice(index..index + 1, nodes).collect()
        };
        *self.0.parent.borrow_mut() = Weak::new();
        drop(old);
    }

    /// Insert `nodes` directly after this node, in order. Does nothing if
    /// this node has no parent.
    pub fn after(&self, nodes: &[Node]) {
        let Some(parent) = self.parent() else {
            return;
        };
        let mut incoming = Vec::with_capacity(nodes.len());
        for node in nodes {
            if !node.ptr_eq(self) {
                incoming.extend(parent.insertable(node));
            }
        }
        parent.claim(&incoming);
        let mut children = parent.0.children.borrow_mut();
        let Some(index) = children.iter().position(|c| c.ptr_eq(self)) else {
            return;
        };
        children.splice(index + 1..index + 1, incoming);
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut attributes = self.0.attributes.borrow_mut();
        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.0
            .attributes
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.0.attributes.borrow().iter().any(|(n, _)| n == name)
    }

    pub fn remove_attribute(&self, name: &str) {
        self.0.attributes.borrow_mut().retain(|(n, _)| n != name);
    }

    /// Attributes in the order they were first set.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.0.attributes.borrow().clone()
    }

    pub fn add_event_listener(&self, event: &str, listener: EventListener) {
        self.0
            .listeners
            .borrow_mut()
            .push((event.to_string(), listener));
    }

    pub(crate) fn listeners_for(&self, event: &str) -> Vec<EventListener> {
        self.0
            .listeners
            .borrow()
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, l)| l.clone())
            .collect()
    }

    pub fn dispatch_event(&self, event: &str) -> usize {
        dispatch(self, event)
    }

    /// Keep `subscription` alive for as long as this node lives.
    pub fn add_binding(&self, subscription: Subscription) {
        self.0.bindings.borrow_mut().push(subscription);
    }

    pub fn binding_count(&self) -> usize {
        self.0.bindings.borrow().len()
    }

    /// Move every binding owned by `from` onto this node.
    pub fn adopt_bindings(&self, from: &Node) {
        if from.ptr_eq(self) {
            return;
        }
        let moved = std::mem::take(&mut *from.0.bindings.borrow_mut());
        self.0.bindings.borrow_mut().extend(moved);
    }

    /// Remove and return the bindings owned by this node, for a caller that
    /// ties their lifetime to something else.
    pub fn take_bindings(&self) -> Vec<Subscription> {
        std::mem::take(&mut *self.0.bindings.borrow_mut())
    }

    /// Dispose the bindings owned by this node and all its descendants.
    /// Returns how many were disposed.
    pub fn dispose_bindings(&self) -> usize {
        let own = std::mem::take(&mut *self.0.bindings.borrow_mut());
        let mut count = own.len();
        drop(own);
        for child in self.children() {
            count += child.dispose_bindings();
        }
        trace!(count, "disposed bindings");
        count
    }

    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        serialize::write_node(self, &mut out);
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            serialize::write_node(&child, &mut out);
        }
        out
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Node").field(&self.outer_html()).finish()
    }
}

/// Build an HTML element with attributes and children.
pub fn h(tag: &str, attrs: Vec<(&str, &str)>, children: Vec<Node>) -> Node {
    let node = Node::element(Namespace::Html, tag);
    for (name, value) in attrs {
        node.set_attribute(name, value);
    }
    for child in &children {
        node.append_child(child);
    }
    node
}

pub fn text(t: impl Into<String>) -> Node {
    Node::text(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_tree() {
        let node = h(
            "div",
            vec![("class", "app")],
            vec![text("hello"), h("span", vec![], vec![text("world")])],
        );
        assert_eq!(node.tag(), Some("div"));
        assert_eq!(node.get_attribute("class").as_deref(), Some("app"));
        assert_eq!(node.child_count(), 2);
        assert_eq!(node.text_content(), "helloworld");
        assert_eq!(
            node.outer_html(),
            r#"<div class="app">hello<span>world</span></div>"#
        );
    }

    #[test]
    fn identity_not_structure() {
        let a = text("same");
        let b = text("same");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
