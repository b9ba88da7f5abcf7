//! Live links between dynamic values and the DOM.
//!
//! A binding's subscription is owned by a node: the element for attribute
//! bindings, the parent node for child bindings. The listener itself only
//! holds weak references to the nodes it writes to, so it never keeps them
//! alive. Bindings that arrive with an emitted fragment are held by the child
//! binding that spliced it, and released once none of that fragment's nodes
//! is left in the run.

use std::cell::RefCell;
use std::collections::HashSet;

use helium_core::{Observable, Subscription, listener};
use helium_dom::{Node, WeakNode};
use tracing::trace;

use crate::error::RenderError;
use crate::swap::{SwapEntry, element_swap};
use crate::value::{Dynamic, Part};

pub(crate) const PLACEHOLDER: &str = "content placeholder";

/// Bindings taken from an emitted fragment, with the nodes it contributed.
struct Adopted {
    nodes: Vec<WeakNode>,
    bindings: Vec<Subscription>,
}

impl Adopted {
    fn is_shown(&self, run: &HashSet<&Node>) -> bool {
        self.nodes
            .iter()
            .filter_map(WeakNode::upgrade)
            .any(|node| run.contains(&node))
    }
}

/// Keep the run of nodes starting at `placeholder` in sync with `source`.
/// `placeholder` must already be a child of `host`.
pub(crate) fn bind_children(
    host: &Node,
    placeholder: &Node,
    source: &Dynamic,
) -> Result<(), RenderError> {
    let current: RefCell<Vec<WeakNode>> = RefCell::new(vec![placeholder.downgrade()]);
    let adopted: RefCell<Vec<Adopted>> = RefCell::new(Vec::new());
    let placeholder = placeholder.clone();

    let subscription = source.watch(listener(move |part: &Part| {
        let from: Vec<Node> = current
            .borrow()
            .iter()
            .filter_map(WeakNode::upgrade)
            .collect();
        if from.is_empty() {
            trace!("child binding has no live nodes; ignoring emission");
            return Ok(());
        }

        let mut to = Vec::new();
        let mut incoming = Vec::new();
        flatten(part, &mut to, &mut incoming);
        if to.is_empty() {
            to.push(SwapEntry::Node(placeholder.clone()));
        }

        let next = element_swap(&from, to);
        *current.borrow_mut() = next.iter().map(Node::downgrade).collect();

        let released: Vec<Adopted> = {
            let run: HashSet<&Node> = next.iter().collect();
            let mut adopted = adopted.borrow_mut();
            let (kept, released): (Vec<Adopted>, Vec<Adopted>) = std::mem::take(&mut *adopted)
                .into_iter()
                .partition(|group| group.is_shown(&run));
            *adopted = kept;
            adopted.extend(incoming);
            released
        };
        if !released.is_empty() {
            let bindings: usize = released.iter().map(|group| group.bindings.len()).sum();
            trace!(groups = released.len(), bindings, "released fragment bindings");
        }
        // Disposing may re-enter other sources; do it with nothing borrowed.
        drop(released);
        Ok(())
    }))?;

    host.add_binding(subscription);
    Ok(())
}

fn flatten(part: &Part, out: &mut Vec<SwapEntry>, adopted: &mut Vec<Adopted>) {
    match part {
        Part::Empty => {}
        Part::Text(text) => out.push(SwapEntry::Text(text.clone())),
        Part::Node(node) if node.is_fragment() => {
            let children = node.children();
            let bindings = node.take_bindings();
            if !bindings.is_empty() {
                adopted.push(Adopted {
                    nodes: children.iter().map(Node::downgrade).collect(),
                    bindings,
                });
            }
            out.extend(children.into_iter().map(SwapEntry::Node));
        }
        Part::Node(node) => out.push(SwapEntry::Node(node.clone())),
        Part::List(parts) => {
            for part in parts {
                flatten(part, out, adopted);
            }
        }
    }
}

/// Keep attribute `name` of `element` in sync with `source`. An empty
/// emission removes the attribute.
pub(crate) fn bind_attribute(
    element: &Node,
    name: &str,
    source: &Dynamic,
) -> Result<(), RenderError> {
    let target = element.downgrade();
    let name = name.to_string();

    let subscription = source.watch(listener(move |part: &Part| {
        let Some(element) = target.upgrade() else {
            return Ok(());
        };
        match part {
            Part::Empty => element.remove_attribute(&name),
            Part::Text(text) => element.set_attribute(&name, text),
            other => {
                return Err(RenderError::NonPrimitiveAttribute {
                    name: name.clone(),
                    kind: other.kind(),
                }
                .into());
            }
        }
        Ok(())
    }))?;

    element.add_binding(subscription);
    Ok(())
}
