use std::collections::HashSet;

use helium_dom::Node;
use tracing::trace;

/// Desired content for one position of a swapped run.
#[derive(Debug, Clone)]
pub enum SwapEntry {
    Node(Node),
    Text(String),
}

impl From<Node> for SwapEntry {
    fn from(node: Node) -> Self {
        SwapEntry::Node(node)
    }
}

impl From<&str> for SwapEntry {
    fn from(text: &str) -> Self {
        SwapEntry::Text(text.to_string())
    }
}

impl From<String> for SwapEntry {
    fn from(text: String) -> Self {
        SwapEntry::Text(text)
    }
}

/// Patch the sibling run `from` so that it holds `to`, and return the nodes
/// now in its place.
///
/// Nodes keep their identity: a node present in both lists is moved, never
/// recreated, and a text entry reuses the old text node at the same position
/// when the text is unchanged. A fragment entry stands for its children,
/// and its bindings move to the parent of the run as they would on any
/// insertion. Both lists are expected to be non-empty; callers keep a
/// placeholder in the run when there is nothing to show.
pub fn element_swap(from: &[Node], to: Vec<SwapEntry>) -> Vec<Node> {
    let to = expand_fragments(from.first().and_then(Node::parent), to);
    let mut output: Vec<Node> = Vec::with_capacity(to.len());
    let mut entries = to.into_iter();

    for old in from {
        let Some(entry) = entries.next() else {
            break;
        };
        let node = match entry {
            SwapEntry::Text(text) if old.is_text() && old.text_content() == text => old.clone(),
            SwapEntry::Text(text) => Node::text(text),
            SwapEntry::Node(node) => node,
        };
        if !node.ptr_eq(old) {
            match output.last() {
                Some(previous) => previous.after(std::slice::from_ref(&node)),
                None => old.replace_with(&node),
            }
        }
        output.push(node);
    }

    let rest: Vec<Node> = entries
        .map(|entry| match entry {
            SwapEntry::Node(node) => node,
            SwapEntry::Text(text) => Node::text(text),
        })
        .collect();
    if !rest.is_empty() {
        if let Some(last) = output.last() {
            last.after(&rest);
        }
        output.extend(rest);
    }

    // old nodes may have been reused at another position
    let kept: HashSet<&Node> = output.iter().collect();
    let mut removed = 0;
    for old in from {
        if !kept.contains(old) && old.parent().is_some() {
            old.remove();
            removed += 1;
        }
    }

    trace!(from = from.len(), to = output.len(), removed, "element swap");
    output
}

fn expand_fragments(parent: Option<Node>, to: Vec<SwapEntry>) -> Vec<SwapEntry> {
    let mut expanded = Vec::with_capacity(to.len());
    for entry in to {
        match entry {
            SwapEntry::Node(node) if node.is_fragment() => {
                if let Some(parent) = &parent {
                    parent.adopt_bindings(&node);
                }
                expanded.extend(node.children().into_iter().map(SwapEntry::Node));
            }
            entry => expanded.push(entry),
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use helium_dom::{h, text};

    #[test]
    fn unchanged_text_is_reused() {
        let old = text("same");
        let parent = h("p", vec![], vec![old.clone()]);
        let out = element_swap(&[old.clone()], vec!["same".into()]);
        assert!(out[0].ptr_eq(&old));
        assert_eq!(parent.inner_html(), "same");
    }

    #[test]
    fn changed_text_gets_a_new_node() {
        let old = text("before");
        let parent = h("p", vec![], vec![old.clone()]);
        let out = element_swap(&[old.clone()], vec!["after".into()]);
        assert!(!out[0].ptr_eq(&old));
        assert!(old.parent().is_none());
        assert_eq!(parent.inner_html(), "after");
    }

    #[test]
    fn fragment_entry_stands_for_its_children() {
        let a = text("a");
        let parent = h("p", vec![], vec![a.clone()]);
        let x = text("x");
        let y = text("y");
        let frag = Node::fragment();
        frag.append_child(&x);
        frag.append_child(&y);

        let out = element_swap(&[a], vec![frag.into()]);
        assert_eq!(out.len(), 2);
        assert!(out[0].ptr_eq(&x) && out[1].ptr_eq(&y));
        assert!(out.iter().all(|n| n.parent().is_some_and(|p| p.ptr_eq(&parent))));
        assert_eq!(parent.inner_html(), "xy");

        let out = element_swap(&out, vec!["z".into()]);
        assert_eq!(out.len(), 1);
        assert_eq!(parent.inner_html(), "z");
    }
}
