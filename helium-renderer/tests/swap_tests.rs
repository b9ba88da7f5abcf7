use helium_dom::{Node, h, text};
use helium_renderer::{SwapEntry, element_swap};

fn entries(nodes: &[&Node]) -> Vec<SwapEntry> {
    nodes.iter().map(|n| SwapEntry::Node((*n).clone())).collect()
}

fn same(a: &[Node], b: &[&Node]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.ptr_eq(y))
}

#[test]
fn reverse_keeps_identity() {
    let (a, b, c) = (text("a"), text("b"), text("c"));
    let parent = h("div", vec![], vec![a.clone(), b.clone(), c.clone()]);

    let out = element_swap(&[a.clone(), b.clone(), c.clone()], entries(&[&c, &b, &a]));

    assert!(same(&out, &[&c, &b, &a]));
    assert!(same(&parent.children(), &[&c, &b, &a]));
    assert_eq!(parent.inner_html(), "cba");
}

#[test]
fn insert_before_existing() {
    let a = h("a", vec![], vec![]);
    let b = h("b", vec![], vec![]);
    let parent = h("div", vec![], vec![a.clone()]);

    let out = element_swap(&[a.clone()], entries(&[&b, &a]));

    assert!(same(&out, &[&b, &a]));
    assert_eq!(parent.inner_html(), "<b></b><a></a>");
}

#[test]
fn round_trip_through_placeholder() {
    let (a, b, c) = (text("a"), text("b"), text("c"));
    let stub = Node::comment("stub");
    let parent = h(
        "div",
        vec![],
        vec![h("span", vec![], vec![]), a.clone(), b.clone(), c.clone()],
    );

    let out = element_swap(&[a.clone(), b.clone(), c.clone()], entries(&[&stub]));
    assert!(same(&out, &[&stub]));
    assert_eq!(parent.inner_html(), "<span></span><!--stub-->");
    assert!(a.parent().is_none() && b.parent().is_none() && c.parent().is_none());

    let out = element_swap(&out, entries(&[&a, &b, &c]));
    assert!(same(&out, &[&a, &b, &c]));
    assert_eq!(parent.inner_html(), "<span></span>abc");
    assert!(stub.parent().is_none());
}

#[test]
fn text_entries() {
    let old = text("one");
    let parent = h("p", vec![], vec![old.clone(), text("two")]);
    let from = parent.children();

    let out = element_swap(&from, vec!["one".into(), "2".into(), "three".into()]);

    assert_eq!(out.len(), 3);
    assert!(out[0].ptr_eq(&old));
    assert!(!out[1].ptr_eq(&from[1]));
    assert_eq!(parent.inner_html(), "one2three");
}

#[test]
fn text_does_not_reuse_comment() {
    let comment = Node::comment("x");
    let parent = h("p", vec![], vec![comment.clone()]);
    let out = element_swap(&[comment.clone()], vec!["x".into()]);
    assert!(out[0].is_text());
    assert_eq!(parent.inner_html(), "x");
}

#[test]
fn shrink_removes_unused() {
    let (a, b, c) = (text("a"), text("b"), text("c"));
    let parent = h("div", vec![], vec![a.clone(), b.clone(), c.clone()]);

    let out = element_swap(&[a.clone(), b.clone(), c.clone()], entries(&[&c]));

    assert!(same(&out, &[&c]));
    assert_eq!(parent.inner_html(), "c");
    assert!(a.parent().is_none());
    assert!(b.parent().is_none());
}

#[test]
fn replaced_middle_node_is_removed() {
    let (a, b) = (text("a"), text("b"));
    let x = h("x", vec![], vec![]);
    let parent = h("div", vec![], vec![a.clone(), b.clone()]);

    let out = element_swap(&[a.clone(), b.clone()], entries(&[&x, &a]));

    assert!(same(&out, &[&x, &a]));
    assert_eq!(parent.inner_html(), "<x></x>a");
    assert!(b.parent().is_none());
}

#[test]
fn keeps_surrounding_siblings() {
    let before = text("[");
    let after = text("]");
    let a = text("a");
    let parent = h("div", vec![], vec![before, a.clone(), after]);

    element_swap(&[a], vec!["x".into(), "y".into()]);

    assert_eq!(parent.inner_html(), "[xy]");
}
