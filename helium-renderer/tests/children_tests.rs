use std::cell::Cell;
use std::rc::Rc;

use helium_core::Store;
use helium_dom::Node;
use helium_renderer::{RenderError, children, html, keyed_children};

fn counting_render(count: Rc<Cell<usize>>) -> impl Fn(&i32) -> Node + 'static {
    move |value: &i32| {
        count.set(count.get() + 1);
        html!(["<li>", "</li>"], *value).unwrap()
    }
}

fn extended(list: &[i32], more: &[i32]) -> Vec<i32> {
    let mut list = list.to_vec();
    list.extend_from_slice(more);
    list
}

#[test]
fn renders_additions() {
    let source = Store::new(vec![0]);
    let renders = Rc::new(Cell::new(0));
    let parent = html!(["<ul>", ""], children(&source, counting_render(renders.clone()))).unwrap();

    assert_eq!(parent.outer_html(), "<ul><li>0</li></ul>");
    assert_eq!(renders.get(), 1);

    source.modify(|list| extended(list, &[1])).unwrap();
    assert_eq!(parent.outer_html(), "<ul><li>0</li><li>1</li></ul>");
    assert_eq!(renders.get(), 2);

    source.modify(|list| extended(list, &[2, 3])).unwrap();
    assert_eq!(
        parent.outer_html(),
        "<ul><li>0</li><li>1</li><li>2</li><li>3</li></ul>"
    );
    assert_eq!(renders.get(), 4);
}

#[test]
fn removes_subtractions_down_to_placeholder() {
    let source = Store::new(vec![0, 1, 2, 3]);
    let renders = Rc::new(Cell::new(0));
    let parent = html!(["<ul>", ""], children(&source, counting_render(renders.clone()))).unwrap();
    assert_eq!(renders.get(), 4);

    source.update(vec![1, 2, 3]).unwrap();
    assert_eq!(parent.outer_html(), "<ul><li>1</li><li>2</li><li>3</li></ul>");

    source.update(vec![2, 3]).unwrap();
    assert_eq!(parent.outer_html(), "<ul><li>2</li><li>3</li></ul>");

    source.update(vec![]).unwrap();
    assert_eq!(parent.outer_html(), "<ul><!--content placeholder--></ul>");
    assert_eq!(renders.get(), 4);

    source.update(vec![5]).unwrap();
    assert_eq!(parent.outer_html(), "<ul><li>5</li></ul>");
    assert_eq!(renders.get(), 5);
}

#[test]
fn reorder_without_render() {
    let source = Store::new(vec![0, 1, 2]);
    let renders = Rc::new(Cell::new(0));
    let parent = html!(["<ul>", ""], children(&source, counting_render(renders.clone()))).unwrap();
    let first = parent.children();
    assert_eq!(renders.get(), 3);

    source.update(vec![2, 1, 0]).unwrap();
    assert_eq!(parent.outer_html(), "<ul><li>2</li><li>1</li><li>0</li></ul>");

    source.update(vec![1, 0, 2]).unwrap();
    assert_eq!(parent.outer_html(), "<ul><li>1</li><li>0</li><li>2</li></ul>");
    assert_eq!(renders.get(), 3);

    let now = parent.children();
    assert!(now[0].ptr_eq(&first[1]));
    assert!(now[1].ptr_eq(&first[0]));
    assert!(now[2].ptr_eq(&first[2]));
}

#[test]
fn remove_and_reinsert_renders_again() {
    let source = Store::new(vec![0, 1]);
    let renders = Rc::new(Cell::new(0));
    let parent = html!(["<ul>", ""], children(&source, counting_render(renders.clone()))).unwrap();
    assert_eq!(renders.get(), 2);

    source.update(vec![0]).unwrap();
    assert_eq!(parent.outer_html(), "<ul><li>0</li></ul>");
    assert_eq!(renders.get(), 2);

    source.update(vec![0, 1]).unwrap();
    assert_eq!(parent.outer_html(), "<ul><li>0</li><li>1</li></ul>");
    assert_eq!(renders.get(), 3);
}

#[test]
fn duplicate_item_fails_render() {
    let source = Store::new(vec![0, 0]);
    let renders = Rc::new(Cell::new(0));
    let result = html!(["<ul>", ""], children(&source, counting_render(renders.clone())));

    let err = result.unwrap_err();
    assert!(matches!(err, RenderError::DuplicateKey { index: 1, .. }));
    assert_eq!(err.to_string(), "Duplicate entry with ID 0 at index 1.");
    assert_eq!(source.listener_count(), 0);
}

#[test]
fn duplicate_in_later_emission_keeps_previous_nodes() {
    let source = Store::new(vec![0, 1]);
    let renders = Rc::new(Cell::new(0));
    let parent = html!(["<ul>", ""], children(&source, counting_render(renders.clone()))).unwrap();

    let err = RenderError::from(source.update(vec![1, 1]).unwrap_err());
    assert_eq!(err.to_string(), "Duplicate entry with ID 1 at index 1.");
    assert_eq!(parent.outer_html(), "<ul><li>0</li><li>1</li></ul>");

    source.update(vec![1, 0]).unwrap();
    assert_eq!(parent.outer_html(), "<ul><li>1</li><li>0</li></ul>");
    assert_eq!(renders.get(), 2);
}

#[derive(Clone)]
struct Item {
    id: u32,
    value: i32,
}

#[test]
fn custom_identity() {
    let source = Store::new(vec![Item { id: 1, value: 0 }, Item { id: 0, value: 0 }]);
    let renders = Rc::new(Cell::new(0));
    let ids = Rc::new(Cell::new(0));

    let list = {
        let renders = renders.clone();
        let ids = ids.clone();
        keyed_children(
            &source,
            move |item: &Item| {
                renders.set(renders.get() + 1);
                html!(["<li>", "</li>"], item.value).unwrap()
            },
            move |item: &Item, _| {
                ids.set(ids.get() + 1);
                item.id
            },
        )
    };
    let parent = html!(["<ul>", ""], list).unwrap();

    assert_eq!(parent.outer_html(), "<ul><li>0</li><li>0</li></ul>");
    assert_eq!(renders.get(), 2);
    assert_eq!(ids.get(), 2);

    source
        .modify(|items| {
            let mut items = items.clone();
            items.push(Item { id: 2, value: 1 });
            items
        })
        .unwrap();

    assert_eq!(parent.outer_html(), "<ul><li>0</li><li>0</li><li>1</li></ul>");
    assert_eq!(renders.get(), 3);
    assert_eq!(ids.get(), 5);
}

#[test]
fn index_as_identity() {
    let source = Store::new(vec!["a", "b"]);
    let list = keyed_children(
        &source,
        |item: &&str| html!(["<li>", "</li>"], *item).unwrap(),
        |_: &&str, index| index,
    );
    let parent = html!(["<ol>", "</ol>"], list).unwrap();
    source.update(vec!["b", "a", "c"]).unwrap();
    // nodes stay at their index, so the old text is kept
    assert_eq!(parent.outer_html(), "<ol><li>a</li><li>b</li><li>c</li></ol>");
}

#[test]
fn fragment_items_keep_every_root_on_reorder() {
    let source = Store::new(vec![1, 2]);
    let renders = Rc::new(Cell::new(0));
    let list = {
        let renders = renders.clone();
        children(&source, move |value: &i32| {
            renders.set(renders.get() + 1);
            html!(["<dt>", "</dt><dd>x</dd>"], *value).unwrap()
        })
    };
    let parent = html!(["<dl>", "</dl>"], list).unwrap();
    assert_eq!(
        parent.outer_html(),
        "<dl><dt>1</dt><dd>x</dd><dt>2</dt><dd>x</dd></dl>"
    );

    source.update(vec![2, 1]).unwrap();
    assert_eq!(
        parent.outer_html(),
        "<dl><dt>2</dt><dd>x</dd><dt>1</dt><dd>x</dd></dl>"
    );

    source.update(vec![1]).unwrap();
    assert_eq!(parent.outer_html(), "<dl><dt>1</dt><dd>x</dd></dl>");
    assert_eq!(renders.get(), 2);
}

#[test]
fn fragment_item_bindings_live_as_long_as_their_key() {
    let label = Store::new("a".to_string());
    let source = Store::new(vec![1, 2]);
    let list = {
        let label = label.clone();
        children(&source, move |value: &i32| {
            html!(["<dt>", "</dt>", ""], *value, &label).unwrap()
        })
    };
    let parent = html!(["<dl>", "</dl>"], list).unwrap();
    assert_eq!(parent.outer_html(), "<dl><dt>1</dt>a<dt>2</dt>a</dl>");
    assert_eq!(label.listener_count(), 2);

    source.update(vec![2]).unwrap();
    assert_eq!(parent.outer_html(), "<dl><dt>2</dt>a</dl>");
    assert_eq!(label.listener_count(), 1);

    label.update("b".to_string()).unwrap();
    assert_eq!(parent.outer_html(), "<dl><dt>2</dt>b</dl>");

    drop(parent);
    assert_eq!(label.listener_count(), 0);
    assert_eq!(source.listener_count(), 0);
}
