use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use helium_core::{Derived, Listener, Observable, ObservableExt, Subscription};
use helium_dom::Node;
use tracing::debug;

use crate::error::RenderError;
use crate::value::{Dynamic, Part};

/// Render a collection source as a list of nodes, keyed by the items
/// themselves. See [`keyed_children`].
pub fn children<T, O, R>(source: &O, render: R) -> Dynamic
where
    T: Clone + Eq + Hash + Debug + 'static,
    O: ObservableExt<Vec<T>>,
    R: Fn(&T) -> Node + 'static,
{
    keyed_children(source, render, |item: &T, _| item.clone())
}

/// Render a collection source as a list of nodes.
///
/// Each emission renders only the items whose key was not present in the
/// previous emission; the others reuse the nodes rendered for that key. A
/// key that drops out for one emission is forgotten. Two items with the
/// same key in one emission fail with [`RenderError::DuplicateKey`].
///
/// `render` may return a fragment: its children are kept as the item's run
/// and its bindings live as long as the key does.
///
/// Every watcher of the returned source gets its own set of nodes.
pub fn keyed_children<T, K, O, R, I>(source: &O, render: R, identity: I) -> Dynamic
where
    T: 'static,
    K: Eq + Hash + Debug + 'static,
    O: ObservableExt<Vec<T>>,
    R: Fn(&T) -> Node + 'static,
    I: Fn(&T, usize) -> K + 'static,
{
    let source = source.clone();
    let render = Rc::new(render);
    let identity = Rc::new(identity);

    Dynamic::from(Derived::new(move |listener: Listener<Part>| {
        let render = render.clone();
        let identity = identity.clone();
        let cache: RefCell<HashMap<K, Rendered>> = RefCell::new(HashMap::new());
        source.watch(Rc::new(move |items: &Vec<T>| {
            let nodes = project(items, &cache, &*render, &*identity)?;
            listener(&Part::List(nodes.into_iter().map(Part::Node).collect()))
        }))
    }))
}

/// Nodes rendered for one key.
struct Rendered {
    nodes: Vec<Node>,
    _bindings: Vec<Subscription>,
}

impl Rendered {
    fn new(node: Node) -> Self {
        if node.is_fragment() {
            Rendered {
                nodes: node.children(),
                _bindings: node.take_bindings(),
            }
        } else {
            Rendered {
                nodes: vec![node],
                _bindings: Vec::new(),
            }
        }
    }
}

fn project<T, K>(
    items: &[T],
    cache: &RefCell<HashMap<K, Rendered>>,
    render: &dyn Fn(&T) -> Node,
    identity: &dyn Fn(&T, usize) -> K,
) -> Result<Vec<Node>, RenderError>
where
    K: Eq + Hash + Debug,
{
    let keys: Vec<K> = items
        .iter()
        .enumerate()
        .map(|(index, item)| identity(item, index))
        .collect();
    let mut seen = HashSet::with_capacity(keys.len());
    for (index, key) in keys.iter().enumerate() {
        if !seen.insert(key) {
            return Err(RenderError::DuplicateKey {
                id: format!("{key:?}"),
                index,
            });
        }
    }

    let mut previous = cache.take();
    let mut next: HashMap<K, Rendered> = HashMap::with_capacity(items.len());
    let mut nodes = Vec::with_capacity(items.len());
    let mut rendered = 0;

    for (item, key) in items.iter().zip(keys) {
        let entry = match previous.remove(&key) {
            Some(entry) => entry,
            None => {
                rendered += 1;
                Rendered::new(render(item))
            }
        };
        nodes.extend(entry.nodes.iter().cloned());
        next.insert(key, entry);
    }

    debug!(items = items.len(), rendered, dropped = previous.len(), "projected list");
    cache.replace(next);
    // Forgotten keys release their bindings here, with the cache unborrowed.
    drop(previous);
    Ok(nodes)
}
