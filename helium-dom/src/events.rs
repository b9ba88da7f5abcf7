use std::rc::Rc;

use crate::Node;

/// An event delivered to listeners registered with
/// [`Node::add_event_listener`].
#[derive(Clone)]
pub struct Event {
    pub name: String,
    pub target: Node,
}

pub type EventListener = Rc<dyn Fn(&Event)>;

/// Wrap a closure as an [`EventListener`].
pub fn event_listener(f: impl Fn(&Event) + 'static) -> EventListener {
    Rc::new(f)
}

/// Calls every listener registered for `event` on `target`, in registration
/// order. Returns the number of listeners invoked.
pub fn dispatch(target: &Node, event: &str) -> usize {
    let handlers = target.listeners_for(event);
    let ev = Event {
        name: event.to_string(),
        target: target.clone(),
    };
    for handler in &handlers {
        handler(&ev);
    }
    handlers.len()
}
