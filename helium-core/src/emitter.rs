use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::observable::{EmitError, Listener, Observable, Subscription};

struct Entry<T> {
    id: u64,
    active: Rc<Cell<bool>>,
    listener: Listener<T>,
}

struct EmitterState<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

/// Stateless source: listeners only see values emitted after they subscribed.
pub struct Emitter<T> {
    state: Rc<RefCell<EmitterState<T>>>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Emitter<T> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(EmitterState {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_inactive(&self) -> bool {
        self.listener_count() == 0
    }

    /// Call every listener with `value`, in subscription order.
    ///
    /// Stops at the first listener error and returns it. A listener disposed
    /// part way through is not called for the rest of this emission.
    pub fn emit(&self, value: &T) -> Result<(), EmitError> {
        // Snapshot so listeners can subscribe, dispose or emit while we iterate.
        let snapshot: Vec<(Rc<Cell<bool>>, Listener<T>)> = self
            .state
            .borrow()
            .entries
            .iter()
            .map(|e| (e.active.clone(), e.listener.clone()))
            .collect();

        for (active, listener) in snapshot {
            if active.get() {
                listener(value)?;
            }
        }
        Ok(())
    }

    /// Drop every listener.
    pub fn dispose(&self) {
        let entries = std::mem::take(&mut self.state.borrow_mut().entries);
        for entry in &entries {
            entry.active.set(false);
        }
        // Listeners may own subscriptions to this emitter; drop them unborrowed.
        drop(entries);
    }

    fn subscribe(&self, listener: Listener<T>) -> Subscription {
        let active = Rc::new(Cell::new(true));
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.entries.push(Entry {
                id,
                active: active.clone(),
                listener,
            });
            id
        };

        let state: Weak<RefCell<EmitterState<T>>> = Rc::downgrade(&self.state);
        Subscription::new(move || {
            active.set(false);
            let Some(state) = state.upgrade() else { return };
            let removed = {
                let mut state = state.borrow_mut();
                let pos = state.entries.iter().position(|e| e.id == id);
                pos.map(|pos| state.entries.remove(pos))
            };
            drop(removed);
        })
    }
}

impl<T: 'static> Observable<T> for Emitter<T> {
    fn watch(&self, listener: Listener<T>) -> Result<Subscription, EmitError> {
        Ok(self.subscribe(listener))
    }
}
