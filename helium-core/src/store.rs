use std::cell::RefCell;
use std::rc::Rc;

use crate::emitter::Emitter;
use crate::observable::{EmitError, Listener, Observable, Subscription};

struct StoreState<T> {
    value: RefCell<T>,
    emitter: Emitter<T>,
}

/// A stateful value source.
///
/// `watch` delivers the current value immediately, then every later update.
pub struct Store<T> {
    state: Rc<StoreState<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T> Store<T>
where
    T: Clone + 'static,
{
    pub fn new(initial: T) -> Self {
        Self {
            state: Rc::new(StoreState {
                value: RefCell::new(initial),
                emitter: Emitter::new(),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.state.value.borrow().clone()
    }

    /// Replace the value and notify every listener.
    pub fn update(&self, value: T) -> Result<(), EmitError> {
        *self.state.value.borrow_mut() = value.clone();
        self.state.emitter.emit(&value)
    }

    /// Derive the next value from the current one, then notify.
    pub fn modify(&self, updater: impl FnOnce(&T) -> T) -> Result<(), EmitError> {
        let next = updater(&self.state.value.borrow());
        self.update(next)
    }

    pub fn listener_count(&self) -> usize {
        self.state.emitter.listener_count()
    }

    /// Drop every listener. The store keeps its value.
    pub fn dispose(&self) {
        self.state.emitter.dispose();
    }
}

impl<T> Observable<T> for Store<T>
where
    T: Clone + 'static,
{
    fn watch(&self, listener: Listener<T>) -> Result<Subscription, EmitError> {
        let subscription = self.state.emitter.watch(listener.clone())?;
        let current = self.get();
        listener(&current)?;
        Ok(subscription)
    }
}
