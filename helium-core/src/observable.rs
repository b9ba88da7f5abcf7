use std::error::Error;
use std::rc::Rc;

/// Error raised by a listener. It aborts the emission that triggered it and is
/// returned to whoever caused that emission.
pub type EmitError = Box<dyn Error + 'static>;

/// Shared listener. `Fn` rather than `FnMut` so a listener can be re-entered
/// by an emission it triggers itself.
pub type Listener<T> = Rc<dyn Fn(&T) -> Result<(), EmitError>>;

/// Wrap a closure as a [`Listener`].
pub fn listener<T, F>(f: F) -> Listener<T>
where
    F: Fn(&T) -> Result<(), EmitError> + 'static,
{
    Rc::new(f)
}

/// A source that can be watched.
///
/// Stateful sources deliver their current value to the listener before
/// `watch` returns; errors from that first delivery are returned here.
pub trait Observable<T> {
    fn watch(&self, listener: Listener<T>) -> Result<Subscription, EmitError>;
}

/// Handle to a registered listener. Dropping it disposes the listener.
#[must_use = "dropping a Subscription disposes it immediately"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// A subscription with nothing to dispose.
    pub fn empty() -> Self {
        Self { dispose: None }
    }

    /// Combine two subscriptions into one that disposes both.
    pub fn join(self, other: Subscription) -> Self {
        Subscription::new(move || {
            drop(self);
            drop(other);
        })
    }

    pub fn dispose(mut self) {
        self.run();
    }

    /// Keep the listener registered for as long as the source lives.
    pub fn forget(mut self) {
        self.dispose = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.dispose.is_none()
    }

    fn run(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn dispose_runs_once() {
        let count = Rc::new(Cell::new(0));
        let sub = {
            let count = count.clone();
            Subscription::new(move || count.set(count.get() + 1))
        };
        sub.dispose();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn drop_disposes_but_forget_does_not() {
        let count = Rc::new(Cell::new(0));
        {
            let count = count.clone();
            let _sub = Subscription::new(move || count.set(count.get() + 1));
        }
        assert_eq!(count.get(), 1);

        let kept = {
            let count = count.clone();
            Subscription::new(move || count.set(count.get() + 1))
        };
        kept.forget();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn join_disposes_both() {
        let count = Rc::new(Cell::new(0));
        let make = |count: &Rc<Cell<i32>>| {
            let count = count.clone();
            Subscription::new(move || count.set(count.get() + 1))
        };
        let joined = make(&count).join(make(&count));
        drop(joined);
        assert_eq!(count.get(), 2);
    }
}
