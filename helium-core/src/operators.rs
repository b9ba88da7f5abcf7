use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::emitter::Emitter;
use crate::observable::{EmitError, Listener, Observable, Subscription};

type Subscribe<T> = dyn Fn(Listener<T>) -> Result<Subscription, EmitError>;

/// A source defined by how it subscribes a listener, typically to another
/// source. Nothing is subscribed upstream until something watches it.
pub struct Derived<T> {
    subscribe: Rc<Subscribe<T>>,
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe: self.subscribe.clone(),
        }
    }
}

impl<T: 'static> Derived<T> {
    pub fn new<F>(subscribe: F) -> Self
    where
        F: Fn(Listener<T>) -> Result<Subscription, EmitError> + 'static,
    {
        Self {
            subscribe: Rc::new(subscribe),
        }
    }
}

impl<T: 'static> Observable<T> for Derived<T> {
    fn watch(&self, listener: Listener<T>) -> Result<Subscription, EmitError> {
        (self.subscribe)(listener)
    }
}

/// Operators available on every cloneable source.
pub trait ObservableExt<T: 'static>: Observable<T> + Clone + 'static {
    fn map<R, F>(&self, mapper: F) -> Derived<R>
    where
        R: 'static,
        F: Fn(&T) -> R + 'static,
    {
        self.try_map(move |value| Ok(mapper(value)))
    }

    /// Like `map`, but a failing mapper aborts the emission with its error.
    fn try_map<R, F>(&self, mapper: F) -> Derived<R>
    where
        R: 'static,
        F: Fn(&T) -> Result<R, EmitError> + 'static,
    {
        let source = self.clone();
        let mapper = Rc::new(mapper);
        Derived::new(move |listener: Listener<R>| {
            let mapper = mapper.clone();
            source.watch(Rc::new(move |value: &T| {
                let mapped = mapper(value)?;
                listener(&mapped)
            }))
        })
    }

    fn filter<F>(&self, predicate: F) -> Derived<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Derived::new(move |listener: Listener<T>| {
            let predicate = predicate.clone();
            source.watch(Rc::new(move |value: &T| {
                if predicate(value) {
                    listener(value)
                } else {
                    Ok(())
                }
            }))
        })
    }

    /// Forward a value only when it differs from the last one forwarded to
    /// the same listener. The first value always passes.
    fn distinct(&self) -> Derived<T>
    where
        T: PartialEq + Clone,
    {
        let source = self.clone();
        Derived::new(move |listener: Listener<T>| {
            let held: RefCell<Option<T>> = RefCell::new(None);
            source.watch(Rc::new(move |value: &T| {
                {
                    let mut held = held.borrow_mut();
                    if held.as_ref() == Some(value) {
                        return Ok(());
                    }
                    *held = Some(value.clone());
                }
                listener(value)
            }))
        })
    }

    /// Run a side effect before forwarding each value.
    fn tap<F>(&self, effect: F) -> Derived<T>
    where
        F: Fn(&T) + 'static,
    {
        let source = self.clone();
        let effect = Rc::new(effect);
        Derived::new(move |listener: Listener<T>| {
            let effect = effect.clone();
            source.watch(Rc::new(move |value: &T| {
                effect(value);
                listener(value)
            }))
        })
    }

    /// Forward the first `count` values, then unsubscribe from the source.
    fn take(&self, count: usize) -> Derived<T> {
        let source = self.clone();
        Derived::new(move |listener: Listener<T>| {
            let stop = Rc::new(Stop::default());
            let seen = Cell::new(0);
            let upstream = {
                let stop = stop.clone();
                source.watch(Rc::new(move |value: &T| {
                    seen.set(seen.get() + 1);
                    if seen.get() > count {
                        stop.stop();
                        return Ok(());
                    }
                    listener(value)
                }))?
            };
            stop.hold(upstream);
            Ok(stop.subscription())
        })
    }

    /// Forward values until `signal` emits anything, then unsubscribe from
    /// both. A stateful signal with a current value stops the result at once.
    fn until<U, S>(&self, signal: S) -> Derived<T>
    where
        U: 'static,
        S: Observable<U> + 'static,
    {
        let source = self.clone();
        let signal = Rc::new(signal);
        Derived::new(move |listener: Listener<T>| {
            let stop = Rc::new(Stop::default());
            let upstream = {
                let stop = stop.clone();
                source.watch(Rc::new(move |value: &T| {
                    if stop.is_stopped() {
                        return Ok(());
                    }
                    listener(value)
                }))?
            };
            stop.hold(upstream);
            let stopper = {
                let stop = stop.clone();
                signal.watch(Rc::new(move |_: &U| {
                    stop.stop();
                    Ok(())
                }))?
            };
            stop.hold(stopper);
            Ok(stop.subscription())
        })
    }

    /// Pair each value with the latest value of `other`.
    ///
    /// Only this source drives emissions. Values that arrive before `other`
    /// has produced anything are held, and the first value from `other`
    /// releases the latest of them.
    fn combine<U, S>(&self, other: S) -> Derived<(T, U)>
    where
        T: Clone,
        U: Clone + 'static,
        S: Observable<U> + 'static,
    {
        let source = self.clone();
        let other = Rc::new(other);
        Derived::new(move |listener: Listener<(T, U)>| {
            let held: Rc<RefCell<(Option<T>, Option<U>)>> = Rc::new(RefCell::new((None, None)));

            let secondary = {
                let held = held.clone();
                let listener = listener.clone();
                other.watch(Rc::new(move |value: &U| {
                    let pending = {
                        let mut held = held.borrow_mut();
                        let first = held.1.is_none();
                        held.1 = Some(value.clone());
                        match &held.0 {
                            Some(primary) if first => Some((primary.clone(), value.clone())),
                            _ => None,
                        }
                    };
                    match pending {
                        Some(pair) => listener(&pair),
                        None => Ok(()),
                    }
                }))?
            };

            let primary = source.watch(Rc::new(move |value: &T| {
                let pending = {
                    let mut held = held.borrow_mut();
                    held.0 = Some(value.clone());
                    held.1.clone().map(|other| (value.clone(), other))
                };
                match pending {
                    Some(pair) => listener(&pair),
                    None => Ok(()),
                }
            }))?;

            Ok(primary.join(secondary))
        })
    }

    /// Share one upstream subscription between every listener.
    ///
    /// The source is watched when the first listener arrives and released
    /// when the last one leaves. Later listeners get the last shared value
    /// right away.
    fn share(&self) -> Derived<T>
    where
        T: Clone,
    {
        let shared = Rc::new(Shared {
            source: self.clone(),
            emitter: Emitter::new(),
            upstream: RefCell::new(None),
            connected: Cell::new(false),
            last: RefCell::new(None),
        });
        Derived::new(move |listener: Listener<T>| Shared::watch(&shared, listener))
    }
}

/// Upstream subscriptions that end together.
#[derive(Default)]
struct Stop {
    stopped: Cell<bool>,
    held: RefCell<Vec<Subscription>>,
}

impl Stop {
    fn is_stopped(&self) -> bool {
        self.stopped.get()
    }

    fn stop(&self) {
        self.stopped.set(true);
        let held = std::mem::take(&mut *self.held.borrow_mut());
        drop(held);
    }

    /// Keep `subscription` until stopped; dispose it right away if that
    /// already happened.
    fn hold(&self, subscription: Subscription) {
        if self.is_stopped() {
            drop(subscription);
        } else {
            self.held.borrow_mut().push(subscription);
        }
    }

    fn subscription(self: Rc<Self>) -> Subscription {
        Subscription::new(move || self.stop())
    }
}

struct Shared<T, O> {
    source: O,
    emitter: Emitter<T>,
    upstream: RefCell<Option<Subscription>>,
    connected: Cell<bool>,
    last: RefCell<Option<T>>,
}

impl<T, O> Shared<T, O>
where
    T: Clone + 'static,
    O: Observable<T> + 'static,
{
    fn watch(shared: &Rc<Self>, listener: Listener<T>) -> Result<Subscription, EmitError> {
        let downstream = shared.emitter.watch(listener.clone())?;

        if !shared.connected.replace(true) {
            let relay = {
                let shared = Rc::downgrade(shared);
                Rc::new(move |value: &T| {
                    let Some(shared) = shared.upgrade() else {
                        return Ok(());
                    };
                    *shared.last.borrow_mut() = Some(value.clone());
                    shared.emitter.emit(value)
                })
            };
            match shared.source.watch(relay) {
                Ok(upstream) => *shared.upstream.borrow_mut() = Some(upstream),
                Err(error) => {
                    shared.connected.set(false);
                    return Err(error);
                }
            }
        } else {
            let last = shared.last.borrow().clone();
            if let Some(value) = last {
                listener(&value)?;
            }
        }

        let shared = shared.clone();
        Ok(Subscription::new(move || {
            drop(downstream);
            if shared.emitter.is_inactive() {
                shared.connected.set(false);
                let upstream = shared.upstream.borrow_mut().take();
                drop(upstream);
            }
        }))
    }
}

impl<T: 'static, O> ObservableExt<T> for O where O: Observable<T> + Clone + 'static {}
