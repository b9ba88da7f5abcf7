//! Dynamic value sources.
//!
//! Everything here is single threaded and synchronous: an emission calls every
//! listener in subscription order before returning, and a listener may emit
//! again on the same source while it runs.

pub mod emitter;
pub mod observable;
pub mod operators;
pub mod store;

pub use emitter::Emitter;
pub use observable::{EmitError, Listener, Observable, Subscription, listener};
pub use operators::{Derived, ObservableExt};
pub use store::Store;
