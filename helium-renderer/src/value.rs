use std::fmt;

use helium_core::{Derived, EmitError, Listener, Observable, ObservableExt, Store, Subscription};
use helium_dom::{Event, EventListener, Node, event_listener};

/// What a dynamic source emits into the DOM.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Empty,
    Text(String),
    Node(Node),
    List(Vec<Part>),
}

impl Part {
    pub fn kind(&self) -> &'static str {
        match self {
            Part::Empty => "empty",
            Part::Text(_) => "text",
            Part::Node(_) => "node",
            Part::List(_) => "list",
        }
    }
}

/// A source of [`Part`]s. Any observable whose items convert into a `Part`
/// can be turned into one.
#[derive(Clone)]
pub struct Dynamic(Derived<Part>);

impl Dynamic {
    pub fn new<T, O>(source: O) -> Self
    where
        T: Into<Part> + Clone + 'static,
        O: ObservableExt<T>,
    {
        Dynamic(source.map(|value: &T| -> Part { value.clone().into() }))
    }
}

impl From<Derived<Part>> for Dynamic {
    fn from(source: Derived<Part>) -> Self {
        Dynamic(source)
    }
}

impl Observable<Part> for Dynamic {
    fn watch(&self, listener: Listener<Part>) -> Result<Subscription, EmitError> {
        self.0.watch(listener)
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dynamic")
    }
}

/// A runtime value for one slot of a template.
#[derive(Clone)]
pub enum Value {
    Empty,
    Text(String),
    Node(Node),
    Listener(EventListener),
    Dynamic(Dynamic),
    List(Vec<Value>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Text(_) => "text",
            Value::Node(_) => "node",
            Value::Listener(_) => "listener",
            Value::Dynamic(_) => "dynamic",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => f.write_str("Empty"),
            Value::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Value::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Value::Listener(_) => f.write_str("Listener"),
            Value::Dynamic(_) => f.write_str("Dynamic"),
            Value::List(values) => f.debug_tuple("List").field(values).finish(),
        }
    }
}

/// An event listener value, for `on*` attributes.
pub fn on(f: impl Fn(&Event) + 'static) -> Value {
    Value::Listener(event_listener(f))
}

macro_rules! impl_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Part {
                fn from(value: $ty) -> Self {
                    Part::Text(value.to_string())
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Text(value.to_string())
                }
            }
        )*
    };
}

impl_from_display!(
    &str, String, char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
    f32, f64
);

impl From<Node> for Part {
    fn from(node: Node) -> Self {
        Part::Node(node)
    }
}

impl<T: Into<Part>> From<Option<T>> for Part {
    fn from(value: Option<T>) -> Self {
        value.map_or(Part::Empty, Into::into)
    }
}

impl<T: Into<Part>> From<Vec<T>> for Part {
    fn from(values: Vec<T>) -> Self {
        Part::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        Value::Node(node.clone())
    }
}

impl From<EventListener> for Value {
    fn from(listener: EventListener) -> Self {
        Value::Listener(listener)
    }
}

impl From<Dynamic> for Value {
    fn from(source: Dynamic) -> Self {
        Value::Dynamic(source)
    }
}

impl<T: Into<Part> + Clone + 'static> From<Store<T>> for Value {
    fn from(store: Store<T>) -> Self {
        Value::Dynamic(Dynamic::new::<T, _>(store))
    }
}

impl<T: Into<Part> + Clone + 'static> From<&Store<T>> for Value {
    fn from(store: &Store<T>) -> Self {
        Value::Dynamic(Dynamic::new::<T, _>(store.clone()))
    }
}

impl<T: Into<Part> + Clone + 'static> From<Derived<T>> for Value {
    fn from(source: Derived<T>) -> Self {
        Value::Dynamic(Dynamic::new::<T, _>(source))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Empty, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}
