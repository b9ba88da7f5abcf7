//! Turns markup templates into live DOM.
//!
//! A template is a list of static chunks with a value slot between each
//! pair. Chunks are parsed once per call site and cached; every render
//! builds fresh nodes from the cached tree and the values given.
//!
//! ```ignore
//! let count = Store::new(0);
//! let node = html!(["<p>Count: ", "</p>"], &count)?;
//! count.update(1)?;
//! assert_eq!(node.outer_html(), "<p>Count: 1</p>");
//! ```

use helium_dom::Namespace;
use helium_template::cached_template;

mod binding;
pub mod children;
pub mod error;
pub mod render;
pub mod swap;
pub mod value;

pub use children::{children, keyed_children};
pub use error::RenderError;
pub use helium_dom::Node;
pub use render::render_template;
pub use swap::{SwapEntry, element_swap};
pub use value::{Dynamic, Part, Value, on};

/// Parse `chunks` (once per chunk array) and render them with `values`.
pub fn helium(
    chunks: &'static [&'static str],
    values: Vec<Value>,
    namespace: Namespace,
) -> Result<Node, RenderError> {
    let template = cached_template(chunks)?;
    render_template(&template, &values, namespace)
}

pub fn html(chunks: &'static [&'static str], values: Vec<Value>) -> Result<Node, RenderError> {
    helium(chunks, values, Namespace::Html)
}

pub fn svg(chunks: &'static [&'static str], values: Vec<Value>) -> Result<Node, RenderError> {
    helium(chunks, values, Namespace::Svg)
}

/// `html!(["<p>", "</p>"], value)`: render HTML markup, one value per gap
/// between chunks. Each call site parses its chunks only once.
#[macro_export]
macro_rules! html {
    ([$($chunk:literal),* $(,)?] $(, $value:expr)* $(,)?) => {{
        static CHUNKS: &[&str] = &[$($chunk),*];
        $crate::html(CHUNKS, vec![$($crate::Value::from($value)),*])
    }};
}

/// Like [`html!`], with elements created in the SVG namespace.
#[macro_export]
macro_rules! svg {
    ([$($chunk:literal),* $(,)?] $(, $value:expr)* $(,)?) => {{
        static CHUNKS: &[&str] = &[$($chunk),*];
        $crate::svg(CHUNKS, vec![$($crate::Value::from($value)),*])
    }};
}
