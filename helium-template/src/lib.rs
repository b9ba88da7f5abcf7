pub mod cache;
pub mod error;
pub mod parser;
pub mod template;

pub use cache::{TemplateCache, cached_template};
pub use error::ParseError;
pub use parser::{Parser, is_valid_name, parse_template};
pub use template::{AttrValue, Child, Tag, Template};
