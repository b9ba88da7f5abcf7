pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Namespace an element is created in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
}

impl Namespace {
    pub fn uri(self) -> &'static str {
        match self {
            Namespace::Html => HTML_NAMESPACE,
            Namespace::Svg => SVG_NAMESPACE,
        }
    }

    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            HTML_NAMESPACE => Some(Namespace::Html),
            SVG_NAMESPACE => Some(Namespace::Svg),
            _ => None,
        }
    }
}
