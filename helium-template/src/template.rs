use std::fmt;

/// Element name, or the fragment sentinel: a grouping node that has no
/// element of its own and cannot carry attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Fragment,
    Element(String),
}

impl Tag {
    pub fn is_fragment(&self) -> bool {
        matches!(self, Tag::Fragment)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Tag::Fragment => None,
            Tag::Element(name) => Some(name),
        }
    }

    pub(crate) fn is_named(&self, name: &str) -> bool {
        self.name() == Some(name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Fragment => f.write_str("#fragment"),
            Tag::Element(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Literal(String), // class="app"
    Slot(usize),     // class=${value}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Text(String),
    Slot(usize),
    Node(Template),
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl From<usize> for Child {
    fn from(slot: usize) -> Self {
        Child::Slot(slot)
    }
}

impl From<Template> for Child {
    fn from(node: Template) -> Self {
        Child::Node(node)
    }
}

/// Parsed, value independent markup. Slots refer to positions in the values
/// supplied at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub tag: Tag,
    pub attributes: Vec<(String, AttrValue)>,
    pub children: Vec<Child>,
}

impl Template {
    pub fn fragment() -> Self {
        Self {
            tag: Tag::Fragment,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn element(name: impl Into<String>) -> Self {
        Self {
            tag: Tag::Element(name.into()),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: AttrValue) -> Self {
        self.set_attribute(name.to_string(), value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Setting an existing name overwrites its value in place.
    pub fn set_attribute(&mut self, name: String, value: AttrValue) {
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Every slot index referenced anywhere in this tree, in document order.
    pub fn slots(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_slots(&mut out);
        out
    }

    fn collect_slots(&self, out: &mut Vec<usize>) {
        for (_, value) in &self.attributes {
            if let AttrValue::Slot(slot) = value {
                out.push(*slot);
            }
        }
        for child in &self.children {
            match child {
                Child::Slot(slot) => out.push(*slot),
                Child::Node(node) => node.collect_slots(out),
                Child::Text(_) => {}
            }
        }
    }
}
