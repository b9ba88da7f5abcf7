use tracing::{debug, warn};

use crate::error::ParseError;
use crate::template::{AttrValue, Child, Template};

/// Remaining input of the chunk being parsed.
struct Buffer<'a> {
    rest: &'a str,
}

impl<'a> Buffer<'a> {
    fn new(src: &'a str) -> Self {
        Self { rest: src }
    }

    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.rest = &self.rest[ch.len_utf8()..];
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.rest = &self.rest[expected.len_utf8()..];
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let end = self.rest.find(|c: char| !pred(c)).unwrap_or(self.rest.len());
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        head
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }
}

/// Incremental markup parser.
///
/// Text arrives in chunks, each optionally followed by a slot. A slot at the
/// end of a chunk is a child reference, unless the chunk ended inside a start
/// tag right after `name=`, in which case it becomes that attribute's value.
/// Parsing of the start tag then resumes with the next chunk.
///
/// The stack holds the open elements, innermost last, with the root fragment
/// at the bottom. A node is attached to its parent when it is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Parser {
    slot: Option<usize>,
    stack: Vec<Template>,
    attribute_mode: bool,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            slot: None,
            stack: vec![Template::fragment()],
            attribute_mode: false,
        }
    }

    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    /// True while a start tag is still open across a chunk boundary.
    pub fn is_attribute_mode(&self) -> bool {
        self.attribute_mode
    }

    /// Open nodes, root fragment first.
    pub fn open_nodes(&self) -> &[Template] {
        &self.stack
    }

    pub fn parse_chunk(&mut self, text: &str, slot: Option<usize>) -> Result<(), ParseError> {
        self.slot = slot;
        let mut buffer = Buffer::new(text);
        if self.attribute_mode {
            self.parse_attributes(&mut buffer)?;
        }
        while !buffer.is_empty() {
            self.parse_node(&mut buffer)?;
        }
        if !self.attribute_mode {
            if let Some(slot) = self.slot {
                self.append_child(Child::Slot(slot))?;
            }
        }
        Ok(())
    }

    /// Finish parsing. Open elements are closed implicitly. A root fragment
    /// holding exactly one element is unwrapped to that element.
    pub fn close(mut self) -> Result<Template, ParseError> {
        if self.attribute_mode {
            return Err(ParseError::UnterminatedStartTag);
        }
        if self.stack.len() > 1 {
            debug!(open = self.stack.len() - 1, "implicitly closing open elements");
        }
        while self.stack.len() > 1 {
            self.pop_node();
        }
        let mut root = self.stack.pop().ok_or(ParseError::EmptyStack)?;

        if root.tag.is_fragment() && matches!(root.children.as_slice(), [Child::Node(_)]) {
            if let Some(Child::Node(only)) = root.children.pop() {
                return Ok(only);
            }
        }
        Ok(root)
    }

    fn top(&mut self) -> Result<&mut Template, ParseError> {
        self.stack.last_mut().ok_or(ParseError::EmptyStack)
    }

    fn append_child(&mut self, child: Child) -> Result<(), ParseError> {
        self.top()?.children.push(child);
        Ok(())
    }

    /// Close the innermost open node. The root is never popped here.
    fn pop_node(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(node) = self.stack.pop() {
            if let Some(parent) = self.stack.last_mut() {
                parent.children.push(Child::Node(node));
            }
        }
    }

    fn parse_node(&mut self, buffer: &mut Buffer<'_>) -> Result<(), ParseError> {
        if buffer.eat('<') {
            self.parse_tag(buffer)
        } else {
            self.parse_text(buffer)
        }
    }

    fn parse_tag(&mut self, buffer: &mut Buffer<'_>) -> Result<(), ParseError> {
        if buffer.eat('/') {
            self.parse_closing_tag(buffer)
        } else {
            self.parse_opening_tag(buffer)
        }
    }

    fn parse_opening_tag(&mut self, buffer: &mut Buffer<'_>) -> Result<(), ParseError> {
        let name = read_label(buffer)?;
        self.stack.push(Template::element(name));
        // the element may or may not be closed when this returns
        self.parse_attributes(buffer)
    }

    fn parse_closing_tag(&mut self, buffer: &mut Buffer<'_>) -> Result<(), ParseError> {
        let name = read_label(buffer)?;
        let top = self.stack.last().ok_or(ParseError::EmptyStack)?;

        if top.tag.is_named(name) {
            self.pop_node();
        } else {
            warn!(tag = name, context = %top.tag, "unmatched closing tag");
            // Close through the nearest open element with this name, like an
            // HTML parser recovering from a forgotten end tag:
            //
            //   <a><b><c><d></b>   stack [a b c d] -> [a]
            //
            // With no such element the closing tag is ignored.
            if let Some(depth) = self.stack.iter().rposition(|n| n.tag.is_named(name)) {
                while self.stack.len() > depth {
                    self.pop_node();
                }
            }
        }

        buffer.skip_whitespace();
        match buffer.bump() {
            Some('>') => Ok(()),
            None => Err(ParseError::UnexpectedEnd { expected: "'>'" }),
            Some(found) => Err(ParseError::UnexpectedChar {
                expected: "'>'",
                found,
            }),
        }
    }

    fn parse_attributes(&mut self, buffer: &mut Buffer<'_>) -> Result<(), ParseError> {
        loop {
            buffer.skip_whitespace();
            if matches!(buffer.peek(), Some('/' | '>')) {
                break;
            }
            if buffer.is_empty() {
                if self.slot.is_some() {
                    return Err(ParseError::VariableAttributeName);
                }
                break;
            }

            let name = read_label(buffer)?;
            if self.slot.is_some() && buffer.is_empty() {
                return Err(ParseError::ExpectedEquals {
                    name: name.to_string(),
                });
            }

            let value = if buffer.eat('=') {
                self.attribute_value(buffer)?
            } else {
                AttrValue::Literal(String::new())
            };
            let took_slot = matches!(value, AttrValue::Slot(_));
            self.top()?.set_attribute(name.to_string(), value);

            if buffer.is_empty() {
                // a slot after a complete attribute would be an attribute name
                if self.slot.is_some() && !took_slot {
                    return Err(ParseError::VariableAttributeName);
                }
                break;
            }
        }

        if self.slot.is_some() && buffer.is_empty() {
            self.attribute_mode = true;
            return Ok(());
        }
        self.attribute_mode = false;

        if buffer.eat('/') {
            self.pop_node();
        }

        match buffer.bump() {
            Some('>') => Ok(()),
            None => Err(ParseError::UnexpectedEnd {
                expected: "'>' or '/>'",
            }),
            Some(found) => Err(ParseError::UnexpectedChar {
                expected: "'>'",
                found,
            }),
        }
    }

    fn attribute_value(&self, buffer: &mut Buffer<'_>) -> Result<AttrValue, ParseError> {
        match buffer.bump() {
            // chunk ends right after `=`: the value is the pending slot
            None => self
                .slot
                .map(AttrValue::Slot)
                .ok_or(ParseError::UnexpectedEnd { expected: "'\"'" }),
            Some(quote @ ('"' | '\'')) => {
                let value = buffer.take_while(|c| c != quote);
                if !buffer.eat(quote) {
                    return Err(ParseError::UnterminatedAttributeValue { quote });
                }
                Ok(AttrValue::Literal(value.to_string()))
            }
            Some(found) => Err(ParseError::UnexpectedChar {
                expected: "'\"'",
                found,
            }),
        }
    }

    fn parse_text(&mut self, buffer: &mut Buffer<'_>) -> Result<(), ParseError> {
        let text = buffer.take_while(|c| c != '<');
        if text.is_empty() {
            return Ok(());
        }
        self.append_child(Child::Text(text.to_string()))
    }
}

/// Names are ASCII alphanumeric runs joined by single dashes.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .split('-')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn read_label<'a>(buffer: &mut Buffer<'a>) -> Result<&'a str, ParseError> {
    let label = buffer.take_while(|c| c.is_ascii_alphanumeric() || c == '-');
    if label.is_empty() {
        return Err(ParseError::MissingName);
    }
    if !is_valid_name(label) {
        return Err(ParseError::InvalidName(label.to_string()));
    }
    Ok(label)
}

/// Parse the static chunks of one template. Chunk `i` is followed by slot
/// `i`, except the last chunk which has no slot after it.
pub fn parse_template(chunks: &[&str]) -> Result<Template, ParseError> {
    let mut parser = Parser::new();
    let last = chunks.len().saturating_sub(1);
    for (i, chunk) in chunks.iter().enumerate() {
        parser.parse_chunk(chunk, (i < last).then_some(i))?;
    }
    parser.close()
}
