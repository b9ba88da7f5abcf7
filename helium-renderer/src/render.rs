use helium_dom::{Namespace, Node};
use helium_template::{AttrValue, Child, Tag, Template};

use crate::binding::{PLACEHOLDER, bind_attribute, bind_children};
use crate::error::RenderError;
use crate::value::Value;

/// Build DOM for `template`, filling its slots from `values`.
///
/// Elements are created in `namespace`; a fragment template gives a
/// fragment node. Dynamic values stay bound to the returned nodes for as
/// long as those nodes live.
pub fn render_template(
    template: &Template,
    values: &[Value],
    namespace: Namespace,
) -> Result<Node, RenderError> {
    let node = match &template.tag {
        Tag::Fragment => Node::fragment(),
        Tag::Element(name) => Node::element(namespace, name.as_str()),
    };

    for child in &template.children {
        match child {
            Child::Text(text) => node.append_child(&Node::text(text.as_str())),
            Child::Node(nested) => node.append_child(&render_template(nested, values, namespace)?),
            Child::Slot(slot) => insert_value(&node, slot_value(values, *slot)?, *slot)?,
        }
    }

    if template.attributes.is_empty() {
        return Ok(node);
    }
    if node.is_fragment() {
        return Err(RenderError::FragmentAttributes);
    }
    for (name, value) in &template.attributes {
        match value {
            AttrValue::Literal(text) => node.set_attribute(name, text),
            AttrValue::Slot(slot) => apply_attribute(&node, name, slot_value(values, *slot)?)?,
        }
    }

    Ok(node)
}

fn slot_value(values: &[Value], slot: usize) -> Result<&Value, RenderError> {
    values.get(slot).ok_or(RenderError::MissingValue { slot })
}

fn insert_value(parent: &Node, value: &Value, slot: usize) -> Result<(), RenderError> {
    match value {
        Value::Empty => {}
        Value::Text(text) => parent.append_child(&Node::text(text.as_str())),
        // a fragment hands over its children
        Value::Node(node) => parent.append_child(node),
        Value::Dynamic(source) => {
            let placeholder = Node::comment(PLACEHOLDER);
            parent.append_child(&placeholder);
            bind_children(parent, &placeholder, source)?;
        }
        Value::List(values) => {
            for value in values {
                insert_value(parent, value, slot)?;
            }
        }
        Value::Listener(_) => return Err(RenderError::ListenerAsChild { slot }),
    }
    Ok(())
}

fn apply_attribute(element: &Node, name: &str, value: &Value) -> Result<(), RenderError> {
    if let Some(event) = name.strip_prefix("on").filter(|event| !event.is_empty()) {
        return match value {
            Value::Listener(listener) => {
                element.add_event_listener(event, listener.clone());
                Ok(())
            }
            other => Err(RenderError::ListenerExpected {
                name: name.to_string(),
                found: other.kind(),
            }),
        };
    }

    match value {
        Value::Empty => Ok(()),
        Value::Text(text) => {
            element.set_attribute(name, text);
            Ok(())
        }
        Value::Dynamic(source) => bind_attribute(element, name, source),
        Value::Listener(_) => Err(RenderError::ListenerOnPlainAttribute {
            name: name.to_string(),
        }),
        other => Err(RenderError::NonPrimitiveAttribute {
            name: name.to_string(),
            kind: other.kind(),
        }),
    }
}
