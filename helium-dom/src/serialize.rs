use crate::{Node, NodeKind};

pub(crate) fn write_node(node: &Node, out: &mut String) {
    match node.kind() {
        NodeKind::Text => escape_into(&node.text_content(), false, out),
        NodeKind::Comment => {
            out.push_str("<!--");
            out.push_str(&node.text_content());
            out.push_str("-->");
        }
        NodeKind::Fragment => {
            for child in node.children() {
                write_node(&child, out);
            }
        }
        NodeKind::Element { tag, .. } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in node.attributes() {
                out.push(' ');
                out.push_str(&name);
                out.push_str("=\"");
                escape_into(&value, true, out);
                out.push('"');
            }
            out.push('>');
            for child in node.children() {
                write_node(&child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn escape_into(s: &str, attribute: bool, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Namespace, Node};

    #[test]
    fn escapes_text_and_attributes() {
        let p = Node::element(Namespace::Html, "p");
        p.set_attribute("title", "say \"hi\" & <go>");
        p.append_child(&Node::text("1 < 2 & 3 > 2"));
        assert_eq!(
            p.outer_html(),
            r#"<p title="say &quot;hi&quot; &amp; <go>">1 &lt; 2 &amp; 3 &gt; 2</p>"#
        );
    }

    #[test]
    fn comments_and_fragments() {
        let frag = Node::fragment();
        frag.append_child(&Node::comment("content placeholder"));
        frag.append_child(&Node::text("x"));
        assert_eq!(frag.outer_html(), "<!--content placeholder-->x");
    }
}
