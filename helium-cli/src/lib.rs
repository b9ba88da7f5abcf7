use anyhow::{Context, Result};
use helium_dom::Namespace;
use helium_renderer::{Value, render_template};
use helium_template::{Template, parse_template};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Split template source on `${…}` markers. The text between markers becomes
/// the chunks; every marker is one slot. An unterminated `${` is kept as text.
pub fn split_template(src: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = src;
    let mut start = 0;
    let mut offset = 0;
    while let Some(open) = rest.find("${") {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        chunks.push(&src[start..offset + open]);
        let consumed = open + close + 1;
        offset += consumed;
        start = offset;
        rest = &rest[consumed..];
    }
    chunks.push(&src[start..]);
    chunks
}

pub fn parse_source(src: &str) -> Result<Template> {
    let chunks = split_template(src);
    debug!(chunks = chunks.len(), "parsing template");
    parse_template(&chunks).context("failed to parse template")
}

/// Render template source, filling slot `i` with `values[i]`. Slots without a
/// value render as empty.
pub fn render_source(src: &str, values: &[String], namespace: Namespace) -> Result<String> {
    let template = parse_source(src)?;
    let slots = template.slots().into_iter().max().map_or(0, |max| max + 1);
    let values: Vec<Value> = (0..slots)
        .map(|i| values.get(i).map_or(Value::Empty, |v| Value::from(v.as_str())))
        .collect();
    // render errors may carry listener errors, which are not Send
    let node = render_template(&template, &values, namespace)
        .map_err(|e| anyhow::anyhow!("failed to render template: {e}"))?;
    Ok(node.outer_html())
}

/// Surrounding whitespace is dropped so a trailing newline does not become
/// a second root.
fn read_source(input: &Path) -> Result<String> {
    let src = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    Ok(src.trim().to_string())
}

/// Parse a template file and return its structural tree in debug form.
pub fn parse_cmd(input: &Path) -> Result<String> {
    let src = read_source(input)?;
    let template = parse_source(&src)?;
    Ok(format!("{template:#?}"))
}

/// Render a template file to markup.
pub fn render_cmd(input: &Path, values: &[String], svg: bool) -> Result<String> {
    let src = read_source(input)?;
    let namespace = if svg { Namespace::Svg } else { Namespace::Html };
    render_source(&src, values, namespace)
}
