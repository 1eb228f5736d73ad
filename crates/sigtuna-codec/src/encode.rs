#![forbid(unsafe_code)]

//! Encoding nested values into an XML tree.

use crate::value::{Value, ATTRIBUTES_KEY, VALUE_KEY};
use sigtuna_core::{Error, Result};
use sigtuna_xml::{Namespace, XmlNode, XmlTree};

/// Encode a nested map into an XML document.
///
/// The top-level value must be a map with exactly one key: the root element
/// tag. With a namespace supplied, every created element is qualified with
/// it (an empty prefix produces a default-namespace declaration on the
/// root). Attributes are never namespace-qualified.
pub fn encode(data: &Value, namespace: Option<&Namespace>) -> Result<XmlTree> {
    let map = data.as_map().ok_or_else(|| {
        Error::UnsupportedNodeValue("document encoding expects a map at the top level".into())
    })?;
    if map.len() != 1 {
        return Err(Error::UnsupportedNodeValue(format!(
            "document encoding expects a single root key, got {}",
            map.len()
        )));
    }
    let (tag, value) = map.iter().next().expect("map has one entry");
    let root = build_element(tag, value, namespace)?.ok_or_else(|| {
        Error::UnsupportedNodeValue(format!("root value for <{tag}> produces no element"))
    })?;
    Ok(XmlTree::from_root(root))
}

/// Build one element for `tag` from `value`.
///
/// Returns `None` when the value is a skip sentinel (null, false).
fn build_element(tag: &str, value: &Value, ns: Option<&Namespace>) -> Result<Option<XmlNode>> {
    let mut node = XmlNode::new(tag);
    node.namespace = ns.cloned();

    match value {
        Value::Null | Value::Bool(false) => return Ok(None),
        // `true` and `""` generate an empty element rather than being skipped.
        Value::Bool(true) => {}
        Value::String(s) => {
            if !s.is_empty() {
                node.set_text(s.clone());
            }
        }
        Value::List(_) => {
            return Err(Error::UnsupportedNodeValue(format!(
                "<{tag}>: a list cannot form a single element"
            )));
        }
        Value::Map(entries) => {
            for (key, entry) in entries {
                match key.as_str() {
                    ATTRIBUTES_KEY => apply_attributes(&mut node, entry)?,
                    VALUE_KEY => apply_text(&mut node, tag, entry)?,
                    child_tag => apply_child(&mut node, child_tag, entry, ns)?,
                }
            }
            if node.text.is_some() && !node.children.is_empty() {
                return Err(Error::UnsupportedNodeValue(format!(
                    "<{tag}> cannot carry both a text value and child elements"
                )));
            }
        }
    }

    Ok(Some(node))
}

fn apply_attributes(node: &mut XmlNode, entry: &Value) -> Result<()> {
    let attrs = entry.as_map().ok_or_else(|| {
        Error::UnsupportedNodeValue(format!(
            "{ATTRIBUTES_KEY} on <{}> must be a flat map",
            node.tag
        ))
    })?;
    for (name, value) in attrs {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            _ => {
                return Err(Error::UnsupportedNodeValue(format!(
                    "attribute {name} on <{}> must be a scalar",
                    node.tag
                )));
            }
        };
        node.set_attr(name.clone(), text);
    }
    Ok(())
}

fn apply_text(node: &mut XmlNode, tag: &str, entry: &Value) -> Result<()> {
    match entry {
        // Skip sentinels leave the element empty.
        Value::Null | Value::Bool(_) => {}
        Value::String(s) => {
            if !s.is_empty() {
                node.set_text(s.clone());
            }
        }
        _ => {
            return Err(Error::UnsupportedNodeValue(format!(
                "{VALUE_KEY} on <{tag}> must be a scalar"
            )));
        }
    }
    Ok(())
}

fn apply_child(
    parent: &mut XmlNode,
    tag: &str,
    entry: &Value,
    ns: Option<&Namespace>,
) -> Result<()> {
    match entry {
        Value::Map(m) if m.is_empty() => {}
        Value::Map(_) => {
            if let Some(child) = build_element(tag, entry, ns)? {
                parent.append_child(child);
            }
        }
        Value::List(items) => {
            // Each item becomes a sibling ("twin") element with the same
            // tag, in list order. Items must be associative records.
            for item in items {
                if !matches!(item, Value::Map(_)) {
                    return Err(Error::UnsupportedNodeValue(format!(
                        "<{tag}> sibling entries must be associative records"
                    )));
                }
                if let Some(child) = build_element(tag, item, ns)? {
                    parent.append_child(child);
                }
            }
        }
        scalar => {
            if let Some(child) = build_element(tag, scalar, ns)? {
                parent.append_child(child);
            }
        }
    }
    Ok(())
}
