#![forbid(unsafe_code)]

//! Decoding an XML node back into the nested value model.

use crate::value::{Value, ATTRIBUTES_KEY, VALUE_KEY};
use indexmap::IndexMap;
use sigtuna_xml::XmlNode;

/// Decode an element into a map keyed by its local tag name.
///
/// Children sharing a tag collect into an ordered list under that key.
/// With `twins_as_array` a single occurrence is still wrapped in a
/// one-element list; otherwise it is flattened to its scalar or map form.
pub fn decode(node: &XmlNode, twins_as_array: bool) -> Value {
    let mut map = IndexMap::new();
    map.insert(node.tag.clone(), decode_inner(node, twins_as_array));
    Value::Map(map)
}

fn decode_inner(node: &XmlNode, twins_as_array: bool) -> Value {
    if node.children.is_empty() {
        let text = Value::String(node.text.clone().unwrap_or_default());
        if node.attributes.is_empty() {
            return text;
        }
        let mut map = IndexMap::new();
        map.insert(ATTRIBUTES_KEY.to_owned(), attributes_value(node));
        map.insert(VALUE_KEY.to_owned(), text);
        return Value::Map(map);
    }

    let mut map = IndexMap::new();
    if !node.attributes.is_empty() {
        map.insert(ATTRIBUTES_KEY.to_owned(), attributes_value(node));
    }

    let mut grouped: IndexMap<String, Vec<Value>> = IndexMap::new();
    for child in &node.children {
        grouped
            .entry(child.tag.clone())
            .or_default()
            .push(decode_inner(child, twins_as_array));
    }
    for (tag, mut items) in grouped {
        let value = if items.len() == 1 && !twins_as_array {
            items.pop().expect("single item")
        } else {
            Value::List(items)
        };
        map.insert(tag, value);
    }
    Value::Map(map)
}

fn attributes_value(node: &XmlNode) -> Value {
    Value::Map(
        node.attributes
            .iter()
            .map(|(n, v)| (n.clone(), Value::String(v.clone())))
            .collect(),
    )
}
