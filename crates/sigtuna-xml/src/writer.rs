#![forbid(unsafe_code)]

//! Serialization of the owned tree back to XML text.
//!
//! Output is compact (no pretty-printing): the tree model drops
//! whitespace-only text between elements, and digests never depend on
//! inter-tag formatting.

use crate::tree::{XmlNode, XmlTree};
use std::collections::HashMap;

/// Serialize a whole document with the XML declaration.
pub fn serialize_document(tree: &XmlTree) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n");
    write_node(tree.root(), &HashMap::new(), &mut out);
    out
}

/// Serialize a subtree as a fragment, without the declaration.
pub fn serialize_node(node: &XmlNode) -> String {
    let mut out = String::new();
    write_node(node, &HashMap::new(), &mut out);
    out
}

fn write_node(node: &XmlNode, inherited: &HashMap<String, String>, out: &mut String) {
    let name = node.qualified_name();
    out.push('<');
    out.push_str(&name);

    // Namespace declaration, where the binding changes from the inherited scope.
    let mut scope = inherited.clone();
    match &node.namespace {
        Some(ns) => {
            let key = ns.prefix.clone().unwrap_or_default();
            if scope.get(&key).map(String::as_str) != Some(ns.uri.as_str()) {
                if key.is_empty() {
                    out.push_str(" xmlns=\"");
                } else {
                    out.push_str(" xmlns:");
                    out.push_str(&key);
                    out.push_str("=\"");
                }
                out.push_str(&escape_attr(&ns.uri));
                out.push('"');
                scope.insert(key, ns.uri.clone());
            }
        }
        None => {
            // Undeclare an inherited default namespace for unqualified elements.
            if scope.get("").is_some_and(|u| !u.is_empty()) {
                out.push_str(" xmlns=\"\"");
                scope.insert(String::new(), String::new());
            }
        }
    }

    for (attr_name, attr_value) in &node.attributes {
        out.push(' ');
        out.push_str(attr_name);
        out.push_str("=\"");
        out.push_str(&escape_attr(attr_value));
        out.push('"');
    }

    if node.children.is_empty() && node.text.as_deref().unwrap_or("").is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    if let Some(text) = &node.text {
        out.push_str(&escape_text(text));
    }
    for child in &node.children {
        write_node(child, &scope, out);
    }
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::XmlTree;

    #[test]
    fn test_serialize_document_declaration() {
        let tree = XmlTree::parse("<a><b>x</b></a>").unwrap();
        assert_eq!(
            tree.serialize(),
            "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<a><b>x</b></a>"
        );
    }

    #[test]
    fn test_serialize_fragment_without_declaration() {
        let tree = XmlTree::parse("<a><b>x</b></a>").unwrap();
        assert_eq!(serialize_node(tree.root()), "<a><b>x</b></a>");
    }

    #[test]
    fn test_serialize_empty_element() {
        let tree = XmlTree::parse("<a><b/></a>").unwrap();
        assert_eq!(serialize_node(tree.root()), "<a><b/></a>");
    }

    #[test]
    fn test_serialize_escapes() {
        let tree = XmlTree::parse(r#"<a q="x&quot;y">1 &lt; 2 &amp; 3</a>"#).unwrap();
        assert_eq!(
            serialize_node(tree.root()),
            r#"<a q="x&quot;y">1 &lt; 2 &amp; 3</a>"#
        );
    }

    #[test]
    fn test_serialize_prefixed_namespace_roundtrip() {
        let source = r#"<f:r xmlns:f="urn:f"><f:c>1</f:c></f:r>"#;
        let tree = XmlTree::parse(source).unwrap();
        assert_eq!(serialize_node(tree.root()), source);
    }

    #[test]
    fn test_serialize_default_namespace_roundtrip() {
        let source = r#"<r xmlns="urn:r"><c>1</c></r>"#;
        let tree = XmlTree::parse(source).unwrap();
        assert_eq!(serialize_node(tree.root()), source);
    }

    #[test]
    fn test_reparse_equals_original_tree() {
        let source = r#"<Batch><Invoice ID="A"><Total>10</Total></Invoice></Batch>"#;
        let tree = XmlTree::parse(source).unwrap();
        let again = XmlTree::parse(&tree.serialize()).unwrap();
        assert_eq!(tree, again);
    }
}
