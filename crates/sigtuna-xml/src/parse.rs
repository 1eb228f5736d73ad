#![forbid(unsafe_code)]

//! Parsing XML text into the owned tree.
//!
//! roxmltree does the syntax work; conversion into [`XmlNode`] drops
//! whitespace-only text between element children (the tree model keeps
//! text and element children mutually exclusive) and rejects significant
//! mixed content. Comments and processing instructions are not retained.

use crate::tree::{Namespace, XmlNode, XmlTree};
use sigtuna_core::{Error, Result};

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

impl XmlTree {
    /// Parse an XML document. Fails with [`Error::MalformedXml`] when the
    /// source is not well-formed or has no root element.
    pub fn parse(source: &str) -> Result<XmlTree> {
        let doc =
            roxmltree::Document::parse(source).map_err(|e| Error::MalformedXml(e.to_string()))?;
        let root = convert(doc.root_element())?;
        Ok(XmlTree::from_root(root))
    }
}

fn convert(node: roxmltree::Node<'_, '_>) -> Result<XmlNode> {
    let tag = node.tag_name().name().to_owned();

    let namespace = node.tag_name().namespace().map(|uri| Namespace {
        uri: uri.to_owned(),
        prefix: prefix_for(&node, uri),
    });

    let mut attributes = Vec::new();
    for attr in node.attributes() {
        let name = match attr.namespace() {
            Some(uri) => match prefix_for(&node, uri) {
                Some(p) => format!("{p}:{}", attr.name()),
                None => attr.name().to_owned(),
            },
            None => attr.name().to_owned(),
        };
        attributes.push((name, attr.value().to_owned()));
    }

    let mut children = Vec::new();
    let mut text_parts: Vec<&str> = Vec::new();
    for child in node.children() {
        match child.node_type() {
            roxmltree::NodeType::Element => children.push(convert(child)?),
            roxmltree::NodeType::Text => {
                if let Some(t) = child.text() {
                    text_parts.push(t);
                }
            }
            _ => {}
        }
    }

    let text = if children.is_empty() {
        if text_parts.is_empty() {
            None
        } else {
            Some(text_parts.concat())
        }
    } else {
        if text_parts.iter().any(|t| !t.trim().is_empty()) {
            return Err(Error::MalformedXml(format!(
                "mixed content in <{tag}> is not supported"
            )));
        }
        None
    };

    Ok(XmlNode {
        tag,
        namespace,
        attributes,
        children,
        text,
    })
}

/// Find the prefix a namespace URI is bound to at this node.
fn prefix_for(node: &roxmltree::Node<'_, '_>, uri: &str) -> Option<String> {
    if uri == XML_NS {
        return Some("xml".to_owned());
    }
    node.namespaces()
        .find(|d| d.uri() == uri)
        .and_then(|d| d.name())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let tree = XmlTree::parse(r#"<Invoice ID="F1"><Total>1000</Total></Invoice>"#).unwrap();
        let root = tree.root();
        assert_eq!(root.tag, "Invoice");
        assert_eq!(root.attr("ID"), Some("F1"));
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].text.as_deref(), Some("1000"));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            XmlTree::parse("<a><b></a>"),
            Err(Error::MalformedXml(_))
        ));
        assert!(matches!(XmlTree::parse(""), Err(Error::MalformedXml(_))));
    }

    #[test]
    fn test_parse_drops_inter_element_whitespace() {
        let tree = XmlTree::parse("<a>\n  <b>x</b>\n  <c/>\n</a>").unwrap();
        let root = tree.root();
        assert_eq!(root.children.len(), 2);
        assert!(root.text.is_none());
    }

    #[test]
    fn test_parse_rejects_mixed_content() {
        let err = XmlTree::parse("<a>hello<b/></a>").unwrap_err();
        assert!(matches!(err, Error::MalformedXml(_)));
    }

    #[test]
    fn test_parse_namespaces() {
        let tree = XmlTree::parse(
            r#"<ds:Signature xmlns:ds="http://www.w3.org/2000/09/xmldsig#"><ds:SignedInfo/></ds:Signature>"#,
        )
        .unwrap();
        let root = tree.root();
        assert_eq!(root.tag, "Signature");
        let ns = root.namespace.as_ref().unwrap();
        assert_eq!(ns.uri, "http://www.w3.org/2000/09/xmldsig#");
        assert_eq!(ns.prefix.as_deref(), Some("ds"));
        assert_eq!(root.children[0].tag, "SignedInfo");
    }

    #[test]
    fn test_parse_default_namespace() {
        let tree =
            XmlTree::parse(r#"<Signature xmlns="http://www.w3.org/2000/09/xmldsig#"/>"#).unwrap();
        let ns = tree.root().namespace.as_ref().unwrap();
        assert_eq!(ns.uri, "http://www.w3.org/2000/09/xmldsig#");
        assert!(ns.prefix.is_none());
    }

    #[test]
    fn test_parse_entity_decoding() {
        let tree = XmlTree::parse("<a>x &amp; y &lt; z</a>").unwrap();
        assert_eq!(tree.root().text.as_deref(), Some("x & y < z"));
    }
}
