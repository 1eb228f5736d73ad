#![forbid(unsafe_code)]

//! Minimal XPath subset used for reference resolution.
//!
//! Only the two patterns the signature layer needs:
//! - `//Name` — descendant-or-self elements by local name
//! - `//*[@Attr="value"]` — elements carrying a matching attribute
//!   (single quotes are accepted too)

use crate::tree::{XmlNode, XmlTree};
use sigtuna_core::{Error, Result};

/// A parsed selector expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    LocalName(String),
    AttrEquals { name: String, value: String },
}

/// Parse a selector expression from the supported XPath subset.
pub fn parse(expr: &str) -> Result<Selector> {
    if let Some(rest) = expr.strip_prefix("//*[@") {
        let rest = rest
            .strip_suffix(']')
            .ok_or_else(|| unsupported(expr))?;
        let eq = rest.find('=').ok_or_else(|| unsupported(expr))?;
        let name = &rest[..eq];
        let quoted = &rest[eq + 1..];
        let value = quoted
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| quoted.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .ok_or_else(|| unsupported(expr))?;
        if name.is_empty() {
            return Err(unsupported(expr));
        }
        return Ok(Selector::AttrEquals {
            name: name.to_owned(),
            value: value.to_owned(),
        });
    }
    if let Some(name) = expr.strip_prefix("//") {
        if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Ok(Selector::LocalName(name.to_owned()));
        }
    }
    Err(unsupported(expr))
}

fn unsupported(expr: &str) -> Error {
    Error::Other(format!("unsupported XPath expression: {expr}"))
}

/// Evaluate a selector against a tree, in document order.
pub fn select<'a>(tree: &'a XmlTree, selector: &Selector) -> Vec<&'a XmlNode> {
    match selector {
        Selector::LocalName(tag) => tree.find_by_local_name(tag),
        Selector::AttrEquals { name, value } => tree.find_by_attr(name, value),
    }
}

/// Parse a same-document URI reference (`#foo` → `foo`).
pub fn parse_same_document_ref(uri: &str) -> Option<&str> {
    uri.strip_prefix('#')
}
