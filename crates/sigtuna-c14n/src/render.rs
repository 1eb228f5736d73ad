#![forbid(unsafe_code)]

//! Canonical element rendering: namespace declarations before attributes,
//! attributes sorted, empty elements written as start/end pairs.

use crate::escape;
use sigtuna_xml::XmlNode;
use std::collections::BTreeMap;

/// A namespace declaration pending output.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NsDecl {
    /// "" for the default namespace.
    prefix: String,
    uri: String,
}

impl NsDecl {
    fn render(&self, out: &mut String) {
        if self.prefix.is_empty() {
            out.push_str(" xmlns=\"");
        } else {
            out.push_str(" xmlns:");
            out.push_str(&self.prefix);
            out.push_str("=\"");
        }
        out.push_str(&escape::escape_attr(&self.uri));
        out.push('"');
    }
}

impl Ord for NsDecl {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Default namespace first, then by prefix.
        match (self.prefix.is_empty(), other.prefix.is_empty()) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => self.prefix.cmp(&other.prefix),
        }
    }
}

impl PartialOrd for NsDecl {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Render one element and its subtree in canonical form.
///
/// `inherited` maps prefix ("" = default) to the namespace URI in scope at
/// the parent; a subtree rendered standalone starts from an empty scope and
/// therefore re-declares the bindings it uses.
pub fn render_element(node: &XmlNode, inherited: &BTreeMap<String, String>, out: &mut String) {
    let name = node.qualified_name();

    let mut scope = inherited.clone();
    let mut ns_decls: Vec<NsDecl> = Vec::new();
    match &node.namespace {
        Some(ns) => {
            let prefix = ns.prefix.clone().unwrap_or_default();
            if scope.get(&prefix).map(String::as_str) != Some(ns.uri.as_str()) {
                ns_decls.push(NsDecl {
                    prefix: prefix.clone(),
                    uri: ns.uri.clone(),
                });
                scope.insert(prefix, ns.uri.clone());
            }
        }
        None => {
            if scope.get("").is_some_and(|u| !u.is_empty()) {
                ns_decls.push(NsDecl {
                    prefix: String::new(),
                    uri: String::new(),
                });
                scope.insert(String::new(), String::new());
            }
        }
    }
    ns_decls.sort();

    // Unprefixed attributes sort before prefixed ones, each group
    // lexicographically by name.
    let mut attrs: Vec<&(String, String)> = node.attributes.iter().collect();
    attrs.sort_by(|(a, _), (b, _)| {
        (a.contains(':'), a.as_str()).cmp(&(b.contains(':'), b.as_str()))
    });

    out.push('<');
    out.push_str(&name);
    for decl in &ns_decls {
        decl.render(out);
    }
    for (attr_name, attr_value) in attrs {
        out.push(' ');
        out.push_str(attr_name);
        out.push_str("=\"");
        out.push_str(&escape::escape_attr(attr_value));
        out.push('"');
    }
    out.push('>');

    if let Some(text) = &node.text {
        out.push_str(&escape::escape_text(text));
    }
    for child in &node.children {
        render_element(child, &scope, out);
    }

    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}
