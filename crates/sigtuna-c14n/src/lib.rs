#![forbid(unsafe_code)]

//! Canonical XML (C14N) for the Sigtuna library.
//!
//! Produces the canonical byte form of a whole document or of a subtree
//! selected by the XPath subset, and the ISO-8859-1 re-expression of it
//! that digests and signatures are computed over.

pub mod escape;
pub mod iso;
pub mod render;

use sigtuna_core::{Error, Result};
use sigtuna_xml::{xpath, XmlNode, XmlTree};

pub use iso::{flatten, iso_bytes};

/// Canonicalize a document or a selected subtree to UTF-8 bytes.
///
/// Fails with [`Error::ReferenceNotFound`] when `subtree` matches no node
/// and [`Error::AmbiguousReference`] when it matches more than one.
///
/// The `exclusive` flag is accepted for interface parity; the owned tree
/// keeps only namespace bindings in use, so inclusive and exclusive
/// canonicalization render identically for trees this model represents.
pub fn canonicalize(tree: &XmlTree, exclusive: bool, subtree: Option<&str>) -> Result<Vec<u8>> {
    let _ = exclusive;
    Ok(canonical_string(tree, subtree)?.into_bytes())
}

/// Canonicalize a single element subtree to UTF-8 bytes.
pub fn canonicalize_node(node: &XmlNode) -> Vec<u8> {
    let mut out = String::new();
    render::render_element(node, &Default::default(), &mut out);
    out.into_bytes()
}

/// Canonicalize, re-express as ISO-8859-1, and apply the entity fix.
///
/// The canonical form is inherently UTF-8; characters above U+00FF are
/// replaced with `?` during re-expression, and raw `'`/`"` in element
/// text become `&apos;`/`&quot;` (attribute values are left as C14N
/// escaped them). The result is the string digests are taken over, via
/// [`iso_bytes`].
pub fn canonicalize_iso(tree: &XmlTree, subtree: Option<&str>) -> Result<String> {
    let canonical = canonical_string(tree, subtree)?;
    Ok(iso::fix_entities(&iso::to_latin1_string(&canonical)))
}

fn canonical_string(tree: &XmlTree, subtree: Option<&str>) -> Result<String> {
    let node = match subtree {
        None => tree.root(),
        Some(expr) => {
            let selector = xpath::parse(expr)?;
            let matches = xpath::select(tree, &selector);
            match matches.len() {
                0 => return Err(Error::ReferenceNotFound(expr.to_owned())),
                1 => matches[0],
                n => {
                    return Err(Error::AmbiguousReference(format!(
                        "{expr} matched {n} nodes"
                    )))
                }
            }
        }
    };
    let mut out = String::new();
    render::render_element(node, &Default::default(), &mut out);
    Ok(out)
}
