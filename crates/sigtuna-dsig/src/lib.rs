#![forbid(unsafe_code)]

//! XML-DSig signature generation and validation.
//!
//! [`SignatureGenerator`] digests a document (or an `ID`-referenced
//! subtree), builds a [`SignatureModel`], signs its `SignedInfo`, and
//! splices the resulting `Signature` element into the document.
//! [`SignatureValidator`] walks every `Signature` element of a document and
//! verifies each independently.

pub mod model;
pub mod reference;
pub mod sign;
pub mod verify;

use sigtuna_core::Result;
use sigtuna_xml::XmlTree;

pub use model::{KeyInfo, Reference, SignatureModel, SignedInfo, TransformAlgorithm};
pub use sign::SignatureGenerator;
pub use sigtuna_keys::Certificate;
pub use verify::SignatureValidator;

/// A document handed to the signature layer: raw text or an already-parsed
/// tree. A tree input is cloned; the caller's instance is never mutated.
pub enum XmlInput<'a> {
    Text(&'a str),
    Tree(&'a XmlTree),
}

impl<'a> From<&'a str> for XmlInput<'a> {
    fn from(text: &'a str) -> Self {
        XmlInput::Text(text)
    }
}

impl<'a> From<&'a String> for XmlInput<'a> {
    fn from(text: &'a String) -> Self {
        XmlInput::Text(text)
    }
}

impl<'a> From<&'a XmlTree> for XmlInput<'a> {
    fn from(tree: &'a XmlTree) -> Self {
        XmlInput::Tree(tree)
    }
}

impl XmlInput<'_> {
    pub(crate) fn into_tree(self) -> Result<XmlTree> {
        match self {
            XmlInput::Text(text) => XmlTree::parse(text),
            XmlInput::Tree(tree) => Ok(tree.clone()),
        }
    }
}
