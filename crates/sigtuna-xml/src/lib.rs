#![forbid(unsafe_code)]

//! Owned XML tree model for the Sigtuna library.
//!
//! Documents are parsed with roxmltree and converted once into an owned
//! [`XmlTree`], so cloning and mutation (removing or splicing a `Signature`
//! subtree) are explicit value operations instead of borrow juggling.

pub mod parse;
pub mod tree;
pub mod writer;
pub mod xpath;

pub use tree::{Namespace, XmlNode, XmlTree};
pub use writer::serialize_node;
