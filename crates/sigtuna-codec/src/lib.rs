#![forbid(unsafe_code)]

//! Bidirectional codec between nested ordered values and XML trees.
//!
//! [`encode`] turns a nested [`Value`] map into an [`sigtuna_xml::XmlTree`];
//! [`decode`] reverses it, including repeated-sibling ("twin") collection.

pub mod decode;
pub mod encode;
pub mod value;

pub use decode::decode;
pub use encode::encode;
pub use value::{Value, ATTRIBUTES_KEY, VALUE_KEY};
