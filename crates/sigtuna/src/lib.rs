#![forbid(unsafe_code)]

//! Sigtuna — XML digital signatures (XML-DSig) for documents that must
//! interoperate with legacy ISO-8859-1 / RSA-SHA1 verifiers.

pub use sigtuna_c14n as c14n;
pub use sigtuna_codec as codec;
pub use sigtuna_core as core;
pub use sigtuna_crypto as crypto;
pub use sigtuna_dsig as dsig;
pub use sigtuna_keys as keys;
pub use sigtuna_xml as xml;
