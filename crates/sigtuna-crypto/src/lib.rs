#![forbid(unsafe_code)]

//! Cryptographic primitives for XML digital signatures: digest algorithms
//! and RSA PKCS#1 v1.5 signing/verification.
//!
//! SHA1 and RSA-SHA1 are the defaults for interoperability with the legacy
//! verifiers this library targets; SHA-256 variants are available as
//! parameters, never silently substituted.

pub mod digest;
pub mod sign;

pub use digest::DigestAlgorithm;
pub use sign::SignatureAlgorithm;
