#![forbid(unsafe_code)]

//! Key material handling for Sigtuna: the [`Certificate`] accessor contract
//! the signature layer consumes, and RSA PEM/DER loading helpers.

pub mod certificate;
pub mod loader;

pub use certificate::{Certificate, PemCertificate};
