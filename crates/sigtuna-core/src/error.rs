#![forbid(unsafe_code)]

/// Errors produced by the Sigtuna XML signature library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed XML: {0}")]
    MalformedXml(String),

    #[error("reference not found: {0}")]
    ReferenceNotFound(String),

    #[error("ambiguous reference: {0}")]
    AmbiguousReference(String),

    #[error("unsupported node value: {0}")]
    UnsupportedNodeValue(String),

    #[error("missing prerequisite: {0}")]
    MissingPrerequisite(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("verification error: {0}")]
    Verification(String),

    #[error("digest mismatch for reference: {0}")]
    DigestMismatch(String),

    #[error("invalid signature for reference: {0}")]
    InvalidSignature(String),

    #[error("no Signature element found in document")]
    NoSignatureFound,

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("base64 decode error: {0}")]
    Base64(String),

    #[error("key error: {0}")]
    Key(String),

    #[error("certificate error: {0}")]
    Certificate(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
