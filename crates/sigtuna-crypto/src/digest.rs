#![forbid(unsafe_code)]

//! Digest (hash) algorithms.

use base64::Engine;
use digest::Digest;
use sigtuna_core::{algorithm, Error, Result};

/// A digest algorithm identified by its XML-DSig URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// The `DigestMethod` algorithm URI.
    pub fn uri(&self) -> &'static str {
        match self {
            Self::Sha1 => algorithm::SHA1,
            Self::Sha256 => algorithm::SHA256,
        }
    }

    /// Resolve an algorithm from its URI.
    pub fn from_uri(uri: &str) -> Result<Self> {
        match uri {
            algorithm::SHA1 => Ok(Self::Sha1),
            algorithm::SHA256 => Ok(Self::Sha256),
            _ => Err(Error::UnsupportedAlgorithm(format!(
                "digest algorithm: {uri}"
            ))),
        }
    }

    /// Compute the digest of `data` in one shot.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => sha1::Sha1::digest(data).to_vec(),
            Self::Sha256 => sha2::Sha256::digest(data).to_vec(),
        }
    }

    /// Compute the digest and return it base64-encoded.
    pub fn digest_base64(&self, data: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.digest(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha1_known_value() {
        let out = DigestAlgorithm::Sha1.digest(b"hello");
        let hex: String = out.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(hex, "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
    }

    #[test]
    fn test_sha256_length() {
        assert_eq!(DigestAlgorithm::Sha256.digest(b"hello").len(), 32);
    }

    #[test]
    fn test_digest_base64() {
        assert_eq!(
            DigestAlgorithm::Sha1.digest_base64(b"hello"),
            "qvTGHdzF6KLavt4PO0gs2a6pQ00="
        );
    }

    #[test]
    fn test_from_uri() {
        assert_eq!(
            DigestAlgorithm::from_uri("http://www.w3.org/2000/09/xmldsig#sha1").unwrap(),
            DigestAlgorithm::Sha1
        );
        assert!(DigestAlgorithm::from_uri("urn:nope").is_err());
    }
}
