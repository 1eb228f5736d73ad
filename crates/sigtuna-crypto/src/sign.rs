#![forbid(unsafe_code)]

//! RSA PKCS#1 v1.5 signature algorithms.

use sigtuna_core::{algorithm, Error, Result};
use signature::SignatureEncoding;

use crate::digest::DigestAlgorithm;

/// A signature algorithm identified by its XML-DSig URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureAlgorithm {
    #[default]
    RsaSha1,
    RsaSha256,
}

impl SignatureAlgorithm {
    /// The `SignatureMethod` algorithm URI.
    pub fn uri(&self) -> &'static str {
        match self {
            Self::RsaSha1 => algorithm::RSA_SHA1,
            Self::RsaSha256 => algorithm::RSA_SHA256,
        }
    }

    /// Resolve an algorithm from its URI.
    pub fn from_uri(uri: &str) -> Result<Self> {
        match uri {
            algorithm::RSA_SHA1 => Ok(Self::RsaSha1),
            algorithm::RSA_SHA256 => Ok(Self::RsaSha256),
            _ => Err(Error::UnsupportedAlgorithm(format!(
                "signature algorithm: {uri}"
            ))),
        }
    }

    /// The digest half of the suite (used for `DigestMethod`).
    pub fn digest_algorithm(&self) -> DigestAlgorithm {
        match self {
            Self::RsaSha1 => DigestAlgorithm::Sha1,
            Self::RsaSha256 => DigestAlgorithm::Sha256,
        }
    }

    /// Sign `data` with the private key.
    pub fn sign(&self, key: &rsa::RsaPrivateKey, data: &[u8]) -> Result<Vec<u8>> {
        use signature::Signer;
        match self {
            Self::RsaSha1 => {
                let sk = rsa::pkcs1v15::SigningKey::<sha1::Sha1>::new(key.clone());
                let sig = sk
                    .try_sign(data)
                    .map_err(|e| Error::Signing(format!("RSA-SHA1: {e}")))?;
                Ok(sig.to_vec())
            }
            Self::RsaSha256 => {
                let sk = rsa::pkcs1v15::SigningKey::<sha2::Sha256>::new(key.clone());
                let sig = sk
                    .try_sign(data)
                    .map_err(|e| Error::Signing(format!("RSA-SHA256: {e}")))?;
                Ok(sig.to_vec())
            }
        }
    }

    /// Verify `signature` over `data` with the public key.
    ///
    /// `Ok(false)` is the cryptographic verdict for a mismatching
    /// signature; `Err(Verification)` is reserved for primitive-level
    /// failures such as a signature blob the key size cannot accept.
    pub fn verify(
        &self,
        key: &rsa::RsaPublicKey,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool> {
        use signature::Verifier;
        let sig = rsa::pkcs1v15::Signature::try_from(signature)
            .map_err(|e| Error::Verification(format!("malformed RSA signature: {e}")))?;
        match self {
            Self::RsaSha1 => {
                let vk = rsa::pkcs1v15::VerifyingKey::<sha1::Sha1>::new(key.clone());
                Ok(vk.verify(data, &sig).is_ok())
            }
            Self::RsaSha256 => {
                let vk = rsa::pkcs1v15::VerifyingKey::<sha2::Sha256>::new(key.clone());
                Ok(vk.verify(data, &sig).is_ok())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> rsa::RsaPrivateKey {
        use pkcs8::DecodePrivateKey;
        let pem = std::fs::read_to_string("../../test-data/keys/signer-key.pem")
            .expect("test key fixture");
        rsa::RsaPrivateKey::from_pkcs8_pem(&pem).expect("parse test key")
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let key = test_key();
        let public = key.to_public_key();
        let alg = SignatureAlgorithm::RsaSha1;
        let sig = alg.sign(&key, b"payload").unwrap();
        assert!(alg.verify(&public, b"payload", &sig).unwrap());
        assert!(!alg.verify(&public, b"tampered", &sig).unwrap());
    }

    #[test]
    fn test_verify_wrong_algorithm_is_false_verdict() {
        let key = test_key();
        let public = key.to_public_key();
        let sig = SignatureAlgorithm::RsaSha1.sign(&key, b"payload").unwrap();
        assert!(!SignatureAlgorithm::RsaSha256
            .verify(&public, b"payload", &sig)
            .unwrap());
    }

    #[test]
    fn test_verify_wrong_length_signature_not_valid() {
        let key = test_key();
        let public = key.to_public_key();
        // Far shorter than the modulus: never a valid verdict.
        let verdict = SignatureAlgorithm::RsaSha1.verify(&public, b"payload", &[1, 2, 3]);
        assert!(!verdict.unwrap_or(false));
    }

    #[test]
    fn test_uri_roundtrip() {
        for alg in [SignatureAlgorithm::RsaSha1, SignatureAlgorithm::RsaSha256] {
            assert_eq!(SignatureAlgorithm::from_uri(alg.uri()).unwrap(), alg);
        }
    }
}
