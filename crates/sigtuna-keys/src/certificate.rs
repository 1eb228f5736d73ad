#![forbid(unsafe_code)]

//! The certificate accessor contract the signature layer consumes.
//!
//! Trust validation, PKCS#12 handling, and certificate discovery live with
//! the caller; this subsystem only reads key material through these
//! accessors and never persists or caches a certificate.

use crate::loader;
use base64::Engine;
use sigtuna_core::{Error, Result};

/// Accessors a certificate must provide for signing and key embedding.
pub trait Certificate {
    /// Base64 big-endian RSA modulus.
    fn modulus(&self) -> Result<String>;

    /// Base64 big-endian RSA public exponent.
    fn exponent(&self) -> Result<String>;

    /// The certificate as raw DER bytes.
    fn certificate_der(&self) -> Result<Vec<u8>>;

    /// The private key as PEM text.
    fn private_key_pem(&self) -> Result<String>;

    /// The public key as PEM text.
    fn public_key_pem(&self) -> Result<String>;

    /// The certificate DER, base64-encoded (`X509Certificate` form).
    fn certificate_base64(&self) -> Result<String> {
        Ok(base64::engine::general_purpose::STANDARD.encode(self.certificate_der()?))
    }
}

/// A [`Certificate`] backed by PEM text the caller already holds.
pub struct PemCertificate {
    certificate_der: Vec<u8>,
    private_key_pem: String,
    public_key: rsa::RsaPublicKey,
}

impl PemCertificate {
    /// Build from a PEM certificate and a PEM RSA private key.
    ///
    /// Both inputs are parsed up front so a bad pairing fails here rather
    /// than in the middle of signing.
    pub fn from_pem(cert_pem: &str, private_key_pem: &str) -> Result<Self> {
        let (label, der) = pem_rfc7468::decode_vec(cert_pem.trim().as_bytes())
            .map_err(|e| Error::Certificate(format!("failed to decode certificate PEM: {e}")))?;
        if label != "CERTIFICATE" {
            return Err(Error::Certificate(format!(
                "expected CERTIFICATE PEM label, got: {label}"
            )));
        }
        let public_key = loader::public_key_from_cert_der(&der)?;
        loader::load_rsa_private_pem(private_key_pem)?;
        Ok(Self {
            certificate_der: der,
            private_key_pem: private_key_pem.to_owned(),
            public_key,
        })
    }

    /// Build from PEM files on disk.
    pub fn from_files(cert_path: &std::path::Path, key_path: &std::path::Path) -> Result<Self> {
        let cert_pem = std::fs::read_to_string(cert_path)?;
        let key_pem = std::fs::read_to_string(key_path)?;
        Self::from_pem(&cert_pem, &key_pem)
    }
}

impl Certificate for PemCertificate {
    fn modulus(&self) -> Result<String> {
        Ok(loader::rsa_modulus_base64(&self.public_key))
    }

    fn exponent(&self) -> Result<String> {
        Ok(loader::rsa_exponent_base64(&self.public_key))
    }

    fn certificate_der(&self) -> Result<Vec<u8>> {
        Ok(self.certificate_der.clone())
    }

    fn private_key_pem(&self) -> Result<String> {
        Ok(self.private_key_pem.clone())
    }

    fn public_key_pem(&self) -> Result<String> {
        use pkcs8::EncodePublicKey;
        self.public_key
            .to_public_key_pem(pkcs8::LineEnding::LF)
            .map_err(|e| Error::Key(format!("failed to encode public key PEM: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cert() -> PemCertificate {
        PemCertificate::from_files(
            std::path::Path::new("../../test-data/keys/signer-cert.pem"),
            std::path::Path::new("../../test-data/keys/signer-key.pem"),
        )
        .expect("test certificate fixture")
    }

    #[test]
    fn test_accessors() {
        let cert = test_cert();
        assert_eq!(cert.exponent().unwrap(), "AQAB");
        assert!(!cert.modulus().unwrap().is_empty());
        assert!(cert
            .private_key_pem()
            .unwrap()
            .contains("BEGIN PRIVATE KEY"));
        assert!(cert.public_key_pem().unwrap().contains("BEGIN PUBLIC KEY"));
    }

    #[test]
    fn test_certificate_base64_roundtrip() {
        let cert = test_cert();
        let b64 = cert.certificate_base64().unwrap();
        let der = base64::engine::general_purpose::STANDARD
            .decode(&b64)
            .unwrap();
        assert_eq!(der, cert.certificate_der().unwrap());
        // The embedded public key must match the accessor's view.
        let from_der = loader::public_key_from_cert_der(&der).unwrap();
        assert_eq!(
            loader::rsa_modulus_base64(&from_der),
            cert.modulus().unwrap()
        );
    }

    #[test]
    fn test_wrong_pem_label_rejected() {
        let key_pem =
            std::fs::read_to_string("../../test-data/keys/signer-key.pem").unwrap();
        let result = PemCertificate::from_pem(&key_pem, &key_pem);
        assert!(matches!(result, Err(Error::Certificate(_))));
    }
}
