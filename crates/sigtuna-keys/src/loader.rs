#![forbid(unsafe_code)]

//! RSA key loading from PEM and X.509 DER.

use base64::Engine;
use sigtuna_core::{Error, Result};

/// Load an RSA private key from PEM text. Tries PKCS#8 first, PKCS#1 second.
pub fn load_rsa_private_pem(pem: &str) -> Result<rsa::RsaPrivateKey> {
    use pkcs8::DecodePrivateKey;
    if let Ok(key) = rsa::RsaPrivateKey::from_pkcs8_pem(pem) {
        return Ok(key);
    }

    use pkcs1::DecodeRsaPrivateKey;
    rsa::RsaPrivateKey::from_pkcs1_pem(pem)
        .map_err(|e| Error::Key(format!("failed to parse RSA private key PEM: {e}")))
}

/// Load an RSA public key from PEM text. Tries SPKI first, PKCS#1 second.
pub fn load_rsa_public_pem(pem: &str) -> Result<rsa::RsaPublicKey> {
    use pkcs8::DecodePublicKey;
    if let Ok(key) = rsa::RsaPublicKey::from_public_key_pem(pem) {
        return Ok(key);
    }

    use pkcs1::DecodeRsaPublicKey;
    rsa::RsaPublicKey::from_pkcs1_pem(pem)
        .map_err(|e| Error::Key(format!("failed to parse RSA public key PEM: {e}")))
}

/// Extract the RSA public key from a DER-encoded X.509 certificate.
pub fn public_key_from_cert_der(der_bytes: &[u8]) -> Result<rsa::RsaPublicKey> {
    use der::{Decode, Encode};

    let cert = x509_cert::Certificate::from_der(der_bytes)
        .map_err(|e| Error::Certificate(format!("failed to parse X.509 certificate: {e}")))?;

    let spki_der = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| Error::Certificate(format!("failed to encode SPKI: {e}")))?;

    use spki::DecodePublicKey;
    rsa::RsaPublicKey::from_public_key_der(&spki_der).map_err(|e| {
        Error::Certificate(format!("certificate does not carry an RSA public key: {e}"))
    })
}

/// The big-endian RSA modulus, base64-encoded (XML-DSig `Modulus` form).
pub fn rsa_modulus_base64(key: &rsa::RsaPublicKey) -> String {
    use rsa::traits::PublicKeyParts;
    base64::engine::general_purpose::STANDARD.encode(key.n().to_bytes_be())
}

/// The big-endian RSA public exponent, base64-encoded (`Exponent` form).
pub fn rsa_exponent_base64(key: &rsa::RsaPublicKey) -> String {
    use rsa::traits::PublicKeyParts;
    base64::engine::general_purpose::STANDARD.encode(key.e().to_bytes_be())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("../../test-data/keys/{name}")).expect("fixture")
    }

    #[test]
    fn test_load_private_pkcs8() {
        let key = load_rsa_private_pem(&fixture("signer-key.pem")).unwrap();
        use rsa::traits::PublicKeyParts;
        assert_eq!(key.n().bits(), 2048);
    }

    #[test]
    fn test_load_public_spki() {
        let key = load_rsa_public_pem(&fixture("signer-pub.pem")).unwrap();
        use rsa::traits::PublicKeyParts;
        assert_eq!(key.n().bits(), 2048);
    }

    #[test]
    fn test_load_private_rejects_garbage() {
        assert!(matches!(
            load_rsa_private_pem("not a key"),
            Err(Error::Key(_))
        ));
    }

    #[test]
    fn test_cert_public_key_matches_private() {
        let der = std::fs::read("../../test-data/keys/signer-cert.der").expect("fixture");
        let from_cert = public_key_from_cert_der(&der).unwrap();
        let private = load_rsa_private_pem(&fixture("signer-key.pem")).unwrap();
        assert_eq!(from_cert, private.to_public_key());
    }

    #[test]
    fn test_standard_exponent_base64() {
        let key = load_rsa_private_pem(&fixture("signer-key.pem")).unwrap();
        assert_eq!(rsa_exponent_base64(&key.to_public_key()), "AQAB");
    }

    #[test]
    fn test_modulus_base64_roundtrip() {
        let key = load_rsa_private_pem(&fixture("signer-key.pem")).unwrap();
        let public = key.to_public_key();
        let b64 = rsa_modulus_base64(&public);
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&b64)
            .unwrap();
        use rsa::traits::PublicKeyParts;
        assert_eq!(rsa::BigUint::from_bytes_be(&bytes), *public.n());
    }
}
