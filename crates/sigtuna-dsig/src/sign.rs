#![forbid(unsafe_code)]

//! Signature generation: digest, sign, splice.

use base64::Engine;
use sigtuna_core::{ns, Result};
use sigtuna_crypto::SignatureAlgorithm;
use sigtuna_keys::Certificate;
use sigtuna_xml::XmlTree;
use tracing::debug;

use crate::model::{KeyInfo, SignatureModel};
use crate::reference::reference_digest;
use crate::XmlInput;

/// Builds and embeds XML-DSig signatures.
///
/// The default suite is RSA-SHA1 — the interoperability target of this
/// library. Pass another [`SignatureAlgorithm`] explicitly to deviate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureGenerator {
    algorithm: SignatureAlgorithm,
}

impl SignatureGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_algorithm(algorithm: SignatureAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Base64 digest for a reference (`None`/empty ⇒ whole document with
    /// any embedded `Signature` elements excluded).
    pub fn compute_reference_digest(
        &self,
        tree: &XmlTree,
        reference: Option<&str>,
    ) -> Result<String> {
        reference_digest(tree, reference, self.algorithm.digest_algorithm())
    }

    /// Sign raw bytes with a PEM private key; returns base64.
    pub fn sign(&self, data: &[u8], private_key_pem: &str) -> Result<String> {
        let key = sigtuna_keys::loader::load_rsa_private_pem(private_key_pem)?;
        let signature = self.algorithm.sign(&key, data)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(signature))
    }

    /// Sign a document and return the serialized result with the
    /// `Signature` element appended as the last child of the root.
    ///
    /// With a `reference`, the element carrying `ID="<reference>"` is
    /// digested and the signature points at it with `URI="#<reference>"`;
    /// without one, the signature is enveloped over the whole document.
    ///
    /// An `ID` reference declares the plain C14N transform, which does not
    /// exclude the signature from the digested content — the referenced
    /// element therefore must not be the root the signature is appended
    /// to. Sign the whole document (no reference) for that case.
    pub fn sign_document<'a>(
        &self,
        xml: impl Into<XmlInput<'a>>,
        certificate: &dyn Certificate,
        reference: Option<&str>,
    ) -> Result<String> {
        let mut tree = xml.into().into_tree()?;

        let digest_value = self.compute_reference_digest(&tree, reference)?;
        debug!(
            reference = reference.unwrap_or("<whole document>"),
            digest = %digest_value,
            "reference digest computed"
        );

        let mut model = SignatureModel::new(reference, digest_value, self.algorithm);
        model.key_info = Some(KeyInfo {
            modulus: certificate.modulus()?,
            exponent: certificate.exponent()?,
            x509_certificate: certificate.certificate_base64()?,
        });
        model.ensure_ready_to_sign()?;

        // Sign the canonical SignedInfo of the encoded (not yet signed) model.
        let unsigned = model.to_tree()?;
        let signed_info = sigtuna_c14n::canonicalize_iso(
            &unsigned,
            Some(&format!("//{}", ns::node::SIGNED_INFO)),
        )?;
        let signature_value = self.sign(
            &sigtuna_c14n::iso_bytes(&signed_info),
            &certificate.private_key_pem()?,
        )?;
        model.signature_value = Some(signature_value);

        let signature_tree = model.to_tree()?;
        tree.root_mut().append_child(signature_tree.into_root());
        debug!("signature element appended to document root");
        Ok(tree.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtuna_core::Error;

    #[test]
    fn test_compute_reference_digest_missing_id() {
        let tree = XmlTree::parse(r#"<d><e ID="x"/></d>"#).unwrap();
        let generator = SignatureGenerator::new();
        assert!(matches!(
            generator.compute_reference_digest(&tree, Some("does-not-exist")),
            Err(Error::ReferenceNotFound(_))
        ));
    }

    #[test]
    fn test_sign_rejects_bad_key() {
        let generator = SignatureGenerator::new();
        assert!(matches!(
            generator.sign(b"data", "not a pem key"),
            Err(Error::Key(_))
        ));
    }
}
