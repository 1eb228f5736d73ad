#![forbid(unsafe_code)]

//! Document validation: locate `Signature` elements, recompute digests,
//! verify signature values.

use base64::Engine;
use sigtuna_core::{ns, Error, Result};
use sigtuna_crypto::SignatureAlgorithm;
use sigtuna_xml::{xpath, XmlTree};
use tracing::debug;

use crate::model::SignatureModel;
use crate::reference::reference_digest;
use crate::XmlInput;

/// Validates every signature embedded in a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureValidator;

impl SignatureValidator {
    pub fn new() -> Self {
        Self
    }

    /// Verify a raw signature over `data` with a PEM public key.
    ///
    /// `Ok(false)` is the cryptographic verdict; errors are reserved for
    /// primitive failures (undecodable base64, unparseable key).
    pub fn verify(
        &self,
        data: &[u8],
        signature_b64: &str,
        public_key_pem: &str,
        algorithm: SignatureAlgorithm,
    ) -> Result<bool> {
        let key = sigtuna_keys::loader::load_rsa_public_pem(public_key_pem)?;
        let signature = decode_base64(signature_b64, ns::node::SIGNATURE_VALUE)?;
        algorithm.verify(&key, data, &signature)
    }

    /// Validate every `Signature` element of a document, independently.
    ///
    /// The first failing signature raises, naming its reference. Succeeds
    /// only when each embedded signature's digest and signature value both
    /// check out against the document and the certificate it embeds.
    pub fn validate_document<'a>(&self, xml: impl Into<XmlInput<'a>>) -> Result<()> {
        let tree = xml.into().into_tree()?;

        let signature_nodes = tree.find_by_local_name(ns::node::SIGNATURE);
        if signature_nodes.is_empty() {
            return Err(Error::NoSignatureFound);
        }
        debug!(count = signature_nodes.len(), "validating signatures");

        for node in signature_nodes {
            // Canonicalize the Signature standalone, then decode it into
            // the typed model from the re-parsed canonical form.
            let standalone = XmlTree::from_root(node.clone());
            let canonical = sigtuna_c14n::canonicalize_iso(&standalone, None)?;
            let parsed = XmlTree::parse(&canonical)?;
            let decoded = sigtuna_codec::decode(parsed.root(), false);
            let model = SignatureModel::from_value(&decoded)?;

            self.validate_signature(&tree, &model, &parsed)?;
        }
        Ok(())
    }

    fn validate_signature(
        &self,
        document: &XmlTree,
        model: &SignatureModel,
        signature_tree: &XmlTree,
    ) -> Result<()> {
        let reference = &model.signed_info.reference;
        let name = reference.display_name();

        // 1. The stored digest must match a recomputation against the
        //    original document.
        let expected_b64 = reference
            .digest_value
            .as_deref()
            .ok_or_else(|| Error::MissingElement(ns::node::DIGEST_VALUE.to_owned()))?;
        let expected = decode_base64(expected_b64, ns::node::DIGEST_VALUE)?;

        let id = if reference.uri.is_empty() {
            None
        } else {
            Some(
                xpath::parse_same_document_ref(&reference.uri).ok_or_else(|| {
                    Error::Other(format!("unsupported reference URI: {}", reference.uri))
                })?,
            )
        };
        let actual_b64 = reference_digest(document, id, reference.digest_algorithm)?;
        let actual = decode_base64(&actual_b64, ns::node::DIGEST_VALUE)?;
        if expected != actual {
            return Err(Error::DigestMismatch(name));
        }
        debug!(reference = %name, "reference digest verified");

        // 2. The signature value must verify over the canonical SignedInfo
        //    with the public key of the embedded certificate.
        let signed_info = sigtuna_c14n::canonicalize_iso(
            signature_tree,
            Some(&format!("//{}", ns::node::SIGNED_INFO)),
        )?;
        let signature_b64 = model
            .signature_value
            .as_deref()
            .ok_or_else(|| Error::MissingElement(ns::node::SIGNATURE_VALUE.to_owned()))?;
        let signature = decode_base64(signature_b64, ns::node::SIGNATURE_VALUE)?;

        let key_info = model
            .key_info
            .as_ref()
            .ok_or_else(|| Error::MissingElement(ns::node::KEY_INFO.to_owned()))?;
        let cert_der = decode_base64(&key_info.x509_certificate, ns::node::X509_CERTIFICATE)?;
        let public_key = sigtuna_keys::loader::public_key_from_cert_der(&cert_der)?;

        let valid = model.signed_info.signature_algorithm.verify(
            &public_key,
            &sigtuna_c14n::iso_bytes(&signed_info),
            &signature,
        )?;
        if !valid {
            return Err(Error::InvalidSignature(name));
        }
        debug!(reference = %name, "signature value verified");
        Ok(())
    }
}

fn decode_base64(text: &str, what: &str) -> Result<Vec<u8>> {
    let clean: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(clean)
        .map_err(|e| Error::Base64(format!("{what}: {e}")))
}
