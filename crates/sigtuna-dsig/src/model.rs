#![forbid(unsafe_code)]

//! The typed representation of one XML-DSig `Signature` element and its
//! projection through the array↔XML codec.

use indexmap::IndexMap;
use sigtuna_codec::{Value, ATTRIBUTES_KEY, VALUE_KEY};
use sigtuna_core::{algorithm, ns, Error, Result};
use sigtuna_crypto::{DigestAlgorithm, SignatureAlgorithm};
use sigtuna_xml::{Namespace, XmlTree};

/// The transform declared on a `Reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformAlgorithm {
    /// The signature excludes itself from the digested content
    /// (whole-document references).
    EnvelopedSignature,
    /// Plain C14N (`ID`-referenced subtrees).
    C14n,
}

impl TransformAlgorithm {
    pub fn uri(&self) -> &'static str {
        match self {
            Self::EnvelopedSignature => algorithm::ENVELOPED_SIGNATURE,
            Self::C14n => algorithm::C14N,
        }
    }

    pub fn from_uri(uri: &str) -> Result<Self> {
        match uri {
            algorithm::ENVELOPED_SIGNATURE => Ok(Self::EnvelopedSignature),
            algorithm::C14N => Ok(Self::C14n),
            _ => Err(Error::UnsupportedAlgorithm(format!("transform: {uri}"))),
        }
    }
}

/// One `Reference` inside `SignedInfo`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// The `URI` attribute: empty for a whole-document (enveloped)
    /// signature, `#id` pointing at an `ID`-carrying element otherwise.
    pub uri: String,
    pub transform: TransformAlgorithm,
    pub digest_algorithm: DigestAlgorithm,
    /// Base64 digest over the referenced canonical bytes.
    pub digest_value: Option<String>,
}

impl Reference {
    /// The reference ID without the leading `#`, if this is an `ID` reference.
    pub fn id(&self) -> Option<&str> {
        self.uri.strip_prefix('#')
    }

    /// The name used when reporting failures for this reference.
    pub fn display_name(&self) -> String {
        if self.uri.is_empty() {
            "whole document".to_owned()
        } else {
            self.uri.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignedInfo {
    pub signature_algorithm: SignatureAlgorithm,
    pub reference: Reference,
}

/// Key material embedded in `KeyInfo`, all base64.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyInfo {
    pub modulus: String,
    pub exponent: String,
    pub x509_certificate: String,
}

/// One `Signature` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureModel {
    pub signed_info: SignedInfo,
    /// Base64 RSA signature over the canonical `SignedInfo`; set only after
    /// signing.
    pub signature_value: Option<String>,
    pub key_info: Option<KeyInfo>,
}

impl SignatureModel {
    /// Build a model for a freshly computed digest. The transform follows
    /// from whether an `ID` reference is present.
    pub fn new(
        reference: Option<&str>,
        digest_value: String,
        algorithm: SignatureAlgorithm,
    ) -> Self {
        let (uri, transform) = match reference {
            Some(r) if !r.is_empty() => (format!("#{r}"), TransformAlgorithm::C14n),
            _ => (String::new(), TransformAlgorithm::EnvelopedSignature),
        };
        Self {
            signed_info: SignedInfo {
                signature_algorithm: algorithm,
                reference: Reference {
                    uri,
                    transform,
                    digest_algorithm: algorithm.digest_algorithm(),
                    digest_value: Some(digest_value),
                },
            },
            signature_value: None,
            key_info: None,
        }
    }

    /// Digest and key material must both be in place before the signature
    /// value may be computed.
    pub fn ensure_ready_to_sign(&self) -> Result<()> {
        if self
            .signed_info
            .reference
            .digest_value
            .as_deref()
            .unwrap_or("")
            .is_empty()
        {
            return Err(Error::MissingPrerequisite(
                "digest value must be computed before signing".into(),
            ));
        }
        if self.key_info.is_none() {
            return Err(Error::MissingPrerequisite(
                "certificate key material must be set before signing".into(),
            ));
        }
        Ok(())
    }

    /// Project the model into the codec's value form, in the fixed
    /// XML-DSig fragment shape.
    pub fn to_value(&self) -> Value {
        let si = &self.signed_info;
        let reference = Value::map([
            (
                ATTRIBUTES_KEY,
                Value::map([(ns::attr::URI, si.reference.uri.as_str().into())]),
            ),
            (
                ns::node::TRANSFORMS,
                Value::map([(
                    ns::node::TRANSFORM,
                    algorithm_element(si.reference.transform.uri()),
                )]),
            ),
            (
                ns::node::DIGEST_METHOD,
                algorithm_element(si.reference.digest_algorithm.uri()),
            ),
            (
                ns::node::DIGEST_VALUE,
                si.reference.digest_value.clone().unwrap_or_default().into(),
            ),
        ]);
        let signed_info = Value::map([
            (
                ns::node::CANONICALIZATION_METHOD,
                algorithm_element(algorithm::C14N),
            ),
            (
                ns::node::SIGNATURE_METHOD,
                algorithm_element(si.signature_algorithm.uri()),
            ),
            (ns::node::REFERENCE, reference),
        ]);

        let mut signature: IndexMap<String, Value> = IndexMap::new();
        signature.insert(ns::node::SIGNED_INFO.to_owned(), signed_info);
        signature.insert(
            ns::node::SIGNATURE_VALUE.to_owned(),
            self.signature_value.clone().unwrap_or_default().into(),
        );
        if let Some(ki) = &self.key_info {
            signature.insert(
                ns::node::KEY_INFO.to_owned(),
                Value::map([
                    (
                        ns::node::KEY_VALUE,
                        Value::map([(
                            ns::node::RSA_KEY_VALUE,
                            Value::map([
                                (ns::node::RSA_MODULUS, ki.modulus.as_str().into()),
                                (ns::node::RSA_EXPONENT, ki.exponent.as_str().into()),
                            ]),
                        )]),
                    ),
                    (
                        ns::node::X509_DATA,
                        Value::map([(
                            ns::node::X509_CERTIFICATE,
                            ki.x509_certificate.as_str().into(),
                        )]),
                    ),
                ]),
            );
        }

        let mut root = IndexMap::new();
        root.insert(ns::node::SIGNATURE.to_owned(), Value::Map(signature));
        Value::Map(root)
    }

    /// Encode the model into an XML tree in the `xmldsig` default namespace.
    pub fn to_tree(&self) -> Result<XmlTree> {
        sigtuna_codec::encode(&self.to_value(), Some(&Namespace::default_ns(ns::DSIG)))
    }

    /// Rebuild a model from the decoded value form of a `Signature` element.
    pub fn from_value(value: &Value) -> Result<Self> {
        let signature = child_map(value, ns::node::SIGNATURE)?;
        let signed_info = child_map_of(signature, ns::node::SIGNED_INFO)?;

        let signature_algorithm = SignatureAlgorithm::from_uri(&algorithm_attr(
            signed_info,
            ns::node::SIGNATURE_METHOD,
        )?)?;

        let reference = child_map_of(signed_info, ns::node::REFERENCE)?;
        let uri = attr_text(reference, ns::attr::URI).unwrap_or_default();

        let transforms = child_map_of(reference, ns::node::TRANSFORMS)?;
        let transform =
            TransformAlgorithm::from_uri(&algorithm_attr(transforms, ns::node::TRANSFORM)?)?;

        let digest_algorithm =
            DigestAlgorithm::from_uri(&algorithm_attr(reference, ns::node::DIGEST_METHOD)?)?;
        let digest_value = child_text_of(reference, ns::node::DIGEST_VALUE)?;

        let signature_value = child_text_of(signature, ns::node::SIGNATURE_VALUE)
            .ok()
            .filter(|s| !s.is_empty());

        let key_info = match signature.get(ns::node::KEY_INFO) {
            None => None,
            Some(ki) => {
                let ki_map = as_map(ki, ns::node::KEY_INFO)?;
                let key_value = child_map_of(ki_map, ns::node::KEY_VALUE)?;
                let rsa = child_map_of(key_value, ns::node::RSA_KEY_VALUE)?;
                let x509_data = child_map_of(ki_map, ns::node::X509_DATA)?;
                Some(KeyInfo {
                    modulus: child_text_of(rsa, ns::node::RSA_MODULUS)?,
                    exponent: child_text_of(rsa, ns::node::RSA_EXPONENT)?,
                    x509_certificate: child_text_of(x509_data, ns::node::X509_CERTIFICATE)?,
                })
            }
        };

        Ok(Self {
            signed_info: SignedInfo {
                signature_algorithm,
                reference: Reference {
                    uri,
                    transform,
                    digest_algorithm,
                    digest_value: Some(digest_value).filter(|s| !s.is_empty()),
                },
            },
            signature_value,
            key_info,
        })
    }
}

/// An element whose only content is an `Algorithm` attribute.
fn algorithm_element(uri: &str) -> Value {
    Value::map([(
        ATTRIBUTES_KEY,
        Value::map([(ns::attr::ALGORITHM, uri.into())]),
    )])
}

// ── Value navigation helpers ─────────────────────────────────────────

fn as_map<'a>(value: &'a Value, what: &str) -> Result<&'a IndexMap<String, Value>> {
    value
        .as_map()
        .ok_or_else(|| Error::MissingElement(format!("{what} is not an element")))
}

fn child_map<'a>(value: &'a Value, key: &str) -> Result<&'a IndexMap<String, Value>> {
    let map = as_map(value, key)?;
    child_map_of(map, key)
}

fn child_map_of<'a>(
    map: &'a IndexMap<String, Value>,
    key: &str,
) -> Result<&'a IndexMap<String, Value>> {
    let value = map
        .get(key)
        .ok_or_else(|| Error::MissingElement(key.to_owned()))?;
    as_map(value, key)
}

/// Text of a child element, whitespace-stripped (base64 content may be
/// wrapped over multiple lines by other producers).
fn child_text_of(map: &IndexMap<String, Value>, key: &str) -> Result<String> {
    let value = map
        .get(key)
        .ok_or_else(|| Error::MissingElement(key.to_owned()))?;
    let text = match value {
        Value::String(s) => s.as_str(),
        Value::Map(m) => m
            .get(VALUE_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MissingElement(format!("text content of {key}")))?,
        _ => return Err(Error::MissingElement(format!("text content of {key}"))),
    };
    Ok(text.chars().filter(|c| !c.is_whitespace()).collect())
}

fn attr_text(map: &IndexMap<String, Value>, name: &str) -> Option<String> {
    map.get(ATTRIBUTES_KEY)?
        .as_map()?
        .get(name)?
        .as_str()
        .map(str::to_owned)
}

/// The `Algorithm` attribute of a child element.
fn algorithm_attr(map: &IndexMap<String, Value>, element: &str) -> Result<String> {
    let child = map
        .get(element)
        .ok_or_else(|| Error::MissingElement(element.to_owned()))?;
    let child_map = as_map(child, element)?;
    attr_text(child_map, ns::attr::ALGORITHM)
        .ok_or_else(|| Error::MissingAttribute(format!("Algorithm on {element}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtuna_xml::serialize_node;

    fn sample_model() -> SignatureModel {
        let mut model = SignatureModel::new(
            Some("F1"),
            "ZGlnZXN0".into(),
            SignatureAlgorithm::RsaSha1,
        );
        model.key_info = Some(KeyInfo {
            modulus: "bW9k".into(),
            exponent: "AQAB".into(),
            x509_certificate: "Y2VydA==".into(),
        });
        model.signature_value = Some("c2ln".into());
        model
    }

    #[test]
    fn test_fixed_fragment_shape() {
        let tree = sample_model().to_tree().unwrap();
        let xml = serialize_node(tree.root());
        assert!(xml.starts_with(r#"<Signature xmlns="http://www.w3.org/2000/09/xmldsig#">"#));
        assert!(xml.contains(
            r#"<CanonicalizationMethod Algorithm="http://www.w3.org/TR/2001/REC-xml-c14n-20010315"/>"#
        ));
        assert!(xml.contains(
            r#"<SignatureMethod Algorithm="http://www.w3.org/2000/09/xmldsig#rsa-sha1"/>"#
        ));
        assert!(xml.contains(r##"<Reference URI="#F1">"##));
        assert!(xml.contains(
            r#"<Transform Algorithm="http://www.w3.org/TR/2001/REC-xml-c14n-20010315"/>"#
        ));
        assert!(xml.contains(
            r#"<DigestMethod Algorithm="http://www.w3.org/2000/09/xmldsig#sha1"/>"#
        ));
        assert!(xml.contains("<DigestValue>ZGlnZXN0</DigestValue>"));
        assert!(xml.contains("<SignatureValue>c2ln</SignatureValue>"));
        assert!(xml.contains("<Modulus>bW9k</Modulus>"));
        assert!(xml.contains("<Exponent>AQAB</Exponent>"));
        assert!(xml.contains("<X509Certificate>Y2VydA==</X509Certificate>"));
    }

    #[test]
    fn test_enveloped_transform_for_whole_document() {
        let model = SignatureModel::new(None, "ZGlnZXN0".into(), SignatureAlgorithm::RsaSha1);
        assert_eq!(model.signed_info.reference.uri, "");
        assert_eq!(
            model.signed_info.reference.transform,
            TransformAlgorithm::EnvelopedSignature
        );
        let xml = serialize_node(model.to_tree().unwrap().root());
        assert!(xml.contains(r#"<Reference URI="">"#));
        assert!(xml.contains(
            r#"<Transform Algorithm="http://www.w3.org/2000/09/xmldsig#enveloped-signature"/>"#
        ));
    }

    #[test]
    fn test_value_roundtrip() {
        let model = sample_model();
        let rebuilt = SignatureModel::from_value(&model.to_value()).unwrap();
        assert_eq!(rebuilt, model);
    }

    #[test]
    fn test_roundtrip_through_xml() {
        let model = sample_model();
        let tree = model.to_tree().unwrap();
        let reparsed = sigtuna_xml::XmlTree::parse(&serialize_node(tree.root())).unwrap();
        let decoded = sigtuna_codec::decode(reparsed.root(), false);
        assert_eq!(SignatureModel::from_value(&decoded).unwrap(), model);
    }

    #[test]
    fn test_ready_to_sign_requires_digest() {
        let mut model = SignatureModel::new(None, String::new(), SignatureAlgorithm::RsaSha1);
        model.key_info = Some(KeyInfo {
            modulus: "m".into(),
            exponent: "e".into(),
            x509_certificate: "c".into(),
        });
        assert!(matches!(
            model.ensure_ready_to_sign(),
            Err(Error::MissingPrerequisite(_))
        ));
    }

    #[test]
    fn test_ready_to_sign_requires_key_info() {
        let model = SignatureModel::new(None, "ZGlnZXN0".into(), SignatureAlgorithm::RsaSha1);
        assert!(matches!(
            model.ensure_ready_to_sign(),
            Err(Error::MissingPrerequisite(_))
        ));
    }

    #[test]
    fn test_reference_display_name() {
        let with_ref = sample_model();
        assert_eq!(with_ref.signed_info.reference.display_name(), "#F1");
        assert_eq!(with_ref.signed_info.reference.id(), Some("F1"));
        let whole = SignatureModel::new(None, "d".into(), SignatureAlgorithm::RsaSha1);
        assert_eq!(
            whole.signed_info.reference.display_name(),
            "whole document"
        );
    }
}
