#![forbid(unsafe_code)]

//! Reference digest computation, shared between signing and validation.

use sigtuna_core::{ns, Result};
use sigtuna_crypto::DigestAlgorithm;
use sigtuna_xml::XmlTree;

/// Compute the base64 digest for a reference.
///
/// A non-empty `reference` resolves `//*[@ID="<reference>"]` and digests
/// that canonical subtree. An empty or absent reference digests the whole
/// document with every `Signature` descendant stripped from a private
/// clone, so a document can be signed again (or re-validated) without
/// earlier signatures polluting the digest. The caller's tree is never
/// mutated.
pub fn reference_digest(
    tree: &XmlTree,
    reference: Option<&str>,
    algorithm: DigestAlgorithm,
) -> Result<String> {
    let canonical = match reference {
        Some(id) if !id.is_empty() => {
            let expr = format!(r#"//*[@{}="{id}"]"#, ns::attr::ID);
            sigtuna_c14n::canonicalize_iso(tree, Some(&expr))?
        }
        _ => {
            let mut scratch = tree.clone();
            scratch.remove_descendants(ns::node::SIGNATURE);
            sigtuna_c14n::canonicalize_iso(&scratch, None)?
        }
    };
    Ok(algorithm.digest_base64(&sigtuna_c14n::iso_bytes(&canonical)))
}
