//! Decode manifest documents into staged JSON payloads.
//!
//! Decoding happens in two passes over the same bytes. The first pass only
//! checks the generic [`Envelope`] so the `kind` tag can be read; the second
//! re-reads the whole document with `spec` typed as the matching [`Record`].
//! Keeping them apart lets callers tell a corrupt file
//! ([`ProvisionError::ManifestMalformed`]) from a spec that does not fit its
//! kind ([`ProvisionError::TypedDecodeFailed`]).

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ProvisionError, Result};
use crate::manifest::kind::{KindRegistry, UnknownKindPolicy};
use crate::models::Record;
use crate::store::StagedObject;

/// The shape every manifest must have before its kind is known.
///
/// A missing `kind` reads as the empty string and is handled like any other
/// unregistered kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub spec: serde_yaml::Value,
}

#[derive(Deserialize)]
struct TypedManifest<R> {
    spec: R,
}

/// Read `path` and decode it. See [`decode`].
pub fn decode_file(path: &Path, registry: &KindRegistry) -> Result<Option<StagedObject>> {
    tracing::info!("Reading file: {}", path.display());

    let bytes = fs::read(path).map_err(|source| ProvisionError::FileReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    decode(path, &bytes, registry)
}

/// Decode one manifest document.
///
/// Returns `Ok(None)` when the kind is not registered and the registry
/// ignores unknown kinds. Empty and comment-only documents have no kind.
/// `path` is only used for error context.
pub fn decode(
    path: &Path,
    bytes: &[u8],
    registry: &KindRegistry,
) -> Result<Option<StagedObject>> {
    let malformed = |source| ProvisionError::ManifestMalformed {
        path: path.to_path_buf(),
        source,
    };

    let document: serde_yaml::Value = serde_yaml::from_slice(bytes).map_err(malformed)?;
    let envelope = if document.is_null() {
        Envelope::default()
    } else {
        serde_yaml::from_value::<Envelope>(document).map_err(malformed)?
    };

    match registry.get(&envelope.kind) {
        Some(handler) => handler.decode(path, bytes).map(Some),
        None => match registry.unknown_policy() {
            UnknownKindPolicy::Ignore => {
                tracing::warn!(
                    "Ignoring {}: no handler for kind {:?}",
                    path.display(),
                    envelope.kind
                );
                Ok(None)
            }
            UnknownKindPolicy::Reject => Err(ProvisionError::UnknownKind {
                path: path.to_path_buf(),
                kind: envelope.kind,
            }),
        },
    }
}

/// Decode a document whose `spec` is an `R` and serialize that spec as JSON.
pub(crate) fn decode_typed<R: Record>(path: &Path, bytes: &[u8]) -> Result<StagedObject> {
    let manifest: TypedManifest<R> =
        serde_yaml::from_slice(bytes).map_err(|source| ProvisionError::TypedDecodeFailed {
            path: path.to_path_buf(),
            kind: R::KIND.to_string(),
            source,
        })?;

    let identifier = manifest.spec.identifier();
    if identifier.is_empty() {
        return Err(ProvisionError::MissingIdentifier {
            path: path.to_path_buf(),
            kind: R::KIND.to_string(),
        });
    }

    let payload =
        serde_json::to_vec(&manifest.spec).map_err(|source| ProvisionError::SerializeFailed {
            path: path.to_path_buf(),
            kind: R::KIND.to_string(),
            source,
        })?;

    Ok(StagedObject::new(R::SEGMENT, identifier, payload))
}
