//! Content-addressed artifact storage.
//!
//! Offloaded payloads are stored under a filename derived from the SHA-256
//! of their bytes, so identical content is stored once and repeated puts are
//! no-ops from the caller's perspective.

use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::LogError;

/// Metadata describing one stored artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactMeta {
    pub path: String,
    pub byte_size: u64,
    /// Hex-encoded SHA-256 of the stored bytes.
    pub content_hash: String,
}

/// Write-once, content-addressed byte store rooted at one directory.
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Open a store, creating its root directory if absent.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, LogError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| LogError::ArtifactRoot {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store raw bytes under their content hash.
    ///
    /// The file is write-once: if identical content was stored before, the
    /// existing file is left untouched and the same metadata is returned.
    pub fn put_bytes(&self, data: &[u8], suffix: &str) -> Result<ArtifactMeta, LogError> {
        let digest = hex::encode(Sha256::digest(data));
        let path = self.root.join(format!("{}{}", digest, suffix));

        if !path.exists() {
            std::fs::write(&path, data).map_err(|source| LogError::ArtifactWrite {
                path: path.clone(),
                source,
            })?;
        }

        Ok(ArtifactMeta {
            path: path.display().to_string(),
            byte_size: data.len() as u64,
            content_hash: digest,
        })
    }

    /// Store a value as canonical (sorted-key) JSON.
    pub fn put_json<T: Serialize>(&self, payload: &T) -> Result<ArtifactMeta, LogError> {
        let data = canonical_json_bytes(payload)
            .map_err(|e| LogError::ArtifactEncode(e.to_string()))?;
        self.put_bytes(&data, ".json")
    }
}

/// Serialize with object keys sorted, so identical values always hash the
/// same regardless of field order at the call site.
fn canonical_json_bytes<T: Serialize>(payload: &T) -> Result<Vec<u8>, serde_json::Error> {
    let value = serde_json::to_value(payload)?;
    serde_json::to_vec(&Sorted(&value))
}

struct Sorted<'a>(&'a serde_json::Value);

impl Serialize for Sorted<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};
        match self.0 {
            serde_json::Value::Object(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by_key(|(k, _)| k.as_str());
                let mut state = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    state.serialize_entry(key, &Sorted(value))?;
                }
                state.end()
            }
            serde_json::Value::Array(items) => {
                let mut state = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    state.serialize_element(&Sorted(item))?;
                }
                state.end()
            }
            other => other.serialize(serializer),
        }
    }
}
