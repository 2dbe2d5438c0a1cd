//! Script identity fingerprints.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use sha1::Sha1;

/// Stable identity of a script file.
///
/// The name fingerprint links a file to its applied record across runs,
/// independent of content. The content fingerprint detects edits to a script
/// that has already been applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptIdentity {
    /// Lowercase hex MD5 (128-bit) of the file name.
    pub name_fingerprint: String,
    /// Lowercase hex SHA-1 (160-bit) of the full file content.
    pub content_fingerprint: String,
}

impl ScriptIdentity {
    /// Compute both fingerprints for a file.
    pub fn compute(name: &str, content: &str) -> Self {
        Self {
            name_fingerprint: name_fingerprint(name),
            content_fingerprint: content_fingerprint(content),
        }
    }
}

/// Hex MD5 of a script file name.
pub fn name_fingerprint(name: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(name.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hex SHA-1 of script content.
pub fn content_fingerprint(content: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
