//! SSH key types.

use serde::{Deserialize, Serialize};

/// A stored SSH public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshKey {
    /// Key ID.
    pub id: String,
    /// Name.
    pub name: String,
    /// Public key material.
    pub key: String,
}

/// Request to store a public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSshKeyRequest {
    /// Name.
    pub name: String,
    /// Public key material.
    pub key: String,
}

impl CreateSshKeyRequest {
    /// Creates a new request.
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

/// Body of `DELETE /sshkeys`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSshKeysRequest {
    /// Keys to delete.
    pub keys: Vec<String>,
}
