//! Startup script types.

use serde::{Deserialize, Serialize};

/// A script run on an instance's first boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupScript {
    /// Script ID.
    pub id: String,
    /// Name.
    pub name: String,
    /// Script body.
    pub script: String,
}

/// Request to store a startup script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStartupScriptRequest {
    /// Name.
    pub name: String,
    /// Script body.
    pub script: String,
}

impl CreateStartupScriptRequest {
    /// Creates a new request.
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
        }
    }
}

/// Body of `DELETE /scripts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteStartupScriptsRequest {
    /// Scripts to delete.
    pub scripts: Vec<String>,
}
