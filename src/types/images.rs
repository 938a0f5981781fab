//! OS image types.

use serde::{Deserialize, Serialize};

/// An OS image usable for instances or clusters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image ID.
    pub id: String,
    /// Image type identifier passed as `image` when deploying.
    pub image_type: String,
    /// Display name.
    pub name: String,
    /// Whether this is the default image.
    #[serde(default)]
    pub is_default: bool,
    /// Feature notes.
    #[serde(default)]
    pub details: Vec<String>,
    /// Whether the image is meant for clusters.
    #[serde(default)]
    pub is_cluster: bool,
    /// Category, e.g. `ubuntu`.
    #[serde(default)]
    pub category: Option<String>,
}
