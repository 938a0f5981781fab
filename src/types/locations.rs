//! Datacenter location types.

use serde::{Deserialize, Serialize};

/// A datacenter location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Location code, e.g. `FIN-01`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// ISO country code.
    #[serde(default)]
    pub country_code: String,
}
