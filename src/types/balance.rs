//! Account balance types.

use serde::{Deserialize, Serialize};

use super::common::lenient_f64;

/// Remaining project balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Amount left.
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
    /// Currency, e.g. `usd`.
    pub currency: String,
}
