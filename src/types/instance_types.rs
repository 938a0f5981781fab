//! Instance type and pricing types.

use serde::{Deserialize, Serialize};

use super::common::{lenient_f64, lenient_opt_f64, CpuSpec, GpuSpec, MemorySpec, StorageSpec};

/// An orderable instance type with its prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceType {
    /// Type ID.
    pub id: String,
    /// Type name, e.g. `8H100.80S.176V`.
    pub instance_type: String,
    /// Hourly on-demand price.
    #[serde(deserialize_with = "lenient_f64")]
    pub price_per_hour: f64,
    /// Hourly spot price.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub spot_price: Option<f64>,
    /// Current dynamic price.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub dynamic_price: Option<f64>,
    /// Ceiling of the dynamic price.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub max_dynamic_price: Option<f64>,
    /// Hourly serverless price.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub serverless_price: Option<f64>,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// CPU details.
    #[serde(default)]
    pub cpu: CpuSpec,
    /// GPU details.
    #[serde(default)]
    pub gpu: GpuSpec,
    /// RAM details.
    #[serde(default)]
    pub memory: MemorySpec,
    /// GPU memory details.
    #[serde(default)]
    pub gpu_memory: MemorySpec,
    /// Storage details.
    #[serde(default)]
    pub storage: StorageSpec,
    /// Billing currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// GPU manufacturer.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Images this type supports.
    #[serde(default)]
    pub supported_os: Vec<String>,
}

impl InstanceType {
    /// Hourly price for the requested capacity kind.
    pub fn hourly_price(&self, is_spot: bool) -> f64 {
        if is_spot {
            self.spot_price.unwrap_or(self.price_per_hour)
        } else {
            self.price_per_hour
        }
    }

    /// Cost of running the type for `hours` hours.
    pub fn estimate_cost(&self, hours: f64, is_spot: bool) -> f64 {
        self.hourly_price(is_spot) * hours
    }
}
