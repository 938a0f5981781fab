//! Common types shared across resources.

use serde::{Deserialize, Deserializer, Serialize};

/// CPU descriptor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CpuSpec {
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// Number of vCPUs.
    #[serde(default)]
    pub number_of_cores: u32,
}

/// GPU descriptor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GpuSpec {
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// Number of GPUs.
    #[serde(default)]
    pub number_of_gpus: u32,
}

/// Memory descriptor, used for both RAM and GPU memory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MemorySpec {
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// Size in gigabytes.
    #[serde(default)]
    pub size_in_gigabytes: u32,
}

/// Storage descriptor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StorageSpec {
    /// Human readable description.
    #[serde(default)]
    pub description: String,
}

/// Capacity available per location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAvailability {
    /// Location code, e.g. `FIN-01`.
    pub location_code: String,
    /// Instance or cluster types with free capacity.
    #[serde(default)]
    pub availabilities: Vec<String>,
}

/// Contract type used when ordering capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Contract {
    /// Long-term commitment.
    LongTerm,
    /// Billed per use.
    PayAsYouGo,
    /// Spot capacity.
    Spot,
}

/// Pricing model used when ordering capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Pricing {
    /// Price fixed at order time.
    FixedPrice,
    /// Price follows demand.
    DynamicPrice,
}

/// Accepts numbers encoded either as JSON numbers or as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Self::Number(n) => Ok(n),
            Self::String(s) => s.trim().parse().map_err(E::custom),
        }
    }
}

/// Prices are sent as strings by some endpoints and as numbers by others.
pub(crate) fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    NumberOrString::deserialize(deserializer)?.into_f64()
}

pub(crate) fn lenient_opt_f64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(NumberOrString::into_f64)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Price {
        #[serde(deserialize_with = "lenient_f64")]
        hourly: f64,
        #[serde(default, deserialize_with = "lenient_opt_f64")]
        spot: Option<f64>,
    }

    #[test]
    fn test_lenient_numbers() {
        let price: Price = serde_json::from_str(r#"{"hourly":"1.25","spot":0.5}"#).unwrap();
        assert_eq!(price.hourly, 1.25);
        assert_eq!(price.spot, Some(0.5));

        let price: Price = serde_json::from_str(r#"{"hourly":2}"#).unwrap();
        assert_eq!(price.hourly, 2.0);
        assert_eq!(price.spot, None);

        assert!(serde_json::from_str::<Price>(r#"{"hourly":"cheap"}"#).is_err());
    }

    #[test]
    fn test_contract_wire_names() {
        assert_eq!(
            serde_json::to_string(&Contract::PayAsYouGo).unwrap(),
            "\"PAY_AS_YOU_GO\""
        );
        assert_eq!(
            serde_json::to_string(&Pricing::DynamicPrice).unwrap(),
            "\"DYNAMIC_PRICE\""
        );
    }
}
