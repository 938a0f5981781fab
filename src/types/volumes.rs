//! Volume types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::common::{lenient_opt_f64, Contract};

/// Storage class of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeType {
    /// Spinning disk.
    #[serde(rename = "HDD")]
    Hdd,
    /// NVMe SSD.
    #[serde(rename = "NVMe")]
    Nvme,
    /// Shared HDD filesystem.
    #[serde(rename = "HDD_Shared")]
    HddShared,
    /// Shared NVMe filesystem.
    #[serde(rename = "NVMe_Shared")]
    NvmeShared,
    /// Any type not known to this client.
    #[serde(other)]
    Other,
}

/// Lifecycle status of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeStatus {
    /// Order accepted.
    Ordered,
    /// Being created.
    Creating,
    /// Attached to an instance.
    Attached,
    /// Not attached.
    Detached,
    /// Being deleted.
    Deleting,
    /// Deleted and in the trash.
    Deleted,
    /// Being cloned.
    Cloning,
    /// Unrecoverable error.
    Error,
    /// Any status not known to this client.
    #[serde(other)]
    Unknown,
}

impl VolumeStatus {
    /// Wire name of the status, as used by the `status` list filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ordered => "ordered",
            Self::Creating => "creating",
            Self::Attached => "attached",
            Self::Detached => "detached",
            Self::Deleting => "deleting",
            Self::Deleted => "deleted",
            Self::Cloning => "cloning",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

/// A block or shared filesystem volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Volume ID.
    pub id: String,
    /// Instance the volume is attached to.
    #[serde(default)]
    pub instance_id: Option<String>,
    /// Name.
    pub name: String,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Current status.
    pub status: VolumeStatus,
    /// Size in GB.
    pub size: u32,
    /// Whether this is an OS volume.
    #[serde(default)]
    pub is_os_volume: bool,
    /// Device target, e.g. `vda`.
    #[serde(default)]
    pub target: Option<String>,
    /// Storage class.
    #[serde(rename = "type")]
    pub volume_type: VolumeType,
    /// Location code.
    #[serde(default)]
    pub location: String,
    /// Path for shared filesystems.
    #[serde(default)]
    pub pseudo_path: Option<String>,
    /// Mount command for shared filesystems.
    #[serde(default)]
    pub mount_command: Option<String>,
    /// Contract type.
    #[serde(default)]
    pub contract: Option<Contract>,
    /// Hourly price.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub base_hourly_cost: Option<f64>,
    /// Monthly price.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub monthly_price: Option<f64>,
    /// Billing currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Provider-defined fields not modelled here.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Request to create a volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVolumeRequest {
    /// Storage class.
    #[serde(rename = "type")]
    pub volume_type: VolumeType,
    /// Location code.
    pub location_code: String,
    /// Size in GB.
    pub size: u32,
    /// Name.
    pub name: String,
    /// Instance to attach to after creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    /// Instances to attach a shared volume to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_ids: Option<Vec<String>>,
}

impl CreateVolumeRequest {
    /// Creates a request for a detached volume.
    pub fn new(
        volume_type: VolumeType,
        location_code: impl Into<String>,
        size: u32,
        name: impl Into<String>,
    ) -> Self {
        Self {
            volume_type,
            location_code: location_code.into(),
            size,
            name: name.into(),
            instance_id: None,
            instance_ids: None,
        }
    }

    /// Attaches the new volume to an instance.
    pub fn attach_to(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }
}

/// Action applied to one or more volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeAction {
    /// Attach to an instance.
    Attach,
    /// Detach from its instance.
    Detach,
    /// Delete.
    Delete,
    /// Rename.
    Rename,
    /// Grow the volume.
    Resize,
    /// Clone.
    Clone,
    /// Cancel a pending operation.
    Cancel,
}

/// Body of `PUT /volumes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeActionRequest {
    /// Action to perform.
    pub action: VolumeAction,
    /// Target volume IDs.
    pub id: Vec<String>,
    /// Instance for `attach`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    /// Instances for attaching shared volumes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_ids: Option<Vec<String>>,
    /// New size for `resize`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// New name for `rename` and `clone`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Target type for `clone`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<VolumeType>,
    /// Target location for `clone`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_code: Option<String>,
    /// Skip the trash on `delete`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_permanent: Option<bool>,
}

impl VolumeActionRequest {
    /// Creates an action request for the given volumes.
    pub fn new<I, S>(action: VolumeAction, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action,
            id: ids.into_iter().map(Into::into).collect(),
            instance_id: None,
            instance_ids: None,
            size: None,
            name: None,
            volume_type: None,
            location_code: None,
            is_permanent: None,
        }
    }
}

/// Prices of a volume type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeTypePrice {
    /// Monthly price per GB.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub price_per_month_per_gb: Option<f64>,
    /// Hourly price per GB.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub cps_per_gb: Option<f64>,
    /// Billing currency.
    #[serde(default)]
    pub currency: Option<String>,
}

/// A volume type offered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeTypeInfo {
    /// Storage class.
    #[serde(rename = "type")]
    pub volume_type: VolumeType,
    /// Prices.
    #[serde(default)]
    pub price: Option<VolumeTypePrice>,
    /// Whether the type is a shared filesystem.
    #[serde(default)]
    pub is_shared_fs: bool,
    /// Provider-defined performance figures.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}
