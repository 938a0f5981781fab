//! Instance types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::common::{lenient_f64, Contract, CpuSpec, GpuSpec, MemorySpec, Pricing, StorageSpec};

/// Lifecycle status of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    /// Order accepted.
    Ordered,
    /// Being provisioned.
    Provisioning,
    /// Validating the order.
    Validating,
    /// Up and running.
    Running,
    /// Shut down.
    Offline,
    /// Being deleted.
    Deleting,
    /// Discontinued.
    Discontinued,
    /// No capacity was available.
    NoCapacity,
    /// Image installation failed.
    InstallationFailed,
    /// Provisioning or runtime error.
    Error,
    /// Any status not known to this client.
    #[serde(other)]
    Unknown,
}

impl InstanceStatus {
    /// Wire name of the status, as used by the `status` list filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ordered => "ordered",
            Self::Provisioning => "provisioning",
            Self::Validating => "validating",
            Self::Running => "running",
            Self::Offline => "offline",
            Self::Deleting => "deleting",
            Self::Discontinued => "discontinued",
            Self::NoCapacity => "no_capacity",
            Self::InstallationFailed => "installation_failed",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

/// A compute instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance ID.
    pub id: String,
    /// Instance type, e.g. `1V100.6V`.
    pub instance_type: String,
    /// OS image.
    #[serde(default)]
    pub image: String,
    /// Hourly price.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_per_hour: f64,
    /// Hostname.
    pub hostname: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Public IP address, once assigned.
    #[serde(default)]
    pub ip: Option<String>,
    /// Current status.
    pub status: InstanceStatus,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// SSH keys installed on the instance.
    #[serde(default)]
    pub ssh_key_ids: Vec<String>,
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
    /// Location code.
    #[serde(default)]
    pub location: String,
    /// ID of the OS volume.
    #[serde(default)]
    pub os_volume_id: Option<String>,
    /// Startup script run at first boot.
    #[serde(default)]
    pub startup_script_id: Option<String>,
    /// Whether this is a spot instance.
    #[serde(default)]
    pub is_spot: bool,
    /// Contract type.
    #[serde(default)]
    pub contract: Option<Contract>,
    /// Pricing model.
    #[serde(default)]
    pub pricing: Option<Pricing>,
    /// Provider-defined fields not modelled here.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// OS volume settings for a new instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsVolume {
    /// Volume name.
    pub name: String,
    /// Size in GB.
    pub size: u32,
}

/// Data volume created together with an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstanceVolume {
    /// Volume name.
    pub name: String,
    /// Size in GB.
    pub size: u32,
    /// Volume type, e.g. `NVMe`.
    #[serde(rename = "type")]
    pub volume_type: String,
}

/// Request to deploy a new instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInstanceRequest {
    /// Instance type.
    pub instance_type: String,
    /// OS image or the ID of an existing OS volume.
    pub image: String,
    /// Hostname.
    pub hostname: String,
    /// Description.
    pub description: String,
    /// SSH keys to install.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssh_key_ids: Vec<String>,
    /// Location code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_code: Option<String>,
    /// OS volume settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_volume: Option<OsVolume>,
    /// New data volumes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<NewInstanceVolume>,
    /// Existing volumes to attach.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub existing_volumes: Vec<String>,
    /// Startup script to run at first boot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_script_id: Option<String>,
    /// Request spot capacity.
    #[serde(default)]
    pub is_spot: bool,
    /// Contract type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<Contract>,
    /// Pricing model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    /// Coupon code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<String>,
}

impl CreateInstanceRequest {
    /// Creates a request with the required fields.
    pub fn new(
        instance_type: impl Into<String>,
        image: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        let hostname = hostname.into();
        Self {
            instance_type: instance_type.into(),
            image: image.into(),
            description: hostname.clone(),
            hostname,
            ssh_key_ids: Vec::new(),
            location_code: None,
            os_volume: None,
            volumes: Vec::new(),
            existing_volumes: Vec::new(),
            startup_script_id: None,
            is_spot: false,
            contract: None,
            pricing: None,
            coupon: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds an SSH key.
    pub fn with_ssh_key(mut self, ssh_key_id: impl Into<String>) -> Self {
        self.ssh_key_ids.push(ssh_key_id.into());
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, location_code: impl Into<String>) -> Self {
        self.location_code = Some(location_code.into());
        self
    }

    /// Sets the OS volume.
    pub fn with_os_volume(mut self, name: impl Into<String>, size: u32) -> Self {
        self.os_volume = Some(OsVolume {
            name: name.into(),
            size,
        });
        self
    }

    /// Sets the startup script.
    pub fn with_startup_script(mut self, script_id: impl Into<String>) -> Self {
        self.startup_script_id = Some(script_id.into());
        self
    }

    /// Requests spot capacity.
    pub fn spot(mut self) -> Self {
        self.is_spot = true;
        self
    }
}

/// Action applied to one or more instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceAction {
    /// Boot a shut-down instance.
    Boot,
    /// Start an instance.
    Start,
    /// Shut an instance down.
    Shutdown,
    /// Delete an instance.
    Delete,
    /// Discontinue an instance.
    Discontinue,
    /// Hibernate an instance.
    Hibernate,
    /// Configure spot behaviour.
    ConfigureSpot,
    /// Force a shutdown.
    ForceShutdown,
    /// Delete an instance stuck in a transitional state.
    DeleteStuck,
    /// Deploy a hibernated instance.
    Deploy,
    /// Transfer an instance.
    Transfer,
}

/// Body of `PUT /instances`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceActionRequest {
    /// Action to perform.
    pub action: InstanceAction,
    /// Target instance IDs.
    pub id: Vec<String>,
    /// Volumes to delete together with the instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_ids: Option<Vec<String>>,
    /// Skip the trash and delete volumes permanently.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_permanently: Option<bool>,
}

impl InstanceActionRequest {
    /// Creates an action request for the given instances.
    pub fn new<I, S>(action: InstanceAction, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action,
            id: ids.into_iter().map(Into::into).collect(),
            volume_ids: None,
            delete_permanently: None,
        }
    }

    /// Deletes the given volumes together with the instances.
    pub fn with_volumes(mut self, volume_ids: Vec<String>, delete_permanently: bool) -> Self {
        self.volume_ids = Some(volume_ids);
        self.delete_permanently = Some(delete_permanently);
        self
    }
}
