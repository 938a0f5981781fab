//! Cluster types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::common::{lenient_opt_f64, Contract, Pricing};

/// A node belonging to a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterWorkerNode {
    /// Node ID.
    pub id: String,
    /// Hostname.
    pub hostname: String,
    /// Node status.
    #[serde(default)]
    pub status: String,
    /// Address on the cluster network.
    #[serde(default)]
    pub private_ip: Option<String>,
}

/// A multi-node cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster ID.
    pub id: String,
    /// Hostname of the head node.
    pub hostname: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Current status.
    pub status: String,
    /// Cluster type.
    pub cluster_type: String,
    /// OS image.
    #[serde(default)]
    pub image: String,
    /// Location code.
    #[serde(default)]
    pub location: String,
    /// Hourly price.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub price_per_hour: Option<f64>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Public IP of the head node.
    #[serde(default)]
    pub ip: Option<String>,
    /// SSH keys installed on the nodes.
    #[serde(default)]
    pub ssh_key_ids: Vec<String>,
    /// Worker nodes.
    #[serde(default)]
    pub worker_nodes: Vec<ClusterWorkerNode>,
    /// Provider-defined fields not modelled here.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Shared filesystem created together with a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedVolumeSpec {
    /// Volume name.
    pub name: String,
    /// Size in GB.
    pub size: u32,
}

/// Request to deploy a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateClusterRequest {
    /// Cluster type.
    pub cluster_type: String,
    /// OS image.
    pub image: String,
    /// Hostname of the head node.
    pub hostname: String,
    /// Description.
    pub description: String,
    /// SSH keys to install.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssh_key_ids: Vec<String>,
    /// Location code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_code: Option<String>,
    /// Startup script to run on each node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_script_id: Option<String>,
    /// Shared filesystem to create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_volume: Option<SharedVolumeSpec>,
    /// Existing shared volumes to mount.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub existing_volumes: Vec<String>,
    /// Contract type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<Contract>,
    /// Pricing model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
}

impl CreateClusterRequest {
    /// Creates a request with the required fields.
    pub fn new(
        cluster_type: impl Into<String>,
        image: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        let hostname = hostname.into();
        Self {
            cluster_type: cluster_type.into(),
            image: image.into(),
            description: hostname.clone(),
            hostname,
            ssh_key_ids: Vec::new(),
            location_code: None,
            startup_script_id: None,
            shared_volume: None,
            existing_volumes: Vec::new(),
            contract: None,
            pricing: None,
        }
    }
}

/// Response of `POST /clusters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClusterResponse {
    /// ID of the new cluster.
    pub id: String,
}

/// Action applied to one or more clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterAction {
    /// Delete the cluster and its nodes.
    Delete,
}

/// Body of `PUT /clusters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterActionRequest {
    /// Action to perform.
    pub action: ClusterAction,
    /// Target cluster IDs.
    pub id: Vec<String>,
}

/// A cluster type offered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterType {
    /// Type name.
    pub cluster_type: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Hourly price.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub price_per_hour: Option<f64>,
    /// Billing currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// GPU manufacturer.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Per-node hardware notes.
    #[serde(default)]
    pub node_details: Vec<String>,
    /// Images this type supports.
    #[serde(default)]
    pub supported_os: Vec<String>,
}
