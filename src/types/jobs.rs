//! Serverless job deployment types.

use serde::{Deserialize, Serialize};

use super::containers::{ComputeResource, Container, ContainerRegistrySettings};

/// Scaling limits of a job deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobScalingOptions {
    /// Maximum number of concurrent replicas.
    pub max_replica_count: u32,
    /// Lifetime of a queued job.
    pub queue_message_ttl_seconds: u32,
    /// Maximum run time of a single job.
    pub deadline_seconds: u32,
}

/// A serverless job deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDeployment {
    /// Deployment name.
    pub name: String,
    /// Containers.
    pub containers: Vec<Container>,
    /// Compute resource per replica.
    pub compute: ComputeResource,
    /// Registry settings.
    #[serde(default)]
    pub container_registry_settings: ContainerRegistrySettings,
    /// Scaling limits.
    #[serde(default)]
    pub scaling: Option<JobScalingOptions>,
    /// URL jobs are submitted to.
    #[serde(default)]
    pub endpoint_base_url: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Entry of the job deployment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDeploymentSummary {
    /// Deployment name.
    pub name: String,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Compute resource per replica.
    #[serde(default)]
    pub compute: Option<ComputeResource>,
}

/// Request to create a job deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJobDeploymentRequest {
    /// Deployment name.
    pub name: String,
    /// Containers.
    pub containers: Vec<Container>,
    /// Compute resource per replica.
    pub compute: ComputeResource,
    /// Registry settings.
    #[serde(default)]
    pub container_registry_settings: ContainerRegistrySettings,
    /// Scaling limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<JobScalingOptions>,
}

/// Partial update of a job deployment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateJobDeploymentRequest {
    /// New container list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<Vec<Container>>,
    /// New compute resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute: Option<ComputeResource>,
    /// New registry settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_registry_settings: Option<ContainerRegistrySettings>,
    /// New scaling limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<JobScalingOptions>,
}
