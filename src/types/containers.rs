//! Container deployment types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Health check settings of a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthcheckSettings {
    /// Whether health checks run.
    pub enabled: bool,
    /// Port probed, defaults to the exposed port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// HTTP path probed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Overrides of the image's entrypoint and command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrypointOverrides {
    /// Whether the overrides apply.
    pub enabled: bool,
    /// Entrypoint override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<Vec<String>>,
    /// Command override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<Vec<String>>,
}

/// How the value of an environment variable is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvVarKind {
    /// The value is used as-is.
    Plain,
    /// The value names a stored secret.
    Secret,
}

/// An environment variable of a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    /// Variable name.
    pub name: String,
    /// Literal value or secret name, depending on `kind`.
    pub value_or_reference_to_secret: String,
    /// Interpretation of the value.
    #[serde(rename = "type")]
    pub kind: EnvVarKind,
}

impl EnvVar {
    /// A variable with a literal value.
    pub fn plain(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_or_reference_to_secret: value.into(),
            kind: EnvVarKind::Plain,
        }
    }

    /// A variable whose value is read from a secret.
    pub fn secret(name: impl Into<String>, secret_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_or_reference_to_secret: secret_name.into(),
            kind: EnvVarKind::Secret,
        }
    }
}

/// A volume mounted into a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VolumeMount {
    /// Ephemeral scratch space.
    Scratch {
        /// Mount point.
        mount_path: String,
    },
    /// Files materialised from a secret.
    Secret {
        /// Mount point.
        mount_path: String,
        /// Secret providing the files.
        secret_name: String,
        /// Subset of files to mount.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_names: Option<Vec<String>>,
    },
    /// A shared filesystem volume.
    Shared {
        /// Mount point.
        mount_path: String,
        /// ID of the shared volume.
        volume_id: String,
    },
    /// RAM-backed storage.
    Memory {
        /// Mount point.
        mount_path: String,
        /// Size in MB.
        size_in_mb: u32,
    },
}

/// A container within a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Container name, assigned by the provider when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Image reference.
    pub image: String,
    /// Port receiving requests.
    pub exposed_port: u16,
    /// Health check settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<HealthcheckSettings>,
    /// Entrypoint overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint_overrides: Option<EntrypointOverrides>,
    /// Environment variables.
    #[serde(default)]
    pub env: Vec<EnvVar>,
    /// Volume mounts.
    #[serde(default)]
    pub volume_mounts: Vec<VolumeMount>,
}

impl Container {
    /// Creates a container exposing `port`.
    pub fn new(image: impl Into<String>, exposed_port: u16) -> Self {
        Self {
            name: None,
            image: image.into(),
            exposed_port,
            healthcheck: None,
            entrypoint_overrides: None,
            env: Vec::new(),
            volume_mounts: Vec::new(),
        }
    }
}

/// Compute resource backing each replica.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeResource {
    /// Resource name, e.g. `H100`.
    pub name: String,
    /// Number of units per replica.
    pub size: u32,
}

/// Reference to stored registry credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryCredentialsRef {
    /// Name of the stored credentials.
    pub name: String,
}

/// Registry access settings of a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContainerRegistrySettings {
    /// Whether the registry requires credentials.
    pub is_private: bool,
    /// Credentials used for private registries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<RegistryCredentialsRef>,
}

/// Delay applied before scaling in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingPolicy {
    /// Delay in seconds.
    pub delay_seconds: u32,
}

/// Queue-length based trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueLoadTrigger {
    /// Queued requests per replica above which to scale up.
    pub threshold: f64,
}

/// Utilization based trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationTrigger {
    /// Whether the trigger is active.
    pub enabled: bool,
    /// Utilization percentage above which to scale up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

/// Triggers that drive autoscaling.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScalingTriggers {
    /// Queue load trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_load: Option<QueueLoadTrigger>,
    /// CPU utilization trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_utilization: Option<UtilizationTrigger>,
    /// GPU utilization trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_utilization: Option<UtilizationTrigger>,
    /// Provider-defined triggers not modelled here.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Autoscaling settings of a deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingOptions {
    /// Minimum number of replicas.
    pub min_replica_count: u32,
    /// Maximum number of replicas.
    pub max_replica_count: u32,
    /// Scale-down delay.
    pub scale_down_policy: ScalingPolicy,
    /// Scale-up delay.
    pub scale_up_policy: ScalingPolicy,
    /// Lifetime of a queued request.
    pub queue_message_ttl_seconds: u32,
    /// Requests served in parallel by one replica.
    pub concurrent_requests_per_replica: u32,
    /// Scaling triggers.
    #[serde(default)]
    pub scaling_triggers: ScalingTriggers,
}

/// A container deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerDeployment {
    /// Deployment name, unique per project.
    pub name: String,
    /// Containers.
    pub containers: Vec<Container>,
    /// Compute resource per replica.
    pub compute: ComputeResource,
    /// Registry settings.
    #[serde(default)]
    pub container_registry_settings: ContainerRegistrySettings,
    /// Whether replicas run on spot capacity.
    #[serde(default)]
    pub is_spot: bool,
    /// Autoscaling settings.
    #[serde(default)]
    pub scaling: Option<ScalingOptions>,
    /// URL requests are sent to.
    #[serde(default)]
    pub endpoint_base_url: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Request to create a container deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDeploymentRequest {
    /// Deployment name.
    pub name: String,
    /// Containers.
    pub containers: Vec<Container>,
    /// Compute resource per replica.
    pub compute: ComputeResource,
    /// Registry settings.
    #[serde(default)]
    pub container_registry_settings: ContainerRegistrySettings,
    /// Whether replicas run on spot capacity.
    #[serde(default)]
    pub is_spot: bool,
    /// Autoscaling settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<ScalingOptions>,
}

/// Partial update of a container deployment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateDeploymentRequest {
    /// New container list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<Vec<Container>>,
    /// New compute resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute: Option<ComputeResource>,
    /// New registry settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_registry_settings: Option<ContainerRegistrySettings>,
    /// Spot flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_spot: Option<bool>,
    /// New autoscaling settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<ScalingOptions>,
}

/// Rollout status of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    /// Starting up.
    Initializing,
    /// Serving.
    Healthy,
    /// Failing health checks.
    Degraded,
    /// Stopped by the user.
    Paused,
    /// Scaled to zero.
    Offline,
    /// Unrecoverable error.
    Error,
    /// Any status not known to this client.
    #[serde(other)]
    Unknown,
}

/// Response of the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStatus {
    /// Current status.
    pub status: DeploymentState,
}

/// A running replica.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaInfo {
    /// Replica ID.
    pub id: String,
    /// Replica status.
    pub status: String,
    /// Start timestamp.
    #[serde(default)]
    pub started_at: Option<String>,
}

/// Response of the replicas endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaList {
    /// Replicas.
    #[serde(default)]
    pub list: Vec<ReplicaInfo>,
}

/// Environment variables of one container of a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEnvVars {
    /// Container name.
    pub container_name: String,
    /// Variables.
    #[serde(default)]
    pub env: Vec<EnvVar>,
}

/// Body removing environment variables from a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEnvVarsRequest {
    /// Container name.
    pub container_name: String,
    /// Names of the variables to remove.
    pub env: Vec<String>,
}

/// A stored secret. The value is never returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    /// Secret name.
    pub name: String,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Secret type, e.g. `generic` or `file`.
    #[serde(default)]
    pub secret_type: Option<String>,
}

/// Request to store a secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSecretRequest {
    /// Secret name.
    pub name: String,
    /// Secret value.
    pub value: String,
}

impl std::fmt::Debug for CreateSecretRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateSecretRequest")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Stored container registry credentials. Secrets are never returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryCredentials {
    /// Credentials name.
    pub name: String,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Registry-specific credential material.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryCredentialsKind {
    /// Docker Hub.
    Dockerhub {
        /// Account name.
        username: String,
        /// Access token.
        access_token: String,
    },
    /// GitHub container registry.
    Ghcr {
        /// Account name.
        username: String,
        /// Access token.
        access_token: String,
    },
    /// Google container registry.
    Gcr {
        /// Service account key JSON.
        service_account_key: String,
    },
    /// AWS elastic container registry.
    AwsEcr {
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
        /// Repository URL.
        ecr_repo: String,
    },
    /// Any registry, configured with a Docker config file.
    Custom {
        /// Contents of `config.json`.
        docker_config_json: String,
    },
}

impl std::fmt::Debug for RegistryCredentialsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Dockerhub { .. } => "dockerhub",
            Self::Ghcr { .. } => "ghcr",
            Self::Gcr { .. } => "gcr",
            Self::AwsEcr { .. } => "aws_ecr",
            Self::Custom { .. } => "custom",
        };
        write!(f, "RegistryCredentialsKind({kind}, [REDACTED])")
    }
}

/// Request to store registry credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRegistryCredentialsRequest {
    /// Credentials name.
    pub name: String,
    /// Credential material.
    #[serde(flatten)]
    pub credentials: RegistryCredentialsKind,
}

/// A compute resource available to serverless workloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerlessComputeResource {
    /// Resource name.
    pub name: String,
    /// Units per replica.
    pub size: u32,
    /// Whether capacity is currently available.
    #[serde(default)]
    pub is_available: bool,
}
