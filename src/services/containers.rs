//! Container deployments service.
//!
//! Also covers the project-wide resources deployments depend on: secrets,
//! registry credentials and the serverless compute catalogue.

use async_trait::async_trait;

use super::segment;
use crate::client::{json_body, RequestPipeline};
use crate::errors::ClientResult;
use crate::transport::Method;
use crate::types::containers::{
    ContainerDeployment, ContainerEnvVars, CreateDeploymentRequest,
    CreateRegistryCredentialsRequest, CreateSecretRequest, DeleteEnvVarsRequest,
    DeploymentStatus, RegistryCredentials, ReplicaList, ScalingOptions, Secret,
    ServerlessComputeResource, UpdateDeploymentRequest,
};

const DEPLOYMENTS: &str = "/container-deployments";

/// Container deployments service trait.
#[async_trait]
pub trait ContainersService: Send + Sync {
    /// Lists deployments.
    async fn list(&self) -> ClientResult<Vec<ContainerDeployment>>;

    /// Retrieves a deployment by name.
    async fn get(&self, name: &str) -> ClientResult<ContainerDeployment>;

    /// Creates a deployment.
    async fn create(&self, request: &CreateDeploymentRequest)
        -> ClientResult<ContainerDeployment>;

    /// Partially updates a deployment.
    async fn update(
        &self,
        name: &str,
        request: &UpdateDeploymentRequest,
    ) -> ClientResult<ContainerDeployment>;

    /// Deletes a deployment.
    async fn delete(&self, name: &str) -> ClientResult<()>;

    /// Returns the rollout status.
    async fn status(&self, name: &str) -> ClientResult<DeploymentStatus>;

    /// Restarts all replicas.
    async fn restart(&self, name: &str) -> ClientResult<()>;

    /// Pauses a deployment.
    async fn pause(&self, name: &str) -> ClientResult<()>;

    /// Resumes a paused deployment.
    async fn resume(&self, name: &str) -> ClientResult<()>;

    /// Drops all queued requests.
    async fn purge_queue(&self, name: &str) -> ClientResult<()>;

    /// Returns the autoscaling settings.
    async fn scaling(&self, name: &str) -> ClientResult<ScalingOptions>;

    /// Replaces the autoscaling settings.
    async fn update_scaling(
        &self,
        name: &str,
        scaling: &ScalingOptions,
    ) -> ClientResult<ScalingOptions>;

    /// Lists running replicas.
    async fn replicas(&self, name: &str) -> ClientResult<ReplicaList>;

    /// Lists environment variables per container.
    async fn environment_variables(&self, name: &str) -> ClientResult<Vec<ContainerEnvVars>>;

    /// Adds environment variables to a container.
    async fn add_environment_variables(
        &self,
        name: &str,
        variables: &ContainerEnvVars,
    ) -> ClientResult<()>;

    /// Updates environment variables of a container.
    async fn update_environment_variables(
        &self,
        name: &str,
        variables: &ContainerEnvVars,
    ) -> ClientResult<()>;

    /// Removes environment variables from a container.
    async fn delete_environment_variables(
        &self,
        name: &str,
        request: &DeleteEnvVarsRequest,
    ) -> ClientResult<()>;

    /// Lists secrets.
    async fn secrets(&self) -> ClientResult<Vec<Secret>>;

    /// Stores a secret.
    async fn create_secret(&self, request: &CreateSecretRequest) -> ClientResult<()>;

    /// Deletes a secret.
    async fn delete_secret(&self, secret_name: &str) -> ClientResult<()>;

    /// Lists stored registry credentials.
    async fn registry_credentials(&self) -> ClientResult<Vec<RegistryCredentials>>;

    /// Stores registry credentials.
    async fn create_registry_credentials(
        &self,
        request: &CreateRegistryCredentialsRequest,
    ) -> ClientResult<()>;

    /// Deletes registry credentials.
    async fn delete_registry_credentials(&self, credentials_name: &str) -> ClientResult<()>;

    /// Lists compute resources available to serverless workloads.
    async fn compute_resources(&self) -> ClientResult<Vec<ServerlessComputeResource>>;
}

/// Default implementation of the container deployments service.
pub struct DefaultContainersService<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> DefaultContainersService<'a> {
    /// Creates a new container deployments service.
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }

    fn path(name: &str, suffix: &str) -> String {
        format!("{}/{}{}", DEPLOYMENTS, segment(name), suffix)
    }
}

#[async_trait]
impl ContainersService for DefaultContainersService<'_> {
    async fn list(&self) -> ClientResult<Vec<ContainerDeployment>> {
        self.pipeline.get(DEPLOYMENTS).await
    }

    async fn get(&self, name: &str) -> ClientResult<ContainerDeployment> {
        self.pipeline.get(&Self::path(name, "")).await
    }

    async fn create(
        &self,
        request: &CreateDeploymentRequest,
    ) -> ClientResult<ContainerDeployment> {
        self.pipeline.post(DEPLOYMENTS, request).await
    }

    async fn update(
        &self,
        name: &str,
        request: &UpdateDeploymentRequest,
    ) -> ClientResult<ContainerDeployment> {
        self.pipeline.patch(&Self::path(name, ""), request).await
    }

    async fn delete(&self, name: &str) -> ClientResult<()> {
        self.pipeline.delete(&Self::path(name, "")).await
    }

    async fn status(&self, name: &str) -> ClientResult<DeploymentStatus> {
        self.pipeline.get(&Self::path(name, "/status")).await
    }

    async fn restart(&self, name: &str) -> ClientResult<()> {
        self.pipeline
            .post_action(&Self::path(name, "/restart"))
            .await
    }

    async fn pause(&self, name: &str) -> ClientResult<()> {
        self.pipeline.post_action(&Self::path(name, "/pause")).await
    }

    async fn resume(&self, name: &str) -> ClientResult<()> {
        self.pipeline.post_action(&Self::path(name, "/resume")).await
    }

    async fn purge_queue(&self, name: &str) -> ClientResult<()> {
        self.pipeline
            .post_action(&Self::path(name, "/purge-queue"))
            .await
    }

    async fn scaling(&self, name: &str) -> ClientResult<ScalingOptions> {
        self.pipeline.get(&Self::path(name, "/scaling")).await
    }

    async fn update_scaling(
        &self,
        name: &str,
        scaling: &ScalingOptions,
    ) -> ClientResult<ScalingOptions> {
        self.pipeline
            .patch(&Self::path(name, "/scaling"), scaling)
            .await
    }

    async fn replicas(&self, name: &str) -> ClientResult<ReplicaList> {
        self.pipeline.get(&Self::path(name, "/replicas")).await
    }

    async fn environment_variables(&self, name: &str) -> ClientResult<Vec<ContainerEnvVars>> {
        self.pipeline
            .get(&Self::path(name, "/environment-variables"))
            .await
    }

    async fn add_environment_variables(
        &self,
        name: &str,
        variables: &ContainerEnvVars,
    ) -> ClientResult<()> {
        self.pipeline
            .post_empty(&Self::path(name, "/environment-variables"), variables)
            .await
    }

    async fn update_environment_variables(
        &self,
        name: &str,
        variables: &ContainerEnvVars,
    ) -> ClientResult<()> {
        self.pipeline
            .execute_empty(
                Method::Patch,
                &Self::path(name, "/environment-variables"),
                Some(json_body(variables)?),
            )
            .await
    }

    async fn delete_environment_variables(
        &self,
        name: &str,
        request: &DeleteEnvVarsRequest,
    ) -> ClientResult<()> {
        self.pipeline
            .delete_with_body(&Self::path(name, "/environment-variables"), request)
            .await
    }

    async fn secrets(&self) -> ClientResult<Vec<Secret>> {
        self.pipeline.get("/secrets").await
    }

    async fn create_secret(&self, request: &CreateSecretRequest) -> ClientResult<()> {
        self.pipeline.post_empty("/secrets", request).await
    }

    async fn delete_secret(&self, secret_name: &str) -> ClientResult<()> {
        self.pipeline
            .delete(&format!("/secrets/{}", segment(secret_name)))
            .await
    }

    async fn registry_credentials(&self) -> ClientResult<Vec<RegistryCredentials>> {
        self.pipeline.get("/container-registry-credentials").await
    }

    async fn create_registry_credentials(
        &self,
        request: &CreateRegistryCredentialsRequest,
    ) -> ClientResult<()> {
        self.pipeline
            .post_empty("/container-registry-credentials", request)
            .await
    }

    async fn delete_registry_credentials(&self, credentials_name: &str) -> ClientResult<()> {
        self.pipeline
            .delete(&format!(
                "/container-registry-credentials/{}",
                segment(credentials_name)
            ))
            .await
    }

    async fn compute_resources(&self) -> ClientResult<Vec<ServerlessComputeResource>> {
        self.pipeline.get("/serverless-compute-resources").await
    }
}
