//! Serverless jobs service.

use async_trait::async_trait;

use super::segment;
use crate::client::RequestPipeline;
use crate::errors::ClientResult;
use crate::types::containers::DeploymentStatus;
use crate::types::jobs::{
    CreateJobDeploymentRequest, JobDeployment, JobDeploymentSummary, JobScalingOptions,
    UpdateJobDeploymentRequest,
};

const JOB_DEPLOYMENTS: &str = "/job-deployments";

/// Serverless jobs service trait.
#[async_trait]
pub trait JobsService: Send + Sync {
    /// Lists job deployments.
    async fn list(&self) -> ClientResult<Vec<JobDeploymentSummary>>;

    /// Retrieves a job deployment by name.
    async fn get(&self, name: &str) -> ClientResult<JobDeployment>;

    /// Creates a job deployment.
    async fn create(&self, request: &CreateJobDeploymentRequest) -> ClientResult<JobDeployment>;

    /// Partially updates a job deployment.
    async fn update(
        &self,
        name: &str,
        request: &UpdateJobDeploymentRequest,
    ) -> ClientResult<JobDeployment>;

    /// Deletes a job deployment.
    async fn delete(&self, name: &str) -> ClientResult<()>;

    /// Returns the deployment status.
    async fn status(&self, name: &str) -> ClientResult<DeploymentStatus>;

    /// Returns the scaling limits.
    async fn scaling(&self, name: &str) -> ClientResult<JobScalingOptions>;

    /// Pauses a job deployment.
    async fn pause(&self, name: &str) -> ClientResult<()>;

    /// Resumes a paused job deployment.
    async fn resume(&self, name: &str) -> ClientResult<()>;

    /// Drops all queued jobs.
    async fn purge_queue(&self, name: &str) -> ClientResult<()>;
}

/// Default implementation of the serverless jobs service.
pub struct DefaultJobsService<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> DefaultJobsService<'a> {
    /// Creates a new serverless jobs service.
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }

    fn path(name: &str, suffix: &str) -> String {
        format!("{}/{}{}", JOB_DEPLOYMENTS, segment(name), suffix)
    }
}

#[async_trait]
impl JobsService for DefaultJobsService<'_> {
    async fn list(&self) -> ClientResult<Vec<JobDeploymentSummary>> {
        self.pipeline.get(JOB_DEPLOYMENTS).await
    }

    async fn get(&self, name: &str) -> ClientResult<JobDeployment> {
        self.pipeline.get(&Self::path(name, "")).await
    }

    async fn create(&self, request: &CreateJobDeploymentRequest) -> ClientResult<JobDeployment> {
        self.pipeline.post(JOB_DEPLOYMENTS, request).await
    }

    async fn update(
        &self,
        name: &str,
        request: &UpdateJobDeploymentRequest,
    ) -> ClientResult<JobDeployment> {
        self.pipeline.patch(&Self::path(name, ""), request).await
    }

    async fn delete(&self, name: &str) -> ClientResult<()> {
        self.pipeline.delete(&Self::path(name, "")).await
    }

    async fn status(&self, name: &str) -> ClientResult<DeploymentStatus> {
        self.pipeline.get(&Self::path(name, "/status")).await
    }

    async fn scaling(&self, name: &str) -> ClientResult<JobScalingOptions> {
        self.pipeline.get(&Self::path(name, "/scaling")).await
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
}
