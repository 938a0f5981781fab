//! Clusters service.

use async_trait::async_trait;

use super::{segment, with_query};
use crate::client::RequestPipeline;
use crate::errors::ClientResult;
use crate::types::clusters::{
    Cluster, ClusterAction, ClusterActionRequest, ClusterType, CreateClusterRequest,
    CreateClusterResponse,
};
use crate::types::common::LocationAvailability;

/// Clusters service trait.
#[async_trait]
pub trait ClustersService: Send + Sync {
    /// Lists clusters.
    async fn list(&self) -> ClientResult<Vec<Cluster>>;

    /// Retrieves a cluster.
    async fn get(&self, cluster_id: &str) -> ClientResult<Cluster>;

    /// Deploys a cluster and returns its ID.
    async fn create(&self, request: &CreateClusterRequest) -> ClientResult<String>;

    /// Applies an action to one or more clusters.
    async fn action(&self, request: &ClusterActionRequest) -> ClientResult<()>;

    /// Lists cluster types.
    async fn types(&self) -> ClientResult<Vec<ClusterType>>;

    /// Checks whether a cluster type has free capacity.
    async fn is_available(
        &self,
        cluster_type: &str,
        location_code: Option<&str>,
    ) -> ClientResult<bool>;

    /// Lists free cluster capacity per location.
    async fn availabilities(
        &self,
        location_code: Option<&str>,
    ) -> ClientResult<Vec<LocationAvailability>>;

    /// Deletes a cluster.
    async fn delete(&self, cluster_id: &str) -> ClientResult<()> {
        self.action(&ClusterActionRequest {
            action: ClusterAction::Delete,
            id: vec![cluster_id.to_string()],
        })
        .await
    }
}

/// Default implementation of the clusters service.
pub struct DefaultClustersService<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> DefaultClustersService<'a> {
    /// Creates a new clusters service.
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl ClustersService for DefaultClustersService<'_> {
    async fn list(&self) -> ClientResult<Vec<Cluster>> {
        self.pipeline.get("/clusters").await
    }

    async fn get(&self, cluster_id: &str) -> ClientResult<Cluster> {
        self.pipeline
            .get(&format!("/clusters/{}", segment(cluster_id)))
            .await
    }

    async fn create(&self, request: &CreateClusterRequest) -> ClientResult<String> {
        let response: CreateClusterResponse = self.pipeline.post("/clusters", request).await?;
        Ok(response.id)
    }

    async fn action(&self, request: &ClusterActionRequest) -> ClientResult<()> {
        self.pipeline.put_empty("/clusters", request).await
    }

    async fn types(&self) -> ClientResult<Vec<ClusterType>> {
        self.pipeline.get("/cluster-types").await
    }

    async fn is_available(
        &self,
        cluster_type: &str,
        location_code: Option<&str>,
    ) -> ClientResult<bool> {
        let path = with_query(
            &format!("/cluster-availability/{}", segment(cluster_type)),
            &[("location_code", location_code.map(str::to_string))],
        );
        self.pipeline.get(&path).await
    }

    async fn availabilities(
        &self,
        location_code: Option<&str>,
    ) -> ClientResult<Vec<LocationAvailability>> {
        let path = with_query(
            "/cluster-availability",
            &[("location_code", location_code.map(str::to_string))],
        );
        self.pipeline.get(&path).await
    }
}
