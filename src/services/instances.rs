//! Instances service.

use async_trait::async_trait;

use super::{segment, with_query};
use crate::client::RequestPipeline;
use crate::errors::ClientResult;
use crate::types::common::LocationAvailability;
use crate::types::instances::{
    CreateInstanceRequest, Instance, InstanceAction, InstanceActionRequest, InstanceStatus,
};

/// Instances service trait.
#[async_trait]
pub trait InstancesService: Send + Sync {
    /// Lists instances, optionally filtered by status.
    async fn list(&self, status: Option<InstanceStatus>) -> ClientResult<Vec<Instance>>;

    /// Retrieves an instance.
    async fn get(&self, instance_id: &str) -> ClientResult<Instance>;

    /// Deploys an instance and returns its ID.
    async fn create(&self, request: &CreateInstanceRequest) -> ClientResult<String>;

    /// Applies an action to one or more instances.
    async fn action(&self, request: &InstanceActionRequest) -> ClientResult<()>;

    /// Checks whether an instance type has free capacity.
    async fn is_available(
        &self,
        instance_type: &str,
        is_spot: bool,
        location_code: Option<&str>,
    ) -> ClientResult<bool>;

    /// Lists free capacity per location.
    async fn availabilities(
        &self,
        is_spot: Option<bool>,
        location_code: Option<&str>,
    ) -> ClientResult<Vec<LocationAvailability>>;

    /// Boots an instance.
    async fn start(&self, instance_id: &str) -> ClientResult<()> {
        self.action(&InstanceActionRequest::new(InstanceAction::Boot, [instance_id]))
            .await
    }

    /// Shuts an instance down.
    async fn shutdown(&self, instance_id: &str) -> ClientResult<()> {
        self.action(&InstanceActionRequest::new(
            InstanceAction::Shutdown,
            [instance_id],
        ))
        .await
    }

    /// Deletes an instance.
    async fn delete(&self, instance_id: &str) -> ClientResult<()> {
        self.action(&InstanceActionRequest::new(InstanceAction::Delete, [instance_id]))
            .await
    }
}

/// Default implementation of the instances service.
pub struct DefaultInstancesService<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> DefaultInstancesService<'a> {
    /// Creates a new instances service.
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl InstancesService for DefaultInstancesService<'_> {
    async fn list(&self, status: Option<InstanceStatus>) -> ClientResult<Vec<Instance>> {
        let path = with_query(
            "/instances",
            &[("status", status.map(|s| s.as_str().to_string()))],
        );
        self.pipeline.get(&path).await
    }

    async fn get(&self, instance_id: &str) -> ClientResult<Instance> {
        self.pipeline
            .get(&format!("/instances/{}", segment(instance_id)))
            .await
    }

    async fn create(&self, request: &CreateInstanceRequest) -> ClientResult<String> {
        self.pipeline.post_text("/instances", request).await
    }

    async fn action(&self, request: &InstanceActionRequest) -> ClientResult<()> {
        self.pipeline.put_empty("/instances", request).await
    }

    async fn is_available(
        &self,
        instance_type: &str,
        is_spot: bool,
        location_code: Option<&str>,
    ) -> ClientResult<bool> {
        let path = with_query(
            &format!("/instance-availability/{}", segment(instance_type)),
            &[
                ("is_spot", Some(is_spot.to_string())),
                ("location_code", location_code.map(str::to_string)),
            ],
        );
        self.pipeline.get(&path).await
    }

    async fn availabilities(
        &self,
        is_spot: Option<bool>,
        location_code: Option<&str>,
    ) -> ClientResult<Vec<LocationAvailability>> {
        let path = with_query(
            "/instance-availability",
            &[
                ("is_spot", is_spot.map(|v| v.to_string())),
                ("location_code", location_code.map(str::to_string)),
            ],
        );
        self.pipeline.get(&path).await
    }
}
