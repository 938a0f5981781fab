//! Locations service.

use async_trait::async_trait;

use crate::client::RequestPipeline;
use crate::errors::ClientResult;
use crate::types::locations::Location;

/// Locations service trait.
#[async_trait]
pub trait LocationsService: Send + Sync {
    /// Lists datacenter locations.
    async fn list(&self) -> ClientResult<Vec<Location>>;
}

/// Default implementation of the locations service.
pub struct DefaultLocationsService<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> DefaultLocationsService<'a> {
    /// Creates a new locations service.
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl LocationsService for DefaultLocationsService<'_> {
    async fn list(&self) -> ClientResult<Vec<Location>> {
        self.pipeline.get("/locations").await
    }
}
