//! Images service.

use async_trait::async_trait;

use crate::client::RequestPipeline;
use crate::errors::ClientResult;
use crate::types::images::Image;

/// Images service trait.
#[async_trait]
pub trait ImagesService: Send + Sync {
    /// Lists OS images for instances.
    async fn list(&self) -> ClientResult<Vec<Image>>;

    /// Lists OS images for clusters.
    async fn list_cluster(&self) -> ClientResult<Vec<Image>>;
}

/// Default implementation of the images service.
pub struct DefaultImagesService<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> DefaultImagesService<'a> {
    /// Creates a new images service.
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl ImagesService for DefaultImagesService<'_> {
    async fn list(&self) -> ClientResult<Vec<Image>> {
        self.pipeline.get("/images").await
    }

    async fn list_cluster(&self) -> ClientResult<Vec<Image>> {
        self.pipeline.get("/images/cluster").await
    }
}
