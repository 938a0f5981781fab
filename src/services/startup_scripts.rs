//! Startup scripts service.

use async_trait::async_trait;

use super::segment;
use crate::client::RequestPipeline;
use crate::errors::ClientResult;
use crate::types::startup_scripts::{
    CreateStartupScriptRequest, DeleteStartupScriptsRequest, StartupScript,
};

/// Startup scripts service trait.
///
/// Some environments do not offer startup scripts and answer 404; combine
/// with [`ResultExt::optional`](crate::errors::ResultExt::optional) to treat
/// that as "unsupported".
#[async_trait]
pub trait StartupScriptsService: Send + Sync {
    /// Lists stored scripts.
    async fn list(&self) -> ClientResult<Vec<StartupScript>>;

    /// Retrieves a script.
    async fn get(&self, script_id: &str) -> ClientResult<StartupScript>;

    /// Stores a script and returns its ID.
    async fn create(&self, request: &CreateStartupScriptRequest) -> ClientResult<String>;

    /// Deletes a script.
    async fn delete(&self, script_id: &str) -> ClientResult<()>;

    /// Deletes several scripts at once.
    async fn delete_many(&self, script_ids: &[String]) -> ClientResult<()>;
}

/// Default implementation of the startup scripts service.
pub struct DefaultStartupScriptsService<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> DefaultStartupScriptsService<'a> {
    /// Creates a new startup scripts service.
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl StartupScriptsService for DefaultStartupScriptsService<'_> {
    async fn list(&self) -> ClientResult<Vec<StartupScript>> {
        self.pipeline.get("/scripts").await
    }

    async fn get(&self, script_id: &str) -> ClientResult<StartupScript> {
        self.pipeline
            .get(&format!("/scripts/{}", segment(script_id)))
            .await
    }

    async fn create(&self, request: &CreateStartupScriptRequest) -> ClientResult<String> {
        self.pipeline.post_text("/scripts", request).await
    }

    async fn delete(&self, script_id: &str) -> ClientResult<()> {
        self.pipeline
            .delete(&format!("/scripts/{}", segment(script_id)))
            .await
    }

    async fn delete_many(&self, script_ids: &[String]) -> ClientResult<()> {
        let request = DeleteStartupScriptsRequest {
            scripts: script_ids.to_vec(),
        };
        self.pipeline.delete_with_body("/scripts", &request).await
    }
}
