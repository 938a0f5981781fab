//! SSH keys service.

use async_trait::async_trait;

use super::segment;
use crate::client::RequestPipeline;
use crate::errors::ClientResult;
use crate::types::ssh_keys::{CreateSshKeyRequest, DeleteSshKeysRequest, SshKey};

/// SSH keys service trait.
#[async_trait]
pub trait SshKeysService: Send + Sync {
    /// Lists stored keys.
    async fn list(&self) -> ClientResult<Vec<SshKey>>;

    /// Retrieves a key.
    async fn get(&self, key_id: &str) -> ClientResult<SshKey>;

    /// Stores a public key and returns its ID.
    async fn create(&self, request: &CreateSshKeyRequest) -> ClientResult<String>;

    /// Deletes a key.
    async fn delete(&self, key_id: &str) -> ClientResult<()>;

    /// Deletes several keys at once.
    async fn delete_many(&self, key_ids: &[String]) -> ClientResult<()>;
}

/// Default implementation of the SSH keys service.
pub struct DefaultSshKeysService<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> DefaultSshKeysService<'a> {
    /// Creates a new SSH keys service.
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl SshKeysService for DefaultSshKeysService<'_> {
    async fn list(&self) -> ClientResult<Vec<SshKey>> {
        self.pipeline.get("/sshkeys").await
    }

    async fn get(&self, key_id: &str) -> ClientResult<SshKey> {
        self.pipeline
            .get(&format!("/sshkeys/{}", segment(key_id)))
            .await
    }

    async fn create(&self, request: &CreateSshKeyRequest) -> ClientResult<String> {
        self.pipeline.post_text("/sshkeys", request).await
    }

    async fn delete(&self, key_id: &str) -> ClientResult<()> {
        self.pipeline
            .delete(&format!("/sshkeys/{}", segment(key_id)))
            .await
    }

    async fn delete_many(&self, key_ids: &[String]) -> ClientResult<()> {
        let request = DeleteSshKeysRequest {
            keys: key_ids.to_vec(),
        };
        self.pipeline.delete_with_body("/sshkeys", &request).await
    }
}
