//! Volumes service.

use async_trait::async_trait;

use super::{segment, with_query};
use crate::client::{json_body, RequestPipeline};
use crate::errors::ClientResult;
use crate::transport::Method;
use crate::types::volumes::{
    CreateVolumeRequest, Volume, VolumeAction, VolumeActionRequest, VolumeStatus, VolumeType,
    VolumeTypeInfo,
};

/// Volumes service trait.
#[async_trait]
pub trait VolumesService: Send + Sync {
    /// Lists volumes, optionally filtered by status.
    async fn list(&self, status: Option<VolumeStatus>) -> ClientResult<Vec<Volume>>;

    /// Retrieves a volume.
    async fn get(&self, volume_id: &str) -> ClientResult<Volume>;

    /// Creates a volume and returns its ID.
    async fn create(&self, request: &CreateVolumeRequest) -> ClientResult<String>;

    /// Applies an action to one or more volumes.
    async fn action(&self, request: &VolumeActionRequest) -> ClientResult<()>;

    /// Clones a volume and returns the IDs of the copies.
    async fn clone_volume(
        &self,
        volume_id: &str,
        name: Option<&str>,
        volume_type: Option<VolumeType>,
    ) -> ClientResult<Vec<String>>;

    /// Lists deleted volumes that can still be restored.
    async fn trash(&self) -> ClientResult<Vec<Volume>>;

    /// Lists volume types and their prices.
    async fn types(&self) -> ClientResult<Vec<VolumeTypeInfo>>;

    /// Attaches a volume to an instance.
    async fn attach(&self, volume_id: &str, instance_id: &str) -> ClientResult<()> {
        self.action(&VolumeActionRequest {
            instance_id: Some(instance_id.to_string()),
            ..VolumeActionRequest::new(VolumeAction::Attach, [volume_id])
        })
        .await
    }

    /// Detaches a volume from its instance.
    async fn detach(&self, volume_id: &str) -> ClientResult<()> {
        self.action(&VolumeActionRequest::new(VolumeAction::Detach, [volume_id]))
            .await
    }

    /// Grows a volume to `size` GB.
    async fn resize(&self, volume_id: &str, size: u32) -> ClientResult<()> {
        self.action(&VolumeActionRequest {
            size: Some(size),
            ..VolumeActionRequest::new(VolumeAction::Resize, [volume_id])
        })
        .await
    }

    /// Renames a volume.
    async fn rename(&self, volume_id: &str, name: &str) -> ClientResult<()> {
        self.action(&VolumeActionRequest {
            name: Some(name.to_string()),
            ..VolumeActionRequest::new(VolumeAction::Rename, [volume_id])
        })
        .await
    }

    /// Deletes a volume, bypassing the trash when `permanent` is set.
    async fn delete(&self, volume_id: &str, permanent: bool) -> ClientResult<()> {
        self.action(&VolumeActionRequest {
            is_permanent: Some(permanent),
            ..VolumeActionRequest::new(VolumeAction::Delete, [volume_id])
        })
        .await
    }
}

/// Default implementation of the volumes service.
pub struct DefaultVolumesService<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> DefaultVolumesService<'a> {
    /// Creates a new volumes service.
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl VolumesService for DefaultVolumesService<'_> {
    async fn list(&self, status: Option<VolumeStatus>) -> ClientResult<Vec<Volume>> {
        let path = with_query(
            "/volumes",
            &[("status", status.map(|s| s.as_str().to_string()))],
        );
        self.pipeline.get(&path).await
    }

    async fn get(&self, volume_id: &str) -> ClientResult<Volume> {
        self.pipeline
            .get(&format!("/volumes/{}", segment(volume_id)))
            .await
    }

    async fn create(&self, request: &CreateVolumeRequest) -> ClientResult<String> {
        self.pipeline.post_text("/volumes", request).await
    }

    async fn action(&self, request: &VolumeActionRequest) -> ClientResult<()> {
        self.pipeline.put_empty("/volumes", request).await
    }

    async fn clone_volume(
        &self,
        volume_id: &str,
        name: Option<&str>,
        volume_type: Option<VolumeType>,
    ) -> ClientResult<Vec<String>> {
        let request = VolumeActionRequest {
            name: name.map(str::to_string),
            volume_type,
            ..VolumeActionRequest::new(VolumeAction::Clone, [volume_id])
        };
        self.pipeline
            .execute(Method::Put, "/volumes", Some(json_body(&request)?))
            .await
    }

    async fn trash(&self) -> ClientResult<Vec<Volume>> {
        self.pipeline.get("/volumes/trash").await
    }

    async fn types(&self) -> ClientResult<Vec<VolumeTypeInfo>> {
        self.pipeline.get("/volume-types").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClientError;
    use crate::mocks::{MockResponse, MockTransport};
    use crate::services::testing::{pipeline, url};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_returns_plain_text_id() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        transport.enqueue_response(MockResponse::text(202, "vol-1"));
        let pipeline = pipeline(&transport);
        let service = DefaultVolumesService::new(&pipeline);

        let request = CreateVolumeRequest::new(VolumeType::Nvme, "FIN-01", 100, "data");
        assert_eq!(service.create(&request).await.unwrap(), "vol-1");

        let body = transport.last_request().unwrap().body_json().unwrap();
        assert_eq!(body["type"], "NVMe");
        assert_eq!(body["size"], 100);
    }

    #[tokio::test]
    async fn test_attach_and_delete_actions() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        transport.enqueue_response(MockResponse::text(202, ""));
        transport.enqueue_response(MockResponse::text(202, ""));
        let pipeline = pipeline(&transport);
        let service = DefaultVolumesService::new(&pipeline);

        service.attach("vol-1", "i-1").await.unwrap();
        service.delete("vol-1", true).await.unwrap();

        let requests = transport.api_requests();
        assert_eq!(
            requests[0].body_json().unwrap(),
            serde_json::json!({"action": "attach", "id": ["vol-1"], "instance_id": "i-1"})
        );
        assert_eq!(
            requests[1].body_json().unwrap(),
            serde_json::json!({"action": "delete", "id": ["vol-1"], "is_permanent": true})
        );
    }

    #[tokio::test]
    async fn test_clone_decodes_new_ids() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        transport.enqueue_response(MockResponse::json(serde_json::json!(["vol-2"])));
        let pipeline = pipeline(&transport);
        let service = DefaultVolumesService::new(&pipeline);

        let ids = service
            .clone_volume("vol-1", Some("copy"), None)
            .await
            .unwrap();

        assert_eq!(ids, vec!["vol-2".to_string()]);
    }

    #[tokio::test]
    async fn test_get_missing_volume_is_not_found() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        transport.enqueue_response(MockResponse::error(404, "volume not found"));
        let pipeline = pipeline(&transport);
        let service = DefaultVolumesService::new(&pipeline);

        let result = service.get("vol-x").await;

        assert!(matches!(result, Err(ClientError::NotFound(ref e)) if e.message == "volume not found"));
        assert_eq!(transport.last_request().unwrap().url, url("/volumes/vol-x"));
    }
}
