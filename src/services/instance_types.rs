//! Instance types service.

use async_trait::async_trait;

use crate::client::RequestPipeline;
use crate::errors::ClientResult;
use crate::types::instance_types::InstanceType;

/// Instance types service trait.
#[async_trait]
pub trait InstanceTypesService: Send + Sync {
    /// Lists orderable instance types with their prices.
    async fn list(&self) -> ClientResult<Vec<InstanceType>>;

    /// Looks up an instance type by name.
    async fn find(&self, instance_type: &str) -> ClientResult<Option<InstanceType>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|t| t.instance_type == instance_type))
    }
}

/// Default implementation of the instance types service.
pub struct DefaultInstanceTypesService<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> DefaultInstanceTypesService<'a> {
    /// Creates a new instance types service.
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl InstanceTypesService for DefaultInstanceTypesService<'_> {
    async fn list(&self) -> ClientResult<Vec<InstanceType>> {
        self.pipeline.get("/instance-types").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockResponse, MockTransport};
    use crate::services::testing::pipeline;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_find_by_name() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        transport.enqueue_response(MockResponse::json(serde_json::json!([
            {"id": "t-1", "instance_type": "1V100.6V", "price_per_hour": "0.89"},
            {"id": "t-2", "instance_type": "8H100.80S.176V", "price_per_hour": "17.60", "spot_price": "7.04"}
        ])));
        let pipeline = pipeline(&transport);
        let service = DefaultInstanceTypesService::new(&pipeline);

        let found = service.find("8H100.80S.176V").await.unwrap().unwrap();

        assert_eq!(found.id, "t-2");
        assert_eq!(found.spot_price, Some(7.04));
    }
}
