//! Balance service.

use async_trait::async_trait;

use crate::client::RequestPipeline;
use crate::errors::ClientResult;
use crate::types::balance::Balance;

/// Balance service trait.
#[async_trait]
pub trait BalanceService: Send + Sync {
    /// Returns the remaining project balance.
    async fn get(&self) -> ClientResult<Balance>;
}

/// Default implementation of the balance service.
pub struct DefaultBalanceService<'a> {
    pipeline: &'a RequestPipeline,
}

impl<'a> DefaultBalanceService<'a> {
    /// Creates a new balance service.
    pub fn new(pipeline: &'a RequestPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl BalanceService for DefaultBalanceService<'_> {
    async fn get(&self) -> ClientResult<Balance> {
        self.pipeline.get("/balance").await
    }
}
