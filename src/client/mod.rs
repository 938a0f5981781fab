//! DataCrunch API client.

pub mod pipeline;

pub use pipeline::{json_body, RequestPipeline};

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{OAuth2TokenManager, TokenManager};
use crate::config::{ClientConfig, ClientConfigBuilder, TokenRequestFormat};
use crate::errors::ClientResult;
use crate::resilience::RetryConfig;
use crate::services::{
    BalanceService, ClustersService, ContainersService, DefaultBalanceService,
    DefaultClustersService, DefaultContainersService, DefaultImagesService,
    DefaultInstanceTypesService, DefaultInstancesService, DefaultJobsService,
    DefaultLocationsService, DefaultSshKeysService, DefaultStartupScriptsService,
    DefaultVolumesService, ImagesService, InstanceTypesService, InstancesService, JobsService,
    LocationsService, SshKeysService, StartupScriptsService, VolumesService,
};
use crate::transport::{HttpTransport, ReqwestTransport};

/// The main DataCrunch client.
///
/// Cheap to share behind an `Arc`; all services borrow the same pipeline and
/// token cache.
pub struct DataCrunchClient {
    config: ClientConfig,
    pipeline: RequestPipeline,
}

impl DataCrunchClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout, &config.user_agent)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Creates a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let tokens = Arc::new(OAuth2TokenManager::new(&config, transport.clone()));
        let pipeline = RequestPipeline::new(&config, transport, tokens);
        Self { config, pipeline }
    }

    /// Creates a new client builder.
    pub fn builder() -> DataCrunchClientBuilder {
        DataCrunchClientBuilder::new()
    }

    /// Creates a client from client credentials with default settings.
    pub fn from_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> ClientResult<Self> {
        let config = ClientConfig::builder()
            .client_id(client_id)
            .client_secret(client_secret)
            .build()?;
        Self::new(config)
    }

    /// Creates a client from the environment.
    pub fn from_env() -> ClientResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(config)
    }

    /// Returns the instances service.
    pub fn instances(&self) -> impl InstancesService + '_ {
        DefaultInstancesService::new(&self.pipeline)
    }

    /// Returns the instance types service.
    pub fn instance_types(&self) -> impl InstanceTypesService + '_ {
        DefaultInstanceTypesService::new(&self.pipeline)
    }

    /// Returns the images service.
    pub fn images(&self) -> impl ImagesService + '_ {
        DefaultImagesService::new(&self.pipeline)
    }

    /// Returns the volumes service.
    pub fn volumes(&self) -> impl VolumesService + '_ {
        DefaultVolumesService::new(&self.pipeline)
    }

    /// Returns the SSH keys service.
    pub fn ssh_keys(&self) -> impl SshKeysService + '_ {
        DefaultSshKeysService::new(&self.pipeline)
    }

    /// Returns the startup scripts service.
    pub fn startup_scripts(&self) -> impl StartupScriptsService + '_ {
        DefaultStartupScriptsService::new(&self.pipeline)
    }

    /// Returns the balance service.
    pub fn balance(&self) -> impl BalanceService + '_ {
        DefaultBalanceService::new(&self.pipeline)
    }

    /// Returns the locations service.
    pub fn locations(&self) -> impl LocationsService + '_ {
        DefaultLocationsService::new(&self.pipeline)
    }

    /// Returns the clusters service.
    pub fn clusters(&self) -> impl ClustersService + '_ {
        DefaultClustersService::new(&self.pipeline)
    }

    /// Returns the container deployments service.
    pub fn containers(&self) -> impl ContainersService + '_ {
        DefaultContainersService::new(&self.pipeline)
    }

    /// Returns the serverless jobs service.
    pub fn jobs(&self) -> impl JobsService + '_ {
        DefaultJobsService::new(&self.pipeline)
    }

    /// Returns the request pipeline, for endpoints without a typed service.
    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    /// Returns the token manager.
    pub fn token_manager(&self) -> &Arc<dyn TokenManager> {
        self.pipeline.token_manager()
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl std::fmt::Debug for DataCrunchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataCrunchClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for the DataCrunch client.
#[derive(Default)]
pub struct DataCrunchClientBuilder {
    config: ClientConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    token_manager: Option<Arc<dyn TokenManager>>,
}

impl DataCrunchClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client identifier.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config = self.config.client_id(client_id);
        self
    }

    /// Sets the client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.config = self.config.client_secret(client_secret);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.base_url(url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Sets the maximum number of retries.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config = self.config.max_retries(retries);
        self
    }

    /// Sets the full retry policy.
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.config = self.config.retry_config(retry);
        self
    }

    /// Sets the token safety margin.
    pub fn token_safety_margin(mut self, margin: Duration) -> Self {
        self.config = self.config.token_safety_margin(margin);
        self
    }

    /// Sets the token endpoint body encoding.
    pub fn token_request_format(mut self, format: TokenRequestFormat) -> Self {
        self.config = self.config.token_request_format(format);
        self
    }

    /// Sets the `User-Agent` header value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.user_agent(user_agent);
        self
    }

    /// Uses a custom HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Uses a custom token manager instead of the OAuth2 exchange.
    pub fn token_manager(mut self, token_manager: Arc<dyn TokenManager>) -> Self {
        self.token_manager = Some(token_manager);
        self
    }

    /// Builds the client.
    pub fn build(self) -> ClientResult<DataCrunchClient> {
        let config = self.config.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(config.timeout, &config.user_agent)?),
        };

        let tokens = self
            .token_manager
            .unwrap_or_else(|| Arc::new(OAuth2TokenManager::new(&config, transport.clone())));

        let pipeline = RequestPipeline::new(&config, transport, tokens);

        Ok(DataCrunchClient { config, pipeline })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClientError;
    use crate::mocks::{MockResponse, MockTransport};

    #[test]
    fn test_client_builder() {
        let client = DataCrunchClient::builder()
            .client_id("client-id")
            .client_secret("client-secret")
            .base_url("https://test.api.com/v1")
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(client.config().base_url, "https://test.api.com/v1");
        assert_eq!(client.config().timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_client_without_credentials_fails() {
        let result = DataCrunchClient::builder().client_id("client-id").build();
        assert!(matches!(result, Err(ClientError::Configuration { .. })));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let client = DataCrunchClient::from_credentials("client-id", "hunter2").unwrap();
        assert!(!format!("{:?}", client).contains("hunter2"));
    }

    #[tokio::test]
    async fn test_services_share_one_token() {
        let transport = Arc::new(MockTransport::with_token("shared"));
        transport.enqueue_response(MockResponse::json(
            serde_json::json!({"amount": 10.0, "currency": "usd"}),
        ));
        transport.enqueue_response(MockResponse::json(serde_json::json!([])));
        let client = DataCrunchClient::builder()
            .client_id("client-id")
            .client_secret("client-secret")
            .transport(transport.clone())
            .build()
            .unwrap();

        client.balance().get().await.unwrap();
        let locations = client.locations().list().await.unwrap();

        assert!(locations.is_empty());
        assert_eq!(transport.token_requests().len(), 1);
        assert!(transport
            .api_requests()
            .iter()
            .all(|r| r.bearer_token() == Some("shared")));
    }
}
