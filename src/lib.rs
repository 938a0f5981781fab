//! DataCrunch Client Library
//!
//! An async Rust client for the DataCrunch cloud compute API: instances,
//! volumes, SSH keys, startup scripts, clusters, container deployments,
//! serverless jobs, locations, images, pricing and account balance.
//!
//! # Features
//!
//! - **OAuth2 client credentials**: tokens are cached, refreshed ahead of
//!   expiry and shared by concurrent callers with a single exchange
//! - **Resilience**: retries with exponential backoff and jitter for network
//!   failures, rate limits and server errors, within a total time budget
//! - **Typed errors**: `NotFound`, `RateLimit`, `Auth`, `Api` and friends
//! - **Cancellation**: every pipeline call has a `CancellationToken` variant
//! - **Observability**: `tracing` spans and events, opt-in subscriber setup
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use datacrunch_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DataCrunchClient::builder()
//!         .client_id("your-client-id")
//!         .client_secret("your-client-secret")
//!         .build()?;
//!
//!     for instance in client.instances().list(None).await? {
//!         println!("{} {:?}", instance.hostname, instance.status);
//!     }
//!
//!     let scripts = client.startup_scripts().list().await.optional()?;
//!     if scripts.is_none() {
//!         println!("startup scripts are not available here");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod resilience;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use auth::{OAuth2TokenManager, Token, TokenManager};
pub use client::{DataCrunchClient, DataCrunchClientBuilder, RequestPipeline};
pub use config::{ClientConfig, ClientConfigBuilder, Credentials, TokenRequestFormat};
pub use errors::{ApiError, ClientError, ClientResult, NetworkErrorKind, ResultExt};
pub use resilience::RetryConfig;
pub use tokio_util::sync::CancellationToken;

/// Commonly used items, including all service traits.
pub mod prelude {
    pub use crate::client::DataCrunchClient;
    pub use crate::errors::{ClientError, ClientResult, ResultExt};
    pub use crate::services::{
        BalanceService, ClustersService, ContainersService, ImagesService, InstanceTypesService,
        InstancesService, JobsService, LocationsService, SshKeysService, StartupScriptsService,
        VolumesService,
    };
}

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
