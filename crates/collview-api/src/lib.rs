pub mod http;
pub mod memory;
pub mod repository;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use collview_core::config::CollviewConfig;
use collview_core::error::CollviewError;
use collview_store::LocalStore;

pub use http::HttpTransport;
pub use memory::MemoryTransport;
pub use repository::CollectionRepository;

/// Raw JSON calls against the backend API.
///
/// Paths are relative to the transport's base URL and start with `/`.
/// Every call is a single attempt; failures are returned to the caller
/// untouched.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, CollviewError>;

    async fn post(&self, path: &str, body: &Value) -> Result<Value, CollviewError>;

    async fn put(&self, path: &str, body: &Value) -> Result<Value, CollviewError>;

    /// Success is defined purely by the response status.
    async fn delete(&self, path: &str) -> Result<(), CollviewError>;
}

/// Create the HTTP transport described by the configuration.
pub fn create_transport(
    config: &CollviewConfig,
    tokens: Arc<dyn LocalStore>,
) -> Result<Arc<dyn Transport>, CollviewError> {
    let transport = HttpTransport::new(&config.api_base_url, tokens)?;
    tracing::debug!(base_url = transport.base_url(), "created HTTP transport");
    Ok(Arc::new(transport))
}
