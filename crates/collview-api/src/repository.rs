use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use collview_core::error::CollviewError;
use collview_core::models::collection::{Collection, CollectionDraft};

use crate::Transport;

/// Maps collection operations onto the `/collections/` REST routes.
///
/// A pass-through: no validation, and transport errors are returned as-is
/// except a 404 from [`CollectionRepository::find_by_id`].
#[derive(Clone)]
pub struct CollectionRepository {
    transport: Arc<dyn Transport>,
}

impl CollectionRepository {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// All collections, in the order the server returned them.
    pub async fn find_all(&self) -> Result<Vec<Collection>, CollviewError> {
        let body = self.transport.get("/collections/").await?;
        decode(body)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Collection, CollviewError> {
        match self.transport.get(&item_path(id)).await {
            Ok(body) => decode(body),
            Err(e) if e.status() == Some(404) => Err(CollviewError::CollectionNotFound {
                id: id.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    pub async fn create(&self, draft: &CollectionDraft) -> Result<Collection, CollviewError> {
        let body = self.transport.post("/collections/", &encode(draft)?).await?;
        decode(body)
    }

    pub async fn update(&self, id: &str, draft: &CollectionDraft) -> Result<Collection, CollviewError> {
        let body = self.transport.put(&item_path(id), &encode(draft)?).await?;
        decode(body)
    }

    pub async fn delete(&self, id: &str) -> Result<(), CollviewError> {
        self.transport.delete(&item_path(id)).await
    }
}

fn item_path(id: &str) -> String {
    format!("/collections/{id}")
}

fn encode(draft: &CollectionDraft) -> Result<Value, CollviewError> {
    serde_json::to_value(draft).map_err(|e| CollviewError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, CollviewError> {
    serde_json::from_value(body).map_err(|e| CollviewError::Decode {
        message: e.to_string(),
    })
}
