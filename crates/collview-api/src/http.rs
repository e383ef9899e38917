use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::Value;

use collview_core::error::CollviewError;
use collview_store::{LocalStore, TOKEN_KEY};

use crate::Transport;

/// `Transport` over HTTP with an optional bearer token.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn LocalStore>,
}

impl HttpTransport {
    pub fn new(base_url: &url::Url, tokens: Arc<dyn LocalStore>) -> Result<Self, CollviewError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(concat!("collview/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CollviewError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The token is read on every request so a token stored mid-session is
    /// picked up without rebuilding the transport.
    fn token(&self) -> Option<String> {
        match self.tokens.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => Some(token),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored token, sending unauthenticated request");
                None
            }
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, CollviewError> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "sending request");

        let mut req = self.client.request(method, &url);
        if let Some(token) = self.token() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| CollviewError::Network {
            message: e.to_string(),
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), %url, "request failed");
            return Err(CollviewError::Http {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        Ok(resp)
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value, CollviewError> {
        let bytes = resp.bytes().await.map_err(|e| CollviewError::Network {
            message: e.to_string(),
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| CollviewError::Decode {
            message: format!("JSON parse error: {e}"),
        })
    }
}

/// Human-readable message for a failed response. Prefers a JSON `detail`
/// field, then the raw body, then the status reason.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(detail)) = map.get("detail") {
            return detail.clone();
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value, CollviewError> {
        let resp = self.send(Method::GET, path, None).await?;
        Self::read_json(resp).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, CollviewError> {
        let resp = self.send(Method::POST, path, Some(body)).await?;
        Self::read_json(resp).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, CollviewError> {
        let resp = self.send(Method::PUT, path, Some(body)).await?;
        Self::read_json(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), CollviewError> {
        self.send(Method::DELETE, path, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collview_store::MemoryStore;
    use httpmock::prelude::*;
    use serde_json::json;

    fn transport(server: &MockServer, store: MemoryStore) -> HttpTransport {
        let base = url::Url::parse(&server.url("/api/v1/")).unwrap();
        HttpTransport::new(&base, Arc::new(store)).unwrap()
    }

    #[test]
    fn test_error_message_prefers_detail() {
        let msg = error_message(r#"{"detail":"Collection not found"}"#, reqwest::StatusCode::NOT_FOUND);
        assert_eq!(msg, "Collection not found");
        assert_eq!(error_message("", reqwest::StatusCode::BAD_GATEWAY), "Bad Gateway");
        assert_eq!(error_message("oops", reqwest::StatusCode::BAD_GATEWAY), "oops");
    }

    #[tokio::test]
    async fn test_get_attaches_bearer_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/collections/")
                    .header("authorization", "Bearer secret");
                then.status(200).json_body(json!([]));
            })
            .await;

        let t = transport(&server, MemoryStore::with_token("secret"));
        assert_eq!(t.base_url(), server.url("/api/v1"));
        let body = t.get("/collections/").await.unwrap();
        assert_eq!(body, json!([]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/collections/")
                    .json_body(json!({ "name": "Notes" }));
                then.status(201).json_body(json!({ "id": "1" }));
            })
            .await;

        let t = transport(&server, MemoryStore::new());
        let body = t.post("/collections/", &json!({ "name": "Notes" })).await.unwrap();
        assert_eq!(body["id"], "1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/api/v1/collections/x");
                then.status(500).body("database unavailable");
            })
            .await;

        let t = transport(&server, MemoryStore::new());
        let err = t.put("/collections/x", &json!({})).await.unwrap_err();
        match err {
            CollviewError::Http { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/collections/");
                then.status(200).body("<html>proxy error</html>");
            })
            .await;

        let t = transport(&server, MemoryStore::new());
        let err = t.get("/collections/").await.unwrap_err();
        assert!(matches!(err, CollviewError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_delete_ignores_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/v1/collections/abc");
                then.status(204);
            })
            .await;

        let t = transport(&server, MemoryStore::new());
        t.delete("/collections/abc").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let base = url::Url::parse("http://127.0.0.1:9").unwrap();
        let t = HttpTransport::new(&base, Arc::new(MemoryStore::new())).unwrap();
        let err = t.get("/collections/").await.unwrap_err();
        assert!(matches!(err, CollviewError::Network { .. }));
    }
}
