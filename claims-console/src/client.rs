//! Authenticated HTTP adapter for the claims backend.

use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};

pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Cheap to clone; clones share the connection pool and the session token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

/// List endpoints answer with a bare array or a paginated envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Plain(items) | ListBody::Paged { results: items } => items,
        }
    }
}

impl ApiClient {
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConsoleError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Written at login and logout only.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<Response> {
        let correlation_id = Uuid::new_v4().to_string();
        let span = info_span!(
            "api_request",
            method = %method,
            path = %path,
            correlation_id = %correlation_id
        );

        async {
            let mut request = self
                .http
                .request(method, self.url(path))
                .header(CORRELATION_HEADER, &correlation_id);
            if let Some(token) = self.token.read().await.as_deref() {
                request = request.header(reqwest::header::AUTHORIZATION, format!("Token {token}"));
            }
            if let Some(body) = body {
                request = request.json(&body);
            } else {
                request = request.header(reqwest::header::CONTENT_TYPE, "application/json");
            }

            let response = request.send().await.map_err(|e| {
                warn!(error = %e, "Request did not complete");
                ConsoleError::from(e)
            })?;

            let status = response.status();
            debug!(status = status.as_u16(), "Response received");
            if status.is_success() {
                Ok(response)
            } else {
                Err(error_from_response(response).await)
            }
        }
        .instrument(span)
        .await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ConsoleError::from)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(Method::GET, path, None).await?;
        Self::decode(response).await
    }

    /// GET a collection, accepting both a plain array and `{ "results": [...] }`.
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let body: ListBody<T> = self.get_json(path).await?;
        Ok(body.into_vec())
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let response = self.execute(Method::POST, path, Some(body)).await?;
        Self::decode(response).await
    }

    /// POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(Method::POST, path, None).await?;
        Self::decode(response).await
    }

    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let response = self.execute(Method::PATCH, path, Some(body)).await?;
        Self::decode(response).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let response = self.execute(Method::PUT, path, Some(body)).await?;
        Self::decode(response).await
    }

    /// DELETE; any 2xx (including 204 No Content) counts as success.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::DELETE, path, None).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into the matching error variant, preferring the
/// server's own `error`, `message` or `detail` text.
async fn error_from_response(response: Response) -> ConsoleError {
    let status = response.status();
    let path = response.url().path().to_string();
    let text = response.text().await.unwrap_or_default();
    let message = server_message(&text).unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
    });

    warn!(status = status.as_u16(), path = %path, message = %message, "Backend rejected request");

    match status {
        StatusCode::UNAUTHORIZED => ConsoleError::Unauthorized(message),
        StatusCode::FORBIDDEN => ConsoleError::Forbidden { message },
        StatusCode::NOT_FOUND => ConsoleError::NotFound(path),
        _ => ConsoleError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

pub(crate) fn server_message(body: &str) -> Option<String> {
    const KEYS: [&str; 3] = ["error", "message", "detail"];
    let value: Value = serde_json::from_str(body).ok()?;

    // Validation endpoints put field errors under "error" and prose under "message".
    let text = KEYS.iter().find_map(|key| match value.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    });
    text.or_else(|| {
        KEYS.iter().find_map(|key| match value.get(*key)? {
            other @ (Value::Object(_) | Value::Array(_)) => Some(other.to_string()),
            _ => None,
        })
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use tokio::net::TcpListener;

    use super::*;

    /// Serve `router` on an ephemeral port and return a client pointed at it.
    pub(crate) async fn client_for(router: Router) -> ApiClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        let config = ConsoleConfig::default()
            .with_api_base_url(&format!("http://{addr}/api"))
            .unwrap();
        ApiClient::new(&config).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::client_for;
    use super::*;
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{delete, get, post},
    };
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    #[tokio::test]
    async fn attaches_token_and_correlation_id() {
        let router = Router::new().route(
            "/api/echo",
            get(|headers: HeaderMap| async move {
                Json(json!({
                    "auth": headers.get("authorization").and_then(|v| v.to_str().ok()),
                    "correlation": headers.get(CORRELATION_HEADER).is_some(),
                }))
            }),
        );
        let client = client_for(router).await;

        let anonymous: Value = client.get_json("/echo").await.unwrap();
        assert_eq!(anonymous["auth"], Value::Null);
        assert_eq!(anonymous["correlation"], true);

        client.set_token(Some("abc123".into())).await;
        let authed: Value = client.get_json("/echo").await.unwrap();
        assert_eq!(authed["auth"], "Token abc123");

        client.set_token(None).await;
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn lists_accept_plain_and_paged_bodies() {
        let router = Router::new()
            .route("/api/plain", get(|| async { Json(json!([{ "id": 1 }, { "id": 2 }])) }))
            .route(
                "/api/paged",
                get(|| async { Json(json!({ "count": 1, "results": [{ "id": 3 }] })) }),
            );
        let client = client_for(router).await;

        let plain: Vec<Item> = client.get_list("/plain").await.unwrap();
        assert_eq!(plain, vec![Item { id: 1 }, Item { id: 2 }]);
        let paged: Vec<Item> = client.get_list("/paged").await.unwrap();
        assert_eq!(paged, vec![Item { id: 3 }]);
    }

    #[tokio::test]
    async fn maps_status_codes_to_error_variants() {
        let router = Router::new()
            .route(
                "/api/forbidden",
                get(|| async {
                    (AxumStatus::FORBIDDEN, Json(json!({ "error": "Forbidden - roles.view required" })))
                }),
            )
            .route(
                "/api/unauthorized",
                get(|| async {
                    (AxumStatus::UNAUTHORIZED, Json(json!({ "detail": "Invalid token." })))
                }),
            )
            .route(
                "/api/invalid",
                post(|| async {
                    (AxumStatus::BAD_REQUEST, Json(json!({ "message": "damage_type is required" })))
                }),
            )
            .route("/api/broken", get(|| async { (AxumStatus::BAD_GATEWAY, "upstream down") }));
        let client = client_for(router).await;

        let err = client.get_json::<Value>("/forbidden").await.unwrap_err();
        assert!(matches!(&err, ConsoleError::Forbidden { message } if message == "Forbidden - roles.view required"));
        assert!(err.hint().is_some());

        let err = client.get_json::<Value>("/unauthorized").await.unwrap_err();
        assert!(matches!(&err, ConsoleError::Unauthorized(m) if m == "Invalid token."));

        let err = client.post_json::<_, Value>("/invalid", &json!({})).await.unwrap_err();
        assert_eq!(err.user_message(), "damage_type is required");

        let err = client.get_json::<Value>("/broken").await.unwrap_err();
        assert!(matches!(err, ConsoleError::Api { status: 502, .. }));

        let err = client.get_json::<Value>("/missing").await.unwrap_err();
        assert!(matches!(err, ConsoleError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_accepts_no_content() {
        let router = Router::new().route("/api/things/1", delete(|| async { AxumStatus::NO_CONTENT }));
        let client = client_for(router).await;
        client.delete("/things/1").await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let config = ConsoleConfig::default()
            .with_api_base_url("http://127.0.0.1:9/api")
            .unwrap();
        let client = ApiClient::new(&config).unwrap();
        let err = client.get_json::<Value>("/fnol/").await.unwrap_err();
        assert!(matches!(err, ConsoleError::Transport(_)));
        assert_eq!(err.user_message(), crate::error::GENERIC_TRANSPORT_MESSAGE);
    }

    #[test]
    fn server_message_prefers_error_then_message_then_detail() {
        assert_eq!(
            server_message(r#"{"detail":"d","message":"m"}"#).as_deref(),
            Some("m")
        );
        assert_eq!(server_message(r#"{"error":"e","detail":"d"}"#).as_deref(), Some("e"));
        assert_eq!(server_message("<html>oops</html>"), None);
        assert_eq!(server_message(r#"{"error":""}"#), None);
        assert_eq!(
            server_message(r#"{"error":{"username":["required"]},"message":"Invalid credentials provided."}"#)
                .as_deref(),
            Some("Invalid credentials provided.")
        );
    }
}
