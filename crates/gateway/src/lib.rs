//! Backend Gateway - the only component that talks to the SmartEdu REST API
//!
//! - `BackendGateway` - trait the action handlers depend on
//! - `HttpBackendGateway` - reqwest implementation with a fixed per-call timeout
//!
//! Every failure (connect, timeout, non-2xx status, undecodable body) comes
//! back as a typed [`GatewayError`]; callers decide what text the user sees.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::Value;
use smartedu_core::config::BackendConfig;
use thiserror::Error;
use tracing::debug;

pub use reqwest::StatusCode;

const SCHEME_PREFIXES: [&str; 3] = ["bearer ", "basic ", "token "];

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("request to `{path}` timed out after {timeout_ms}ms")]
    Timeout { path: String, timeout_ms: u128 },
    #[error("could not reach backend for `{path}`: {message}")]
    Transport { path: String, message: String },
    #[error("nothing found at `{path}`")]
    NotFound { path: String },
    #[error("backend answered `{path}` with status {status}")]
    Status { path: String, status: u16 },
    #[error("could not decode response from `{path}`: {message}")]
    Decode { path: String, message: String },
}

#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn fetch(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<Value, GatewayError>;

    async fn submit(
        &self,
        path: &str,
        body: &Value,
        token: Option<&str>,
    ) -> Result<StatusCode, GatewayError>;
}

/// `Authorization` header value for a session token. Tokens that already
/// carry a scheme are passed through untouched.
pub fn authorization_header(token: Option<&str>) -> Option<String> {
    let token = token?.trim();
    if token.is_empty() {
        return None;
    }

    let has_scheme = SCHEME_PREFIXES.iter().any(|prefix| {
        token.len() > prefix.len()
            && token.get(..prefix.len()).is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    });
    if has_scheme {
        Some(token.to_owned())
    } else {
        Some(format!("Bearer {token}"))
    }
}

#[derive(Clone, Debug)]
pub struct HttpBackendGateway {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpBackendGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let client = Client::builder().timeout(timeout).build().map_err(|error| {
            GatewayError::Transport { path: base_url.clone(), message: error.to_string() }
        })?;

        Ok(Self { client, base_url, timeout })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, GatewayError> {
        Self::new(config.base_url.clone(), Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn classify(&self, path: &str, error: reqwest::Error) -> GatewayError {
        if error.is_timeout() {
            GatewayError::Timeout { path: path.to_owned(), timeout_ms: self.timeout.as_millis() }
        } else if error.is_decode() {
            GatewayError::Decode { path: path.to_owned(), message: error.to_string() }
        } else {
            GatewayError::Transport { path: path.to_owned(), message: error.to_string() }
        }
    }
}

fn check_status(path: &str, status: StatusCode) -> Result<(), GatewayError> {
    if status == StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound { path: path.to_owned() });
    }
    if !status.is_success() {
        return Err(GatewayError::Status { path: path.to_owned(), status: status.as_u16() });
    }
    Ok(())
}

#[async_trait]
impl BackendGateway for HttpBackendGateway {
    async fn fetch(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        let mut request = self.client.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(header) = authorization_header(token) {
            request = request.header(AUTHORIZATION, header);
        }

        let response = request.send().await.map_err(|error| self.classify(path, error))?;
        let status = response.status();
        debug!(
            event_name = "gateway.fetch.response",
            path,
            status = status.as_u16(),
            "backend responded"
        );
        check_status(path, status)?;

        let bytes = response.bytes().await.map_err(|error| self.classify(path, error))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|error| GatewayError::Decode {
            path: path.to_owned(),
            message: error.to_string(),
        })
    }

    async fn submit(
        &self,
        path: &str,
        body: &Value,
        token: Option<&str>,
    ) -> Result<StatusCode, GatewayError> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(header) = authorization_header(token) {
            request = request.header(AUTHORIZATION, header);
        }

        let response = request.send().await.map_err(|error| self.classify(path, error))?;
        let status = response.status();
        debug!(
            event_name = "gateway.submit.response",
            path,
            status = status.as_u16(),
            "backend responded"
        );
        check_status(path, status)?;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::{
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::{authorization_header, BackendGateway, GatewayError, HttpBackendGateway};

    async fn serve(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        address
    }

    fn gateway(address: SocketAddr, timeout: Duration) -> HttpBackendGateway {
        HttpBackendGateway::new(format!("http://{address}/api/"), timeout).expect("gateway")
    }

    async fn echo(
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        let authorization =
            headers.get("authorization").and_then(|value| value.to_str().ok()).map(str::to_owned);
        Json(json!({"authorization": authorization, "query": query}))
    }

    #[test]
    fn bare_tokens_get_bearer_prefix() {
        assert_eq!(authorization_header(Some("abc.def")).as_deref(), Some("Bearer abc.def"));
        assert_eq!(authorization_header(Some(" bearer abc ")).as_deref(), Some("bearer abc"));
        assert_eq!(authorization_header(Some("Basic dXNlcg==")).as_deref(), Some("Basic dXNlcg=="));
        assert_eq!(authorization_header(Some("   ")), None);
        assert_eq!(authorization_header(None), None);
    }

    #[tokio::test]
    async fn fetch_sends_bearer_header_and_query() {
        let address = serve(Router::new().route("/api/announcements", get(echo))).await;
        let gateway = gateway(address, Duration::from_secs(5));

        let payload = gateway
            .fetch("/announcements", &[("branch", "CSE")], Some("jwt-token"))
            .await
            .expect("fetch");

        assert_eq!(payload["authorization"], "Bearer jwt-token");
        assert_eq!(payload["query"]["branch"], "CSE");
    }

    #[tokio::test]
    async fn fetch_without_token_sends_no_authorization() {
        let address = serve(Router::new().route("/api/events", get(echo))).await;
        let payload = gateway(address, Duration::from_secs(5))
            .fetch("events", &[], None)
            .await
            .expect("fetch");

        assert_eq!(payload["authorization"], Value::Null);
    }

    #[tokio::test]
    async fn non_success_statuses_are_typed() {
        let router = Router::new()
            .route("/api/fees/9", get(|| async { (StatusCode::NOT_FOUND, "{}") }))
            .route("/api/teachers", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
        let address = serve(router).await;
        let gateway = gateway(address, Duration::from_secs(5));

        assert_eq!(
            gateway.fetch("/fees/9", &[], None).await,
            Err(GatewayError::NotFound { path: "/fees/9".to_owned() })
        );
        assert_eq!(
            gateway.fetch("/teachers", &[], Some("t")).await,
            Err(GatewayError::Status { path: "/teachers".to_owned(), status: 500 })
        );
    }

    #[tokio::test]
    async fn undecodable_body_is_a_decode_error() {
        let address =
            serve(Router::new().route("/api/events", get(|| async { "<html>oops</html>" }))).await;
        let result = gateway(address, Duration::from_secs(5)).fetch("/events", &[], None).await;

        assert!(matches!(result, Err(GatewayError::Decode { .. })));
    }

    #[tokio::test]
    async fn empty_body_reads_as_null() {
        let address = serve(Router::new().route("/api/events", get(|| async { "" }))).await;
        let result = gateway(address, Duration::from_secs(5)).fetch("/events", &[], None).await;

        assert_eq!(result, Ok(Value::Null));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let router = Router::new().route(
            "/api/events",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!([]))
            }),
        );
        let address = serve(router).await;
        let result = gateway(address, Duration::from_millis(200)).fetch("/events", &[], None).await;

        assert!(
            matches!(result, Err(GatewayError::Timeout { timeout_ms: 200, .. })),
            "unexpected result: {result:?}"
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("local addr");
        drop(listener);

        let result = gateway(address, Duration::from_secs(2)).fetch("/events", &[], None).await;
        assert!(matches!(result, Err(GatewayError::Transport { .. })), "got {result:?}");
    }

    #[tokio::test]
    async fn submit_posts_json_body_with_header() {
        #[derive(Clone, Default)]
        struct Captured {
            body: Arc<Mutex<Option<(Option<String>, Value)>>>,
        }

        async fn create(
            State(captured): State<Captured>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> StatusCode {
            let authorization = headers
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            *captured.body.lock().expect("lock") = Some((authorization, body));
            StatusCode::CREATED
        }

        let captured = Captured::default();
        let router = Router::new()
            .route("/api/principal/announcements", post(create))
            .with_state(captured.clone());
        let address = serve(router).await;

        let status = gateway(address, Duration::from_secs(5))
            .submit(
                "/principal/announcements",
                &json!({"title": "Exams", "message": "Exams", "target_audience": "all"}),
                Some("Bearer signed"),
            )
            .await
            .expect("submit");

        assert_eq!(status.as_u16(), 201);
        let (authorization, body) =
            captured.body.lock().expect("lock").clone().expect("request captured");
        assert_eq!(authorization.as_deref(), Some("Bearer signed"));
        assert_eq!(body["target_audience"], "all");
    }
}
