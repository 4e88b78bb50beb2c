//! `reqwest`-backed transport.
//!
//! Joins the configured base URL with each request path, applies the per-client
//! timeout, and decodes the response body into JSON. The body is decoded
//! regardless of status so callers can read `message` / `error_description`
//! from error responses.

use crate::{Method, RequestBody, Result, Transport, TransportError, TransportRequest, TransportResponse};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

/// Production transport over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url` (e.g. `https://api.nightbot.tv`).
    ///
    /// The base URL must use http:// or https://. A trailing slash is dropped
    /// so paths like `/1/me` join cleanly.
    pub fn new(client: reqwest::Client, base_url: &str, timeout: Duration) -> Result<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(TransportError::InvalidUrl(format!(
                "base URL must start with http:// or https://, got: {base_url}"
            )));
        }
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: TransportRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse>> + Send + '_>> {
        Box::pin(async move {
            let url = self.url(&request.path);
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Delete => reqwest::Method::DELETE,
            };

            let builder = self
                .client
                .request(method, &url)
                .headers(request.headers)
                .timeout(self.timeout);
            let builder = match request.body {
                RequestBody::Empty => builder,
                RequestBody::Form(pairs) => builder.form(&pairs),
                RequestBody::Json(value) => builder.json(&value),
            };

            debug!(method = %request.method, path = %request.path, "sending request");

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(format!("{} {}: {e}", request.method, request.path))
                } else {
                    TransportError::Request(format!("{} {}: {e}", request.method, request.path))
                }
            })?;

            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|e| TransportError::Request(format!("reading response body: {e}")))?;

            debug!(method = %request.method, path = %request.path, status, "received response");

            Ok(TransportResponse {
                status,
                data: decode_body(&text),
            })
        })
    }
}

/// Parse a response body as JSON, falling back to `Null` (empty) or the raw text.
fn decode_body(text: &str) -> serde_json::Value {
    if text.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
    use serde_json::json;
    use tokio::net::TcpListener;

    /// Start a mock API that echoes method, path, headers and body as JSON on
    /// unknown routes, plus a few fixed routes for status/body edge cases.
    async fn start_mock_api() -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            let app = axum::Router::new()
                .route(
                    "/missing",
                    get(|| async {
                        (
                            StatusCode::NOT_FOUND,
                            axum::Json(json!({"status": 404, "message": "not found"})),
                        )
                    }),
                )
                .route("/empty", post(|| async { StatusCode::OK }))
                .route("/text", get(|| async { "plain text" }))
                .route(
                    "/slow",
                    get(|| async {
                        tokio::time::sleep(Duration::from_secs(2)).await;
                        StatusCode::OK
                    }),
                )
                .fallback(
                    |method: axum::http::Method,
                     uri: axum::http::Uri,
                     headers: HeaderMap,
                     body: String| async move {
                        let header = |name: &str| {
                            headers
                                .get(name)
                                .and_then(|v| v.to_str().ok())
                                .unwrap_or("")
                                .to_string()
                        };
                        let body = json!({
                            "method": method.to_string(),
                            "path": uri.path(),
                            "authorization": header("authorization"),
                            "content_type": header("content-type"),
                            "body": body,
                        });
                        (StatusCode::OK, axum::Json(body))
                    },
                );
            axum::serve(listener, app).await.unwrap();
        });

        (url, handle)
    }

    fn transport(url: &str) -> HttpTransport {
        HttpTransport::new(reqwest::Client::new(), url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn rejects_non_http_base_url() {
        let result = HttpTransport::new(
            reqwest::Client::new(),
            "ftp://api.nightbot.tv",
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let transport = transport("https://api.nightbot.tv/");
        assert_eq!(transport.base_url(), "https://api.nightbot.tv");
        assert_eq!(transport.url("/1/me"), "https://api.nightbot.tv/1/me");
    }

    #[test]
    fn absolute_paths_bypass_base_url() {
        let transport = transport("https://api.nightbot.tv");
        assert_eq!(
            transport.url("https://example.com/oauth2/token"),
            "https://example.com/oauth2/token"
        );
    }

    #[test]
    fn decode_body_handles_empty_json_and_text() {
        assert_eq!(decode_body(""), serde_json::Value::Null);
        assert_eq!(decode_body("  \n"), serde_json::Value::Null);
        assert_eq!(decode_body(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(decode_body("oops"), json!("oops"));
    }

    #[tokio::test]
    async fn forwards_headers_and_form_body() {
        let (url, _handle) = start_mock_api().await;
        let transport = transport(&url);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer at_1"));
        let request = TransportRequest::new(Method::Post, "/oauth2/token")
            .with_headers(headers)
            .with_body(RequestBody::Form(vec![
                ("grant_type".into(), "refresh_token".into()),
                ("refresh_token".into(), "rt 1".into()),
            ]));

        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.data["method"], "POST");
        assert_eq!(response.data["path"], "/oauth2/token");
        assert_eq!(response.data["authorization"], "Bearer at_1");
        assert_eq!(
            response.data["content_type"],
            "application/x-www-form-urlencoded"
        );
        assert_eq!(
            response.data["body"],
            "grant_type=refresh_token&refresh_token=rt+1"
        );
    }

    #[tokio::test]
    async fn sends_json_body() {
        let (url, _handle) = start_mock_api().await;
        let transport = transport(&url);

        let request = TransportRequest::new(Method::Put, "/1/commands/abc")
            .with_body(RequestBody::Json(json!({"message": "hello"})));
        let response = transport.send(request).await.unwrap();

        assert_eq!(response.data["method"], "PUT");
        assert_eq!(response.data["content_type"], "application/json");
        assert_eq!(response.data["body"], r#"{"message":"hello"}"#);
    }

    #[tokio::test]
    async fn delete_without_body_reaches_server() {
        let (url, _handle) = start_mock_api().await;
        let transport = transport(&url);

        let response = transport
            .send(TransportRequest::new(Method::Delete, "/1/commands/abc"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.data["method"], "DELETE");
        assert_eq!(response.data["path"], "/1/commands/abc");
        assert_eq!(response.data["authorization"], "");
        assert_eq!(response.data["body"], "");
    }

    #[tokio::test]
    async fn non_success_status_is_not_an_error() {
        let (url, _handle) = start_mock_api().await;
        let transport = transport(&url);

        let response = transport
            .send(TransportRequest::new(Method::Get, "/missing"))
            .await
            .unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
        assert_eq!(response.data["message"], "not found");
    }

    #[tokio::test]
    async fn empty_and_text_bodies_are_decoded() {
        let (url, _handle) = start_mock_api().await;
        let transport = transport(&url);

        let empty = transport
            .send(TransportRequest::new(Method::Post, "/empty"))
            .await
            .unwrap();
        assert_eq!(empty.status, 200);
        assert_eq!(empty.data, serde_json::Value::Null);

        let text = transport
            .send(TransportRequest::new(Method::Get, "/text"))
            .await
            .unwrap();
        assert_eq!(text.data, json!("plain text"));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let (url, _handle) = start_mock_api().await;
        let transport =
            HttpTransport::new(reqwest::Client::new(), &url, Duration::from_millis(100)).unwrap();

        let result = transport
            .send(TransportRequest::new(Method::Get, "/slow"))
            .await;
        assert!(
            matches!(result, Err(TransportError::Timeout(_))),
            "expected timeout, got: {result:?}"
        );
    }

    #[tokio::test]
    async fn connection_refused_is_request_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = transport(&format!("http://{addr}"));
        let result = transport
            .send(TransportRequest::new(Method::Get, "/1/me"))
            .await;
        assert!(matches!(result, Err(TransportError::Request(_))));
    }
}
