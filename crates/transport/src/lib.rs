//! HTTP transport boundary for the Nightbot SDK
//!
//! Defines the `Transport` trait the SDK core talks to. The core never touches
//! `reqwest` directly: it builds a `TransportRequest` (method, path, headers,
//! body) and receives a `TransportResponse` (status + decoded JSON). Any status,
//! including non-2xx, is a successful transport round trip; only failures that
//! produce no status at all are `TransportError`s.
//!
//! `HttpTransport` is the production implementation. `ScriptedTransport`
//! (feature `test-util`) serves canned responses for tests.

pub mod http;
#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

pub use http::HttpTransport;
#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedTransport;

use reqwest::header::HeaderMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// HTTP verbs used by the Nightbot API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body encodings the API accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// `application/x-www-form-urlencoded` pairs, sent in order.
    Form(Vec<(String, String)>),
    Json(serde_json::Value),
}

/// A single outbound request. `path` is relative to the transport's base URL.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl TransportRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Look up a form field by name (first occurrence).
    pub fn form_value(&self, name: &str) -> Option<&str> {
        match &self.body {
            RequestBody::Form(pairs) => pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }
}

/// Status and decoded body of a completed round trip.
///
/// `data` is the parsed JSON body, `Value::Null` for an empty body, or
/// `Value::String` holding the raw text when the body is not JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub data: serde_json::Value,
}

impl TransportResponse {
    pub fn new(status: u16, data: serde_json::Value) -> Self {
        Self { status, data }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures that produced no HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Abstraction over the HTTP client used by the SDK.
///
/// Uses a `Pin<Box<dyn Future>>` return type so the SDK can hold an
/// `Arc<dyn Transport>` shared by every manager.
pub trait Transport: Send + Sync {
    /// Send one request and return its status and body.
    ///
    /// Non-2xx statuses are returned as `Ok`; interpreting them is the
    /// caller's job.
    fn send(
        &self,
        request: TransportRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse>> + Send + '_>>;
}
