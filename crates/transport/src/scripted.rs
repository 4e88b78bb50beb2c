//! In-memory transport with canned responses, for tests.
//!
//! Responses are queued per `(method, path)`. Each request pops the next queued
//! response for its route; the last one is sticky so a route scripted once
//! answers every later call the same way. Every request is recorded so tests
//! can assert on headers, bodies and call counts.

use crate::{Method, Result, Transport, TransportError, TransportRequest, TransportResponse};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<TransportResponse>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method path`.
    pub fn respond(
        &self,
        method: Method,
        path: &str,
        status: u16,
        data: serde_json::Value,
    ) -> &Self {
        let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(TransportResponse::new(status, data));
        self
    }

    /// All requests sent so far, in order.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of requests sent to `method path`.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn next_response(&self, method: Method, path: &str) -> Option<TransportResponse> {
        let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Transport for ScriptedTransport {
    fn send(
        &self,
        request: TransportRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse>> + Send + '_>> {
        let method = request.method;
        let path = request.path.clone();
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        let response = self.next_response(method, &path).ok_or_else(|| {
            TransportError::Request(format!("no scripted response for {method} {path}"))
        });
        Box::pin(async move { response })
    }
}
