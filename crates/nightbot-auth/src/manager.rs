//! Token lifecycle and authenticated calls
//!
//! `AuthManager` owns the one `Credential` of a client and is shared by every
//! manager as `Arc<AuthManager>`. Each guarded call runs the same envelope:
//!
//! 1. `refresh()`: probe `/1/me`; on rejection exchange the refresh token
//! 2. `ensure_authorized()`: compare the endpoint's scopes with the cached grant
//! 3. send through the transport with `Authorization: Bearer <access token>`
//!
//! The credential sits behind a `RwLock` held only to snapshot or commit,
//! never across network I/O. Refreshes are not serialized: two calls that
//! both see an expired token both exchange, and the last commit wins. Callers
//! sharing one manager across tasks should serialize `refresh` themselves if
//! that matters to them.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use transport::{RequestBody, Transport, TransportRequest, TransportResponse};

use crate::credentials::{ClientInfo, Credential, RefreshHook, TokenInfo};
use crate::endpoint::{EndpointDescriptor, GET_ME};
use crate::error::{Error, Result};
use crate::scope::{self, GrantedScopes, Scope};
use crate::token;

/// Body of `GET /1/me`. Only the granted scopes are read.
#[derive(Debug, Deserialize)]
struct MeResponse {
    authorization: MeAuthorization,
}

#[derive(Debug, Deserialize)]
struct MeAuthorization {
    #[serde(default)]
    scopes: Vec<String>,
}

pub struct AuthManager {
    client: ClientInfo,
    transport: Arc<dyn Transport>,
    state: RwLock<Credential>,
}

impl AuthManager {
    /// Create a manager from the app identity and the initial token pair.
    ///
    /// Fails with `InvalidCredentials` if either token is empty.
    pub fn new(client: ClientInfo, tokens: TokenInfo, transport: Arc<dyn Transport>) -> Result<Self> {
        let credential = Credential::new(tokens)?;
        debug!(
            client_id = %client.client_id,
            scopes_known = credential.scopes().is_known(),
            "auth manager created"
        );
        Ok(Self {
            client,
            transport,
            state: RwLock::new(credential),
        })
    }

    pub fn client_info(&self) -> &ClientInfo {
        &self.client
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Snapshot of the current credential.
    pub async fn credential(&self) -> Credential {
        self.state.read().await.clone()
    }

    pub async fn granted_scopes(&self) -> GrantedScopes {
        self.state.read().await.scopes().clone()
    }

    /// Register, replace or clear the refresh hook.
    pub async fn set_on_refresh(&self, hook: Option<RefreshHook>) {
        self.state.write().await.set_on_refresh(hook);
    }

    /// Probe `/1/me` with the current access token.
    ///
    /// Any non-2xx status means expired. On success the cached scope grant is
    /// replaced with the scopes the server reports. A transport failure (no
    /// status at all) is returned as an error rather than guessed at.
    pub async fn is_expired(&self) -> Result<bool> {
        let headers = self.auth_headers().await?;
        let request = TransportRequest::new(GET_ME.method, GET_ME.path).with_headers(headers);
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            debug!(status = response.status, "access token rejected by probe");
            return Ok(true);
        }

        let me: MeResponse = serde_json::from_value(response.data)
            .map_err(|e| Error::Decode(format!("{} response: {e}", GET_ME.name)))?;
        let scopes = GrantedScopes::from_names(me.authorization.scopes);
        debug!(scopes = ?scopes.to_vec(), "access token valid");
        self.state.write().await.set_scopes(scopes);
        Ok(false)
    }

    /// Refresh the token pair if the probe reports it expired.
    pub async fn refresh(&self) -> Result<()> {
        self.refresh_with(false).await
    }

    /// Refresh the token pair without probing first.
    pub async fn force_refresh(&self) -> Result<()> {
        self.refresh_with(true).await
    }

    async fn refresh_with(&self, force: bool) -> Result<()> {
        if !force && !self.is_expired().await? {
            metrics::counter!("nightbot_token_refresh_total", "outcome" => "skipped").increment(1);
            return Ok(());
        }

        let current = self.credential().await;
        let response = match token::refresh_token(
            self.transport.as_ref(),
            &self.client,
            current.refresh_token().expose(),
        )
        .await
        {
            Ok(response) => response,
            Err(e) => {
                metrics::counter!("nightbot_token_refresh_total", "outcome" => "failure")
                    .increment(1);
                return Err(e);
            }
        };

        // Build the new credential from the state at commit time so a hook
        // registered while the exchange was in flight is honored.
        let (snapshot, hook) = {
            let mut state = self.state.write().await;
            let rotated = state.rotated(response)?;
            *state = rotated;
            (state.token_info(), state.on_refresh().cloned())
        };

        metrics::counter!("nightbot_token_refresh_total", "outcome" => "success").increment(1);
        info!(forced = force, scopes = ?snapshot.scopes, "access token refreshed");

        if let Some(hook) = hook {
            hook(snapshot).map_err(Error::RefreshHook)?;
        }
        Ok(())
    }

    /// Check the cached grant against `required`. No I/O.
    pub async fn ensure_authorized(&self, required: Option<&[Scope]>) -> Result<()> {
        let state = self.state.read().await;
        scope::ensure_authorized(state.scopes(), required)
    }

    /// Headers carrying the current access token as a bearer credential.
    pub async fn auth_headers(&self) -> Result<HeaderMap> {
        let bearer = self.state.read().await.bearer();
        let value = HeaderValue::from_str(&bearer).map_err(|e| {
            Error::InvalidCredentials(format!("access token is not a valid header value: {e}"))
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// Run a guarded call: refresh, gate, then send to `path` with the
    /// endpoint's method.
    ///
    /// `path` is the endpoint's rendered path (see `EndpointDescriptor::render`).
    /// The raw response is returned; mapping statuses to values is up to the
    /// caller.
    pub async fn send(
        &self,
        endpoint: &EndpointDescriptor,
        path: &str,
        body: RequestBody,
    ) -> Result<TransportResponse> {
        self.refresh().await?;
        self.ensure_authorized(endpoint.required_scopes).await?;

        let headers = self.auth_headers().await?;
        let request = TransportRequest::new(endpoint.method, path)
            .with_headers(headers)
            .with_body(body);

        debug!(endpoint = endpoint.name, path, "sending authorized request");
        Ok(self.transport.send(request).await?)
    }
}
