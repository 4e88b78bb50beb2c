//! OAuth token exchange and refresh
//!
//! Handles the two token endpoint interactions:
//! 1. Authorization code exchange (completing the authorization-code flow)
//! 2. Token refresh (when the validity probe reports the token expired)
//!
//! Both POST a form to `/oauth2/token` with different grant types. The client
//! identity travels in the body; no bearer header is sent.
//!
//! Also hosts bearer normalization: a token may be stored bare or prefixed
//! with `"Bearer "`. The Authorization header always carries the prefix; the
//! token endpoint expects the bare refresh token.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use transport::{RequestBody, Transport, TransportRequest};

use crate::constants::BEARER_PREFIX;
use crate::credentials::{ClientInfo, TokenInfo};
use crate::endpoint::REFRESH_TOKEN;
use crate::error::{Error, Result, api_error_message};
use crate::scope::GrantedScopes;

/// Remove the `"Bearer "` prefix. Repeated prefixes are all removed, so the
/// result never starts with the prefix and stripping twice changes nothing.
pub fn strip_bearer(token: &str) -> &str {
    token.trim_start_matches(BEARER_PREFIX)
}

/// Prepend `"Bearer "` unless the token already carries it.
pub fn add_bearer(token: &str) -> String {
    if token.starts_with(BEARER_PREFIX) {
        token.to_string()
    } else {
        format!("{BEARER_PREFIX}{token}")
    }
}

/// Response from the token endpoint for both exchange and refresh.
#[derive(Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Seconds until the access token expires (delta, not absolute)
    #[serde(default)]
    pub expires_in: u64,
    /// Space-delimited granted scopes
    #[serde(default)]
    pub scope: String,
}

impl TokenResponse {
    pub fn scopes(&self) -> GrantedScopes {
        GrantedScopes::from_scope_string(&self.scope)
    }

    /// Convert into the token bundle an `AuthManager` is constructed from.
    pub fn into_token_info(self) -> TokenInfo {
        let scopes = self.scopes().to_vec();
        let mut info = TokenInfo::new(self.access_token, self.refresh_token);
        info.scopes = scopes;
        info
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Exchange an authorization code for tokens.
///
/// The user has authorized the app in their browser and the redirect handed
/// us `code`. The redirect URI must match the one used to build the
/// authorization URL.
pub async fn exchange_code(
    transport: &dyn Transport,
    client: &ClientInfo,
    code: &str,
) -> Result<TokenResponse> {
    let form = vec![
        ("client_id".to_string(), client.client_id.clone()),
        (
            "client_secret".to_string(),
            client.client_secret.expose().clone(),
        ),
        ("grant_type".to_string(), "authorization_code".to_string()),
        ("redirect_uri".to_string(), client.redirect_uri.clone()),
        ("code".to_string(), code.to_string()),
    ];
    post_token_form(transport, form, "authorization_code").await
}

/// Exchange a refresh token for a new access/refresh token pair.
///
/// The refresh token is sent bare even if it was stored with a bearer prefix.
pub async fn refresh_token(
    transport: &dyn Transport,
    client: &ClientInfo,
    refresh: &str,
) -> Result<TokenResponse> {
    let form = vec![
        ("client_id".to_string(), client.client_id.clone()),
        (
            "client_secret".to_string(),
            client.client_secret.expose().clone(),
        ),
        ("grant_type".to_string(), "refresh_token".to_string()),
        ("redirect_uri".to_string(), client.redirect_uri.clone()),
        ("refresh_token".to_string(), strip_bearer(refresh).to_string()),
    ];
    post_token_form(transport, form, "refresh_token").await
}

async fn post_token_form(
    transport: &dyn Transport,
    form: Vec<(String, String)>,
    grant_type: &str,
) -> Result<TokenResponse> {
    let request = TransportRequest::new(REFRESH_TOKEN.method, REFRESH_TOKEN.path)
        .with_body(RequestBody::Form(form));

    debug!(grant_type, "requesting token");
    let response = transport.send(request).await?;

    if !response.is_success() {
        let message = api_error_message(&response.data);
        debug!(grant_type, status = response.status, error = %message, "token endpoint rejected request");
        return Err(Error::TokenExchange(message));
    }

    let token: TokenResponse = serde_json::from_value(response.data)
        .map_err(|e| Error::TokenExchange(format!("invalid token response: {e}")))?;

    if token.access_token.is_empty() || token.refresh_token.is_empty() {
        return Err(Error::TokenExchange(
            "token response carried an empty token".into(),
        ));
    }

    Ok(token)
}
