//! Credential state
//!
//! `ClientInfo` is the immutable app identity. `TokenInfo` is what the caller
//! supplies at construction and what the refresh hook receives afterwards.
//! `Credential` is the live state an `AuthManager` mutates: the token pair,
//! the cached scope grant and the optional refresh hook.

use common::Secret;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::scope::{GrantedScopes, Scope};
use crate::token::{TokenResponse, add_bearer, strip_bearer};

/// App identity registered with Nightbot.
#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub client_id: String,
    pub client_secret: Secret<String>,
    /// One of the redirect URIs listed for the app
    pub redirect_uri: String,
}

impl ClientInfo {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret.into()),
            redirect_uri: redirect_uri.into(),
        }
    }
}

/// Error type a refresh hook may return.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Observer called after every successful refresh with the new tokens.
pub type RefreshHook = Arc<dyn Fn(TokenInfo) -> std::result::Result<(), HookError> + Send + Sync>;

/// Token bundle: constructor input and refresh hook payload.
#[derive(Clone)]
pub struct TokenInfo {
    pub access_token: Secret<String>,
    pub refresh_token: Secret<String>,
    /// Scopes granted to the token, if known
    pub scopes: Option<Vec<Scope>>,
    pub on_refresh: Option<RefreshHook>,
}

impl TokenInfo {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Secret::new(access_token.into()),
            refresh_token: Secret::new(refresh_token.into()),
            scopes: None,
            on_refresh: None,
        }
    }

    pub fn with_scopes(mut self, scopes: Vec<Scope>) -> Self {
        self.scopes = Some(scopes);
        self
    }

    pub fn with_on_refresh<F>(mut self, hook: F) -> Self
    where
        F: Fn(TokenInfo) -> std::result::Result<(), HookError> + Send + Sync + 'static,
    {
        self.on_refresh = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenInfo")
            .field("access_token", &self.access_token)
            .field("refresh_token", &self.refresh_token)
            .field("scopes", &self.scopes)
            .field("on_refresh", &self.on_refresh.is_some())
            .finish()
    }
}

/// Live credential: token pair, cached scope grant, refresh hook.
///
/// Tokens are never empty. Values are replaced whole: a refresh builds a new
/// `Credential` with `rotated` and swaps it in, so a failed exchange cannot
/// leave a half-updated credential behind.
#[derive(Clone)]
pub struct Credential {
    access_token: Secret<String>,
    refresh_token: Secret<String>,
    scopes: GrantedScopes,
    on_refresh: Option<RefreshHook>,
}

impl Credential {
    /// Build from caller-supplied tokens. Fails if either token is empty
    /// (a bare `"Bearer "` counts as empty).
    pub fn new(tokens: TokenInfo) -> Result<Self> {
        validate_token("access token", tokens.access_token.expose())?;
        validate_token("refresh token", tokens.refresh_token.expose())?;
        Ok(Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            scopes: GrantedScopes::from(tokens.scopes),
            on_refresh: tokens.on_refresh,
        })
    }

    pub fn access_token(&self) -> &Secret<String> {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &Secret<String> {
        &self.refresh_token
    }

    pub fn scopes(&self) -> &GrantedScopes {
        &self.scopes
    }

    pub fn on_refresh(&self) -> Option<&RefreshHook> {
        self.on_refresh.as_ref()
    }

    /// Authorization header value for the current access token.
    pub fn bearer(&self) -> String {
        add_bearer(self.access_token.expose())
    }

    /// Replace the cached scope grant (validity probe side effect).
    pub(crate) fn set_scopes(&mut self, scopes: GrantedScopes) {
        self.scopes = scopes;
    }

    pub(crate) fn set_on_refresh(&mut self, hook: Option<RefreshHook>) {
        self.on_refresh = hook;
    }

    /// New credential carrying the refreshed tokens and scopes. The hook is
    /// kept; `self` is left untouched.
    pub(crate) fn rotated(&self, token: TokenResponse) -> Result<Self> {
        validate_token("access token", &token.access_token)?;
        validate_token("refresh token", &token.refresh_token)?;
        let scopes = token.scopes();
        Ok(Self {
            access_token: Secret::new(token.access_token),
            refresh_token: Secret::new(token.refresh_token),
            scopes,
            on_refresh: self.on_refresh.clone(),
        })
    }

    /// Snapshot handed to the refresh hook.
    pub fn token_info(&self) -> TokenInfo {
        TokenInfo {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            scopes: self.scopes.to_vec(),
            on_refresh: self.on_refresh.clone(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &self.access_token)
            .field("refresh_token", &self.refresh_token)
            .field("scopes", &self.scopes)
            .field("on_refresh", &self.on_refresh.is_some())
            .finish()
    }
}

fn validate_token(kind: &str, token: &str) -> Result<()> {
    if strip_bearer(token).trim().is_empty() {
        return Err(Error::InvalidCredentials(format!("{kind} must not be empty")));
    }
    Ok(())
}
