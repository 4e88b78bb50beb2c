//! Nightbot OAuth authentication and authorization
//!
//! The token-lifecycle core of the Nightbot SDK. Every guarded API call goes
//! through `AuthManager::send`, which makes sure the access token is still
//! accepted (refreshing it if not), checks the endpoint's required scopes
//! against the scopes the server last reported, and only then sends the
//! request with a bearer header.
//!
//! Credential flow:
//! 1. App builds a consent URL with `authorize::build_authorization_url()`
//! 2. The redirect's code is exchanged via `token::exchange_code()`
//! 3. `AuthManager::new()` takes the resulting `TokenInfo`
//! 4. Calls probe `/1/me` and refresh through `/oauth2/token` on demand
//! 5. The `on_refresh` hook receives every new token pair for persistence

pub mod authorize;
pub mod constants;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod manager;
pub mod scope;
pub mod token;

pub use authorize::{build_authorization_url, generate_state};
pub use constants::*;
pub use credentials::{ClientInfo, Credential, HookError, RefreshHook, TokenInfo};
pub use endpoint::EndpointDescriptor;
pub use error::{Error, Result, api_error_message};
pub use manager::AuthManager;
pub use scope::{GrantedScopes, Scope, ScopeList, ensure_authorized};
pub use token::{TokenResponse, add_bearer, exchange_code, refresh_token, strip_bearer};
