//! Authorization-code flow helpers
//!
//! Builds the URL that sends the user to Nightbot's consent page and the
//! opaque `state` value that protects the redirect against CSRF. The code
//! handed back on the redirect is turned into tokens by `token::exchange_code`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;

use crate::constants::AUTHORIZE_ENDPOINT;
use crate::credentials::ClientInfo;
use crate::endpoint::percent_encode;
use crate::scope::Scope;

/// Generate a random `state` value: 32 random bytes as URL-safe base64.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Build the consent URL for `scopes`.
///
/// The authorization server returns `state` unchanged on the redirect; the
/// caller must compare it before exchanging the code.
pub fn build_authorization_url(client: &ClientInfo, scopes: &[Scope], state: &str) -> String {
    let scope = scopes
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
        AUTHORIZE_ENDPOINT,
        percent_encode(&client.client_id),
        percent_encode(&client.redirect_uri),
        percent_encode(&scope),
        percent_encode(state),
    )
}
