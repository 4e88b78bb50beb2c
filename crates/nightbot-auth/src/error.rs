//! Error types for the Nightbot SDK

use crate::constants::UNKNOWN_API_ERROR;
use crate::credentials::HookError;
use crate::scope::ScopeList;

/// Errors from authentication, authorization and API calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("missing scopes, required scopes: {required}")]
    MissingScopes { required: ScopeList },

    #[error("API request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("refresh hook failed: {0}")]
    RefreshHook(#[source] HookError),
}

impl From<transport::TransportError> for Error {
    fn from(err: transport::TransportError) -> Self {
        Error::Http(err.to_string())
    }
}

/// Result alias for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pull a human-readable message out of an API error body.
///
/// Nightbot reports API errors as `{"status": .., "message": ..}` and OAuth
/// errors as `{"error": .., "error_description": ..}`.
pub fn api_error_message(data: &serde_json::Value) -> String {
    ["message", "error_description"]
        .iter()
        .filter_map(|field| data.get(field).and_then(|v| v.as_str()))
        .find(|message| !message.is_empty())
        .unwrap_or(UNKNOWN_API_ERROR)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use serde_json::json;

    #[test]
    fn message_field_wins() {
        let data = json!({"message": "Channel not found", "error_description": "other"});
        assert_eq!(api_error_message(&data), "Channel not found");
    }

    #[test]
    fn falls_back_to_error_description() {
        let data = json!({"error": "invalid_grant", "error_description": "Invalid refresh token"});
        assert_eq!(api_error_message(&data), "Invalid refresh token");
    }

    #[test]
    fn falls_back_to_generic_message() {
        assert_eq!(api_error_message(&json!({})), "unknown api error");
        assert_eq!(api_error_message(&serde_json::Value::Null), "unknown api error");
        assert_eq!(api_error_message(&json!("Bad Gateway")), "unknown api error");
        assert_eq!(api_error_message(&json!({"message": 42})), "unknown api error");
    }

    #[test]
    fn missing_scopes_lists_required_set_in_order() {
        let err = Error::MissingScopes {
            required: ScopeList(vec![Scope::Commands, Scope::Channel]),
        };
        assert_eq!(
            err.to_string(),
            "missing scopes, required scopes: commands,channel"
        );
    }

    #[test]
    fn transport_error_maps_to_http() {
        let err: Error = transport::TransportError::Timeout("GET /1/me".into()).into();
        assert!(matches!(err, Error::Http(_)));
        assert!(err.to_string().contains("GET /1/me"));
    }

    #[test]
    fn api_error_display_includes_status() {
        let err = Error::Api {
            status: 500,
            message: "unknown api error".into(),
        };
        assert_eq!(err.to_string(), "API request failed (500): unknown api error");
    }
}
