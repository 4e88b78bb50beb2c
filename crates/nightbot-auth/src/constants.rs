//! Nightbot API constants
//!
//! Public endpoints of the Nightbot API. Client credentials are supplied by the
//! caller; nothing secret lives here.

/// Base URL of the Nightbot REST API
pub const API_BASE_URL: &str = "https://api.nightbot.tv";

/// Authorization endpoint for the authorization-code flow
pub const AUTHORIZE_ENDPOINT: &str = "https://api.nightbot.tv/oauth2/authorize";

/// Scheme label that may prefix a stored token
pub const BEARER_PREFIX: &str = "Bearer ";

/// Error message used when an error response carries neither `message` nor
/// `error_description`.
pub const UNKNOWN_API_ERROR: &str = "unknown api error";

/// Longest chat message the API accepts, in characters
pub const MAX_MESSAGE_LENGTH: usize = 400;
