//! Client wiring

use std::sync::Arc;
use std::time::Duration;

use nightbot_auth::{API_BASE_URL, AuthManager, ClientInfo, Error, Result, TokenInfo};
use transport::{HttpTransport, Transport};

use crate::channel::ChannelManager;
use crate::commands::CommandManager;

/// Request timeout used by `Client::connect`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One authenticated API user: the shared `AuthManager` plus a manager per
/// resource group.
#[derive(Clone)]
pub struct Client {
    auth: Arc<AuthManager>,
    pub commands: CommandManager,
    pub channel: ChannelManager,
}

impl Client {
    pub fn new(auth: Arc<AuthManager>) -> Self {
        Self {
            commands: CommandManager::new(auth.clone()),
            channel: ChannelManager::new(auth.clone()),
            auth,
        }
    }

    /// Client against `https://api.nightbot.tv` with the default timeout.
    pub fn connect(client: ClientInfo, tokens: TokenInfo) -> Result<Self> {
        Self::connect_to(client, tokens, API_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Client against an arbitrary base URL.
    pub fn connect_to(
        client: ClientInfo,
        tokens: TokenInfo,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Http(format!("building HTTP client: {e}")))?;
        let transport = HttpTransport::new(http, base_url, timeout)?;
        Self::with_transport(client, tokens, Arc::new(transport))
    }

    /// Client over a caller-supplied transport.
    pub fn with_transport(
        client: ClientInfo,
        tokens: TokenInfo,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let auth = AuthManager::new(client, tokens, transport)?;
        Ok(Self::new(Arc::new(auth)))
    }

    pub fn auth(&self) -> &Arc<AuthManager> {
        &self.auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use transport::{Method, ScriptedTransport};

    fn client_info() -> ClientInfo {
        ClientInfo::new("client", "secret", "https://example.com/cb")
    }

    #[test]
    fn connect_rejects_bad_base_url() {
        let result = Client::connect_to(
            client_info(),
            TokenInfo::new("at", "rt"),
            "api.nightbot.tv",
            DEFAULT_TIMEOUT,
        );
        assert!(matches!(result, Err(Error::Http(_))));
    }

    #[test]
    fn connect_rejects_empty_tokens() {
        let result = Client::connect(client_info(), TokenInfo::new("", "rt"));
        assert!(matches!(result, Err(Error::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn managers_share_one_credential() {
        let transport = Arc::new(ScriptedTransport::new());
        // Probe rejects the stale token, forcing an exchange
        transport.respond(Method::Get, "/1/me", 401, json!({"status": 401}));
        transport.respond(
            Method::Post,
            "/oauth2/token",
            200,
            json!({
                "access_token": "fresh",
                "refresh_token": "fresh-r",
                "token_type": "bearer",
                "expires_in": 2592000,
                "scope": "channel commands"
            }),
        );
        transport.respond(
            Method::Get,
            "/1/commands",
            200,
            json!({"_total": 0, "status": 200, "commands": []}),
        );
        let client = Client::with_transport(client_info(), TokenInfo::new("stale", "rt"), transport.clone()).unwrap();

        assert!(client.commands.custom_commands().await.unwrap().is_empty());

        // Every manager reads the refreshed credential
        let credential = client.auth().credential().await;
        assert_eq!(credential.access_token().expose(), "fresh");
        let request = transport
            .requests()
            .into_iter()
            .find(|r| r.path == "/1/commands")
            .unwrap();
        assert_eq!(request.headers.get("authorization").unwrap(), "Bearer fresh");
    }
}
