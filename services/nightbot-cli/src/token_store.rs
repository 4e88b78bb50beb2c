//! Token file persistence
//!
//! The token pair lives in a small JSON file next to the config. It is read
//! once at startup and rewritten whenever the SDK hands over a new pair,
//! either from the refresh hook or after `exchange`.
//!
//! `load` and `save` use `tokio::fs`. The refresh hook is a plain `Fn`, so it
//! writes through `save_blocking` instead.

use nightbot_auth::{HookError, RefreshHook, Scope, TokenInfo};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// On-disk shape of the token file.
#[derive(Serialize, Deserialize)]
struct StoredTokens {
    access_token: String,
    refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scopes: Option<Vec<Scope>>,
}

impl StoredTokens {
    fn from_info(tokens: &TokenInfo) -> Self {
        Self {
            access_token: tokens.access_token.expose().clone(),
            refresh_token: tokens.refresh_token.expose().clone(),
            scopes: tokens.scopes.clone(),
        }
    }

    fn into_info(self) -> TokenInfo {
        let mut tokens = TokenInfo::new(self.access_token, self.refresh_token);
        tokens.scopes = self.scopes;
        tokens
    }
}

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token pair. The hook is not set.
    pub async fn load(&self) -> common::Result<TokenInfo> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            common::Error::Config(format!(
                "reading token file {}: {e} (run `nightbot exchange <code>` first)",
                self.path.display()
            ))
        })?;
        let stored: StoredTokens = serde_json::from_str(&contents)
            .map_err(|e| common::Error::Config(format!("parsing token file: {e}")))?;
        debug!(path = %self.path.display(), "loaded tokens");
        Ok(stored.into_info())
    }

    /// Persist a token pair.
    ///
    /// Uses atomic write (temp file + rename) so a crash mid-write never
    /// leaves a truncated file. Permissions are 0600 (owner read/write only).
    pub async fn save(&self, tokens: &TokenInfo) -> common::Result<()> {
        let json = encode(tokens)?;
        let tmp_path = tmp_path(&self.path);

        tokio::fs::write(&tmp_path, json.as_bytes()).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        tokio::fs::rename(&tmp_path, &self.path).await?;
        info!(path = %self.path.display(), "persisted tokens");
        Ok(())
    }

    /// Same as `save`, for callers outside the runtime such as the refresh hook.
    pub fn save_blocking(&self, tokens: &TokenInfo) -> common::Result<()> {
        let json = encode(tokens)?;
        let tmp_path = tmp_path(&self.path);

        std::fs::write(&tmp_path, json.as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
        }

        std::fs::rename(&tmp_path, &self.path)?;
        info!(path = %self.path.display(), "persisted refreshed tokens");
        Ok(())
    }

    /// Refresh hook that writes every new pair to this store.
    pub fn hook(&self) -> RefreshHook {
        let store = self.clone();
        Arc::new(move |tokens: TokenInfo| -> Result<(), HookError> {
            store.save_blocking(&tokens)?;
            Ok(())
        })
    }
}

fn encode(tokens: &TokenInfo) -> common::Result<String> {
    serde_json::to_string_pretty(&StoredTokens::from_info(tokens))
        .map_err(|e| common::Error::Config(format!("serializing tokens: {e}")))
}

/// Temp file in the target's directory so the rename stays on one filesystem.
fn tmp_path(path: &Path) -> PathBuf {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    dir.join(format!(".nightbot-tokens.tmp.{}", std::process::id()))
}
