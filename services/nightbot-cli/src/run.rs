//! Subcommand execution
//!
//! Each subcommand maps to one SDK call and yields a JSON value for `main`
//! to print.

use anyhow::{Context, Result, anyhow};
use nightbot_api::{Client, NewCustomCommand};
use nightbot_auth::{ClientInfo, build_authorization_url, exchange_code, generate_state};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;
use transport::HttpTransport;

use crate::cli::{ApiCommand, Command};
use crate::config::Config;
use crate::token_store::TokenStore;

pub async fn run(config: &Config, command: Command) -> Result<Value> {
    let store = TokenStore::new(&config.tokens.path);

    match command {
        Command::AuthorizeUrl { scopes } => {
            // Building the URL needs no secret
            let client = ClientInfo::new(
                config.client.client_id.clone(),
                String::new(),
                config.client.redirect_uri.clone(),
            );
            let state = generate_state();
            let url = build_authorization_url(&client, &scopes, &state);
            Ok(json!({ "url": url, "state": state }))
        }
        Command::Exchange { code } => {
            let client = config.client_info()?;
            let transport = http_transport(config)?;
            let token = exchange_code(&transport, &client, &code)
                .await
                .context("exchanging authorization code")?;
            let tokens = token.into_token_info();
            store
                .save(&tokens)
                .await
                .with_context(|| format!("saving tokens to {}", store.path().display()))?;
            info!(path = %store.path().display(), "authorization complete");
            Ok(json!({ "scopes": tokens.scopes }))
        }
        Command::Api(command) => run_api(config, &store, command).await,
    }
}

async fn run_api(config: &Config, store: &TokenStore, command: ApiCommand) -> Result<Value> {
    let mut tokens = store.load().await?;
    tokens.on_refresh = Some(store.hook());
    let client = Client::with_transport(
        config.client_info()?,
        tokens,
        Arc::new(http_transport(config)?),
    )?;

    let value = match command {
        ApiCommand::Refresh => {
            client.auth().force_refresh().await?;
            let credential = client.auth().credential().await;
            json!({ "scopes": credential.scopes().to_vec() })
        }
        ApiCommand::Commands => serde_json::to_value(client.commands.custom_commands().await?)?,
        ApiCommand::Command { id } => {
            let command = client
                .commands
                .custom_command(&id)
                .await?
                .ok_or_else(|| anyhow!("custom command {id} not found"))?;
            serde_json::to_value(command)?
        }
        ApiCommand::AddCommand { name, message } => {
            let command = client
                .commands
                .add_custom_command(NewCustomCommand::new(name, message))
                .await?;
            serde_json::to_value(command)?
        }
        ApiCommand::DeleteCommand { id } => {
            client.commands.delete_custom_command(&id).await?;
            json!({ "deleted": id })
        }
        ApiCommand::DefaultCommands => serde_json::to_value(client.commands.default_commands().await?)?,
        ApiCommand::DefaultCommand { name } => {
            let command = client
                .commands
                .default_command(&name)
                .await?
                .ok_or_else(|| anyhow!("default command {name} not found"))?;
            serde_json::to_value(command)?
        }
        ApiCommand::Channel => serde_json::to_value(client.channel.channel().await?)?,
        ApiCommand::Join => {
            client.channel.join().await?;
            json!({ "joined": true })
        }
        ApiCommand::Part => {
            client.channel.part().await?;
            json!({ "joined": false })
        }
        ApiCommand::Send { message, chat_id } => {
            client
                .channel
                .send_message(&message, chat_id.as_deref())
                .await?;
            json!({ "sent": message })
        }
    };
    Ok(value)
}

fn http_transport(config: &Config) -> Result<HttpTransport> {
    let http = reqwest::Client::builder()
        .build()
        .context("building HTTP client")?;
    Ok(HttpTransport::new(http, &config.api.base_url, config.timeout())?)
}
