//! Channel operations: lookup, join/part and sending chat messages

use std::sync::Arc;

use nightbot_auth::endpoint::{GET_CHANNEL, JOIN_CHANNEL, PART_CHANNEL, SEND_MESSAGE};
use nightbot_auth::{AuthManager, Error, Result};
use tracing::info;
use transport::RequestBody;

use crate::response::{expect_ok, expect_success};
use crate::types::{Channel, ChannelEnvelope, SendMessage, validate_message};

#[derive(Clone)]
pub struct ChannelManager {
    auth: Arc<AuthManager>,
}

impl ChannelManager {
    pub fn new(auth: Arc<AuthManager>) -> Self {
        Self { auth }
    }

    /// The channel owned by the API user.
    pub async fn channel(&self) -> Result<Channel> {
        let response = self
            .auth
            .send(&GET_CHANNEL, GET_CHANNEL.path, RequestBody::Empty)
            .await?;
        let envelope: ChannelEnvelope = expect_ok(&GET_CHANNEL, response)?;
        Ok(envelope.channel)
    }

    /// Make Nightbot join the channel.
    pub async fn join(&self) -> Result<()> {
        let response = self
            .auth
            .send(&JOIN_CHANNEL, JOIN_CHANNEL.path, RequestBody::Empty)
            .await?;
        expect_success(&JOIN_CHANNEL, response)?;
        info!("joined channel");
        Ok(())
    }

    /// Make Nightbot leave the channel.
    pub async fn part(&self) -> Result<()> {
        let response = self
            .auth
            .send(&PART_CHANNEL, PART_CHANNEL.path, RequestBody::Empty)
            .await?;
        expect_success(&PART_CHANNEL, response)?;
        info!("parted channel");
        Ok(())
    }

    /// Send a chat message as Nightbot.
    ///
    /// `chat_id` targets one chat room when the channel has several. Messages
    /// are limited to 400 characters; longer or empty ones fail with
    /// `InvalidRequest` before any request is made. The API rate-limits this
    /// endpoint to one message per five seconds.
    pub async fn send_message(&self, message: &str, chat_id: Option<&str>) -> Result<()> {
        validate_message(message)?;
        let body = serde_json::to_value(SendMessage { message, chat_id })
            .map_err(|e| Error::InvalidRequest(format!("encoding message: {e}")))?;
        let response = self
            .auth
            .send(&SEND_MESSAGE, SEND_MESSAGE.path, RequestBody::Json(body))
            .await?;
        expect_success(&SEND_MESSAGE, response)
    }
}
