//! Request and response types for the channel and command endpoints

use nightbot_auth::{Error, Result};
use serde::{Deserialize, Serialize};

/// Minimum role a chat user needs to trigger a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserLevel {
    Admin,
    Owner,
    Moderator,
    TwitchVip,
    Regular,
    Subscriber,
    #[default]
    Everyone,
}

impl UserLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserLevel::Admin => "admin",
            UserLevel::Owner => "owner",
            UserLevel::Moderator => "moderator",
            UserLevel::TwitchVip => "twitch_vip",
            UserLevel::Regular => "regular",
            UserLevel::Subscriber => "subscriber",
            UserLevel::Everyone => "everyone",
        }
    }
}

/// The API user's channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub joined: bool,
    #[serde(default)]
    pub plan: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelEnvelope {
    pub channel: Channel,
}

/// A custom chat command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCommand {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub cool_down: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub user_level: UserLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCommandList {
    #[serde(rename = "_total", default)]
    pub total: u64,
    pub commands: Vec<CustomCommand>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CustomCommandEnvelope {
    pub command: CustomCommand,
}

/// A built-in command (`!commands`, `!filters`, ...) and its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultCommand {
    pub name: String,
    #[serde(default)]
    pub cool_down: u64,
    pub enabled: bool,
    #[serde(default)]
    pub user_level: UserLevel,
    /// Unique name without prefix, used in request paths
    #[serde(rename = "_name")]
    pub internal_name: String,
    #[serde(rename = "_description", default)]
    pub description: String,
    #[serde(rename = "_docs", default)]
    pub docs: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultCommandList {
    #[serde(rename = "_total", default)]
    pub total: u64,
    pub commands: Vec<DefaultCommand>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DefaultCommandEnvelope {
    pub command: DefaultCommand,
}

/// Body of `POST /1/commands`. Cooldown defaults to 0, user level to everyone.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomCommand {
    pub name: String,
    pub message: String,
    pub cool_down: u64,
    pub user_level: UserLevel,
}

impl NewCustomCommand {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            cool_down: 0,
            user_level: UserLevel::Everyone,
        }
    }

    pub fn with_cool_down(mut self, seconds: u64) -> Self {
        self.cool_down = seconds;
        self
    }

    pub fn with_user_level(mut self, level: UserLevel) -> Self {
        self.user_level = level;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidRequest("command name must not be empty".into()));
        }
        validate_message(&self.message)
    }

    /// Form fields in the API's naming.
    pub(crate) fn into_form(self) -> Vec<(String, String)> {
        vec![
            ("name".to_string(), self.name),
            ("message".to_string(), self.message),
            ("coolDown".to_string(), self.cool_down.to_string()),
            ("userLevel".to_string(), self.user_level.as_str().to_string()),
        ]
    }
}

/// Body of `PUT /1/commands/:id`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCustomCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cool_down: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_level: Option<UserLevel>,
}

impl EditCustomCommand {
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(message) = &self.message {
            validate_message(message)?;
        }
        validate_assignable(self.user_level)
    }
}

/// Body of `PUT /1/commands/default/:name`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditDefaultCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cool_down: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_level: Option<UserLevel>,
}

impl EditDefaultCommand {
    pub(crate) fn validate(&self) -> Result<()> {
        validate_assignable(self.user_level)
    }
}

/// Body of `POST /1/channel/send`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendMessage<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<&'a str>,
}

/// Chat messages and command responses share the API's length limit.
pub(crate) fn validate_message(message: &str) -> Result<()> {
    let length = message.chars().count();
    if length == 0 {
        return Err(Error::InvalidRequest("message must not be empty".into()));
    }
    if length > nightbot_auth::MAX_MESSAGE_LENGTH {
        return Err(Error::InvalidRequest(format!(
            "message is {length} characters, maximum is {}",
            nightbot_auth::MAX_MESSAGE_LENGTH
        )));
    }
    Ok(())
}

/// `admin` is reserved for Nightbot staff and cannot be set on edits.
fn validate_assignable(level: Option<UserLevel>) -> Result<()> {
    if level == Some(UserLevel::Admin) {
        return Err(Error::InvalidRequest(
            "user level `admin` cannot be assigned".into(),
        ));
    }
    Ok(())
}
