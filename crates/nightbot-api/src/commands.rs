//! Custom and default command operations

use std::sync::Arc;

use nightbot_auth::endpoint::{
    ADD_COMMAND, DELETE_COMMAND, EDIT_COMMAND, EDIT_DEFAULT_COMMAND, GET_COMMAND_BY_ID,
    GET_COMMANDS, GET_DEFAULT_COMMAND_BY_NAME, GET_DEFAULT_COMMANDS,
};
use nightbot_auth::{AuthManager, Error, Result};
use tracing::debug;
use transport::RequestBody;

use crate::response::{expect_ok, expect_success, ok_or_not_found};
use crate::types::{
    CustomCommand, CustomCommandEnvelope, CustomCommandList, DefaultCommand,
    DefaultCommandEnvelope, DefaultCommandList, EditCustomCommand, EditDefaultCommand,
    NewCustomCommand,
};

/// Commands of the API user's channel.
#[derive(Clone)]
pub struct CommandManager {
    auth: Arc<AuthManager>,
}

impl CommandManager {
    pub fn new(auth: Arc<AuthManager>) -> Self {
        Self { auth }
    }

    /// List the channel's custom commands.
    pub async fn custom_commands(&self) -> Result<Vec<CustomCommand>> {
        let response = self
            .auth
            .send(&GET_COMMANDS, GET_COMMANDS.path, RequestBody::Empty)
            .await?;
        let list: CustomCommandList = expect_ok(&GET_COMMANDS, response)?;
        Ok(list.commands)
    }

    /// Look up a custom command by id. `None` if it does not exist.
    pub async fn custom_command(&self, id: &str) -> Result<Option<CustomCommand>> {
        let path = GET_COMMAND_BY_ID.render(&[("id", id)])?;
        let response = self
            .auth
            .send(&GET_COMMAND_BY_ID, &path, RequestBody::Empty)
            .await?;
        let envelope: Option<CustomCommandEnvelope> = ok_or_not_found(&GET_COMMAND_BY_ID, response)?;
        Ok(envelope.map(|e| e.command))
    }

    /// Add a custom command.
    pub async fn add_custom_command(&self, command: NewCustomCommand) -> Result<CustomCommand> {
        command.validate()?;
        debug!(name = %command.name, "adding custom command");
        let response = self
            .auth
            .send(
                &ADD_COMMAND,
                ADD_COMMAND.path,
                RequestBody::Form(command.into_form()),
            )
            .await?;
        let envelope: CustomCommandEnvelope = expect_ok(&ADD_COMMAND, response)?;
        Ok(envelope.command)
    }

    /// Edit a custom command by id. `None` if it does not exist.
    pub async fn edit_custom_command(
        &self,
        id: &str,
        edit: EditCustomCommand,
    ) -> Result<Option<CustomCommand>> {
        edit.validate()?;
        let path = EDIT_COMMAND.render(&[("id", id)])?;
        let body = serde_json::to_value(&edit)
            .map_err(|e| Error::InvalidRequest(format!("encoding command edit: {e}")))?;
        let response = self
            .auth
            .send(&EDIT_COMMAND, &path, RequestBody::Json(body))
            .await?;
        let envelope: Option<CustomCommandEnvelope> = ok_or_not_found(&EDIT_COMMAND, response)?;
        Ok(envelope.map(|e| e.command))
    }

    /// Delete a custom command by id.
    pub async fn delete_custom_command(&self, id: &str) -> Result<()> {
        let path = DELETE_COMMAND.render(&[("id", id)])?;
        let response = self
            .auth
            .send(&DELETE_COMMAND, &path, RequestBody::Empty)
            .await?;
        expect_success(&DELETE_COMMAND, response)
    }

    /// List the channel's default commands.
    pub async fn default_commands(&self) -> Result<DefaultCommandList> {
        let response = self
            .auth
            .send(&GET_DEFAULT_COMMANDS, GET_DEFAULT_COMMANDS.path, RequestBody::Empty)
            .await?;
        expect_ok(&GET_DEFAULT_COMMANDS, response)
    }

    /// Look up a default command by its unique name (no prefix).
    pub async fn default_command(&self, name: &str) -> Result<Option<DefaultCommand>> {
        let path = GET_DEFAULT_COMMAND_BY_NAME.render(&[("name", name)])?;
        let response = self
            .auth
            .send(&GET_DEFAULT_COMMAND_BY_NAME, &path, RequestBody::Empty)
            .await?;
        let envelope: Option<DefaultCommandEnvelope> =
            ok_or_not_found(&GET_DEFAULT_COMMAND_BY_NAME, response)?;
        Ok(envelope.map(|e| e.command))
    }

    /// Edit a default command by its unique name. `None` if it does not exist.
    pub async fn edit_default_command(
        &self,
        name: &str,
        edit: EditDefaultCommand,
    ) -> Result<Option<DefaultCommand>> {
        edit.validate()?;
        let path = EDIT_DEFAULT_COMMAND.render(&[("name", name)])?;
        let body = serde_json::to_value(&edit)
            .map_err(|e| Error::InvalidRequest(format!("encoding default command edit: {e}")))?;
        let response = self
            .auth
            .send(&EDIT_DEFAULT_COMMAND, &path, RequestBody::Json(body))
            .await?;
        let envelope: Option<DefaultCommandEnvelope> =
            ok_or_not_found(&EDIT_DEFAULT_COMMAND, response)?;
        Ok(envelope.map(|e| e.command))
    }
}
