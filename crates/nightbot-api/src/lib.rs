//! Typed managers for the Nightbot REST API
//!
//! `Client` bundles one `AuthManager` with the `CommandManager` and
//! `ChannelManager` that share it. Every call goes through
//! `AuthManager::send` (refresh, scope gate, bearer header) and maps the
//! response status with the helpers in `response`:
//! - 2xx: the decoded value
//! - 404 on lookups and edits: `None`
//! - anything else: `Error::Api` with the server's message

pub mod channel;
pub mod client;
pub mod commands;
pub mod response;
pub mod types;

pub use channel::ChannelManager;
pub use client::{Client, DEFAULT_TIMEOUT};
pub use commands::CommandManager;
pub use nightbot_auth::{Error, Result};
pub use response::{ResponseClass, classify_status};
pub use types::{
    Channel, CustomCommand, CustomCommandList, DefaultCommand, DefaultCommandList,
    EditCustomCommand, EditDefaultCommand, NewCustomCommand, UserLevel,
};
