//! Endpoint registry
//!
//! Static descriptors for every API operation the SDK issues: method, path
//! template and the scopes a call needs. Path templates use `:name`
//! placeholders, filled by `EndpointDescriptor::render`.

use transport::Method;

use crate::error::{Error, Result};
use crate::scope::Scope;

/// Method, path template and authorization requirement of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    /// Operation name, used in logs and metrics labels
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    /// `None` when the endpoint needs no scope
    pub required_scopes: Option<&'static [Scope]>,
}

impl EndpointDescriptor {
    /// Fill `:name` placeholders with percent-encoded values.
    ///
    /// Every placeholder needs a non-empty value: an empty id would silently
    /// address the collection instead of one item.
    pub fn render(&self, params: &[(&str, &str)]) -> Result<String> {
        let mut rendered = String::with_capacity(self.path.len());
        for segment in self.path.split('/').skip(1) {
            rendered.push('/');
            match segment.strip_prefix(':') {
                Some(placeholder) => {
                    let value = params
                        .iter()
                        .find(|(name, _)| *name == placeholder)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| {
                            Error::InvalidRequest(format!(
                                "{}: missing path parameter `{placeholder}`",
                                self.name
                            ))
                        })?;
                    if value.is_empty() {
                        return Err(Error::InvalidRequest(format!(
                            "{}: path parameter `{placeholder}` must not be empty",
                            self.name
                        )));
                    }
                    rendered.push_str(&percent_encode(value));
                }
                None => rendered.push_str(segment),
            }
        }
        Ok(rendered)
    }
}

const fn endpoint(
    name: &'static str,
    method: Method,
    path: &'static str,
    required_scopes: Option<&'static [Scope]>,
) -> EndpointDescriptor {
    EndpointDescriptor {
        name,
        method,
        path,
        required_scopes,
    }
}

pub const GET_ME: EndpointDescriptor = endpoint("get_me", Method::Get, "/1/me", None);
pub const REFRESH_TOKEN: EndpointDescriptor =
    endpoint("refresh_token", Method::Post, "/oauth2/token", None);

pub const GET_COMMANDS: EndpointDescriptor =
    endpoint("get_commands", Method::Get, "/1/commands", Some(&[Scope::Commands]));
pub const GET_COMMAND_BY_ID: EndpointDescriptor = endpoint(
    "get_command_by_id",
    Method::Get,
    "/1/commands/:id",
    Some(&[Scope::Commands]),
);
pub const ADD_COMMAND: EndpointDescriptor =
    endpoint("add_command", Method::Post, "/1/commands", Some(&[Scope::Commands]));
pub const EDIT_COMMAND: EndpointDescriptor = endpoint(
    "edit_command",
    Method::Put,
    "/1/commands/:id",
    Some(&[Scope::Commands]),
);
pub const DELETE_COMMAND: EndpointDescriptor = endpoint(
    "delete_command",
    Method::Delete,
    "/1/commands/:id",
    Some(&[Scope::Commands]),
);

pub const GET_DEFAULT_COMMANDS: EndpointDescriptor = endpoint(
    "get_default_commands",
    Method::Get,
    "/1/commands/default",
    Some(&[Scope::CommandsDefault]),
);
pub const GET_DEFAULT_COMMAND_BY_NAME: EndpointDescriptor = endpoint(
    "get_default_command_by_name",
    Method::Get,
    "/1/commands/default/:name",
    Some(&[Scope::CommandsDefault]),
);
pub const EDIT_DEFAULT_COMMAND: EndpointDescriptor = endpoint(
    "edit_default_command",
    Method::Put,
    "/1/commands/default/:name",
    Some(&[Scope::CommandsDefault]),
);

pub const GET_CHANNEL: EndpointDescriptor =
    endpoint("get_channel", Method::Get, "/1/channel", Some(&[Scope::Channel]));
pub const JOIN_CHANNEL: EndpointDescriptor =
    endpoint("join_channel", Method::Post, "/1/channel/join", Some(&[Scope::Channel]));
pub const PART_CHANNEL: EndpointDescriptor =
    endpoint("part_channel", Method::Post, "/1/channel/part", Some(&[Scope::Channel]));
pub const SEND_MESSAGE: EndpointDescriptor = endpoint(
    "send_message",
    Method::Post,
    "/1/channel/send",
    Some(&[Scope::ChannelSend]),
);

/// Every registered endpoint.
pub const ALL: &[EndpointDescriptor] = &[
    GET_ME,
    REFRESH_TOKEN,
    GET_COMMANDS,
    GET_COMMAND_BY_ID,
    ADD_COMMAND,
    EDIT_COMMAND,
    DELETE_COMMAND,
    GET_DEFAULT_COMMANDS,
    GET_DEFAULT_COMMAND_BY_NAME,
    EDIT_DEFAULT_COMMAND,
    GET_CHANNEL,
    JOIN_CHANNEL,
    PART_CHANNEL,
    SEND_MESSAGE,
];

/// Find an endpoint by operation name.
pub fn lookup(name: &str) -> Option<&'static EndpointDescriptor> {
    ALL.iter().find(|endpoint| endpoint.name == name)
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub(crate) fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
