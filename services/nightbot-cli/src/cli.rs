//! Command-line parsing

use anyhow::{Result, bail};
use nightbot_auth::Scope;

pub const USAGE: &str = "\
usage: nightbot [--config <path>] <command> [args]

commands:
  authorize-url [scope...]        print the consent URL (default: all scopes)
  exchange <code>                 trade an authorization code for tokens
  refresh                         force a token refresh
  commands                        list custom commands
  command <id>                    show one custom command
  add-command <name> <message>    add a custom command
  delete-command <id>             delete a custom command
  default-commands                list default commands
  default-command <name>          show one default command
  channel                         show the channel
  join                            join Nightbot to the channel
  part                            remove Nightbot from the channel
  send <message> [chat-id]        send a chat message";

/// Top-level command. Only `Api` commands read the stored token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AuthorizeUrl { scopes: Vec<Scope> },
    Exchange { code: String },
    Api(ApiCommand),
}

/// Commands that run through an authenticated `Client`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCommand {
    Refresh,
    Commands,
    Command { id: String },
    AddCommand { name: String, message: String },
    DeleteCommand { id: String },
    DefaultCommands,
    DefaultCommand { name: String },
    Channel,
    Join,
    Part,
    Send { message: String, chat_id: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub config: Option<String>,
    pub command: Command,
}

/// Parse arguments (without the program name).
pub fn parse(args: &[String]) -> Result<Args> {
    let mut config = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            match iter.next() {
                Some(path) => config = Some(path.clone()),
                None => bail!("--config requires a path"),
            }
        } else {
            rest.push(arg.as_str());
        }
    }

    let Some((name, operands)) = rest.split_first() else {
        bail!("no command given\n\n{USAGE}");
    };

    let command = match (*name, operands) {
        ("authorize-url", scopes) => Command::AuthorizeUrl {
            scopes: parse_scopes(scopes)?,
        },
        ("exchange", [code]) => Command::Exchange {
            code: code.to_string(),
        },
        (name, operands) => Command::Api(parse_api(name, operands)?),
    };

    Ok(Args { config, command })
}

fn parse_api(name: &str, operands: &[&str]) -> Result<ApiCommand> {
    let command = match (name, operands) {
        ("refresh", []) => ApiCommand::Refresh,
        ("commands", []) => ApiCommand::Commands,
        ("command", [id]) => ApiCommand::Command { id: id.to_string() },
        ("add-command", [name, message]) => ApiCommand::AddCommand {
            name: name.to_string(),
            message: message.to_string(),
        },
        ("delete-command", [id]) => ApiCommand::DeleteCommand { id: id.to_string() },
        ("default-commands", []) => ApiCommand::DefaultCommands,
        ("default-command", [name]) => ApiCommand::DefaultCommand {
            name: name.to_string(),
        },
        ("channel", []) => ApiCommand::Channel,
        ("join", []) => ApiCommand::Join,
        ("part", []) => ApiCommand::Part,
        ("send", [message]) => ApiCommand::Send {
            message: message.to_string(),
            chat_id: None,
        },
        ("send", [message, chat_id]) => ApiCommand::Send {
            message: message.to_string(),
            chat_id: Some(chat_id.to_string()),
        },
        (name, _) => bail!("invalid arguments for `{name}`\n\n{USAGE}"),
    };
    Ok(command)
}

fn parse_scopes(names: &[&str]) -> Result<Vec<Scope>> {
    if names.is_empty() {
        return Ok(Scope::ALL.to_vec());
    }
    names
        .iter()
        .map(|name| name.parse::<Scope>().map_err(anyhow::Error::from))
        .collect()
}
