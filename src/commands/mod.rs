pub mod dispatcher;
pub mod handler;
pub mod matcher;
pub mod registry;

use serde::{Deserialize, Serialize};

pub use dispatcher::CommandDispatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Exit,
    OpenApp,
    OpenWebsite,
    Search,
    SteamGame,
    Help,
    Unknown,
    Chat,
}

/// A resolved command with its extracted parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    OpenApp(String),
    OpenWebsite(String),
    Search(String),
    SteamGame(String),
    /// Dynamic open: tried as an application first, then as a website.
    Open(String),
}

impl Command {
    /// Build a command from a configured `(kind, target)` pair.
    pub fn from_rule(kind: CommandKind, target: Option<String>) -> Result<Self, String> {
        let target = target.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        match (kind, target) {
            (CommandKind::Exit, _) => Ok(Command::Exit),
            (CommandKind::Help, _) => Ok(Command::Help),
            (CommandKind::OpenApp, Some(t)) => Ok(Command::OpenApp(t)),
            (CommandKind::OpenWebsite, Some(t)) => Ok(Command::OpenWebsite(t)),
            (CommandKind::Search, Some(t)) => Ok(Command::Search(t)),
            (CommandKind::SteamGame, Some(t)) => Ok(Command::SteamGame(t)),
            (CommandKind::Unknown | CommandKind::Chat, _) => {
                Err(format!("{:?} cannot be bound to a phrase", kind))
            }
            (kind, None) => Err(format!("{:?} requires a target", kind)),
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Exit => CommandKind::Exit,
            Command::Help => CommandKind::Help,
            Command::OpenApp(_) | Command::Open(_) => CommandKind::OpenApp,
            Command::OpenWebsite(_) => CommandKind::OpenWebsite,
            Command::Search(_) => CommandKind::Search,
            Command::SteamGame(_) => CommandKind::SteamGame,
        }
    }
}

/// Outcome of matching, before any side effect runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Command(Command),
    /// Slash-prefixed input with no known verb.
    Unrecognized,
    /// Not a command: forward to the model.
    Chat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub executed: bool,
    pub response: Option<String>,
    pub kind: CommandKind,
}

impl CommandResult {
    pub fn success(kind: CommandKind, response: String) -> Self {
        Self {
            executed: true,
            response: Some(response),
            kind,
        }
    }

    pub fn failure(kind: CommandKind, response: String) -> Self {
        Self {
            executed: false,
            response: Some(response),
            kind,
        }
    }

    pub fn chat() -> Self {
        Self {
            executed: false,
            response: None,
            kind: CommandKind::Chat,
        }
    }

    /// The caller should hand the input to the model.
    pub fn is_chat(&self) -> bool {
        self.kind == CommandKind::Chat
    }
}
