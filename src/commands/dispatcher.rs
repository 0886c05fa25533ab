use super::handler::CommandHandler;
use super::matcher::{self, SLASH_COMMANDS};
use super::registry::CommandTables;
use super::{Command, CommandKind, CommandResult, Resolution};
use crate::config::CommandConfig;
use crate::core::error::AssistantError;
use crate::core::platform::Platform;
use crate::i18n::{Language, MessageKey};
use std::sync::Arc;
use tracing::debug;

/// Classifies raw input as a command or chat and runs the command.
///
/// Read-only after construction; clones share the same tables.
#[derive(Clone)]
pub struct CommandDispatcher {
    tables: Arc<CommandTables>,
    platform: Arc<dyn Platform>,
    language: Language,
}

impl CommandDispatcher {
    pub fn new(tables: CommandTables, language: Language, platform: Arc<dyn Platform>) -> Self {
        debug!(
            apps = tables.apps.len(),
            websites = tables.websites.len(),
            games = tables.games.len(),
            phrases = tables.phrases.rules().len(),
            search_engine = %tables.search.default_engine,
            "command tables ready"
        );
        Self {
            tables: Arc::new(tables),
            platform,
            language,
        }
    }

    pub fn from_config(
        config: &CommandConfig,
        language: Language,
        platform: Arc<dyn Platform>,
    ) -> Result<Self, AssistantError> {
        Ok(Self::new(CommandTables::try_from(config)?, language, platform))
    }

    /// Match without running anything.
    pub fn resolve(&self, input: &str) -> Resolution {
        matcher::resolve(&self.tables, input)
    }

    /// Entry point for every user turn. Never fails.
    pub fn process(&self, input: &str) -> CommandResult {
        match self.resolve(input) {
            Resolution::Command(command) => self.execute(&command),
            Resolution::Unrecognized => CommandResult::failure(
                CommandKind::Unknown,
                self.language.message(MessageKey::CommandNotRecognized, &[]),
            ),
            Resolution::Chat => CommandResult::chat(),
        }
    }

    pub fn execute(&self, command: &Command) -> CommandResult {
        let handler = CommandHandler {
            tables: &self.tables,
            platform: self.platform.as_ref(),
            language: self.language,
        };
        debug!(kind = ?command.kind(), "executing");

        match command {
            Command::Exit => handler.exit(),
            Command::Help => handler.help(),
            Command::OpenApp(name) => handler.open_app(name),
            Command::OpenWebsite(site) => handler.open_website(site),
            Command::Search(query) => handler.search(query),
            Command::SteamGame(game) => handler.launch_game(game),
            Command::Open(target) => handler.open_any(target),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn get_command_names(&self) -> Vec<String> {
        SLASH_COMMANDS.iter().map(|c| c.to_string()).collect()
    }
}
