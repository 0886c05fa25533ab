//! Side-effecting executors. Every OS failure comes back as a
//! `CommandResult` with `executed == false`; nothing propagates.

use super::registry::CommandTables;
use super::{CommandKind, CommandResult};
use crate::core::error::LaunchError;
use crate::core::platform::Platform;
use crate::i18n::{Language, MessageKey};
use tracing::warn;

pub const STEAM_RUN_URI: &str = "steam://rungameid/";

pub(crate) struct CommandHandler<'a> {
    pub tables: &'a CommandTables,
    pub platform: &'a dyn Platform,
    pub language: Language,
}

impl CommandHandler<'_> {
    fn launch_failed(&self, kind: CommandKind, target: &str, err: &LaunchError) -> CommandResult {
        warn!(?kind, param = target, error = %err, "command failed");
        CommandResult::failure(
            kind,
            self.language.message(
                MessageKey::LaunchFailed,
                &[("target", target), ("error", &err.to_string())],
            ),
        )
    }

    pub fn exit(&self) -> CommandResult {
        let farewell = self.language.message(MessageKey::Goodbye, &[]);
        self.platform.terminate(&farewell);
        CommandResult::success(CommandKind::Exit, farewell)
    }

    pub fn help(&self) -> CommandResult {
        CommandResult::success(CommandKind::Help, self.language.help_text().to_string())
    }

    /// Registered app first; an unregistered name is started as a literal path.
    pub fn open_app(&self, name: &str) -> CommandResult {
        let kind = CommandKind::OpenApp;
        let launched = match self.tables.apps.lookup(name) {
            Some(command_line) => self.platform.launch(command_line),
            None => self.platform.spawn_path(name),
        };

        match launched {
            Ok(()) => CommandResult::success(
                kind,
                self.language.message(MessageKey::AppOpened, &[("app", name)]),
            ),
            Err(LaunchError::NotFound(_)) => CommandResult::failure(
                kind,
                self.language.message(MessageKey::AppNotFound, &[("app", name)]),
            ),
            Err(err) => self.launch_failed(kind, name, &err),
        }
    }

    pub fn open_website(&self, site: &str) -> CommandResult {
        let kind = CommandKind::OpenWebsite;
        let url = website_url(self.tables, site);

        match self.platform.open_url(&url) {
            Ok(()) => CommandResult::success(
                kind,
                self.language.message(MessageKey::WebsiteOpened, &[("site", site)]),
            ),
            Err(err) => self.launch_failed(kind, &url, &err),
        }
    }

    pub fn search(&self, query: &str) -> CommandResult {
        let kind = CommandKind::Search;
        let url = self.tables.search.url_for(query);

        match self.platform.open_url(&url) {
            Ok(()) => CommandResult::success(
                kind,
                self.language.message(MessageKey::Searching, &[("query", query)]),
            ),
            Err(err) => self.launch_failed(kind, &url, &err),
        }
    }

    pub fn launch_game(&self, game: &str) -> CommandResult {
        let kind = CommandKind::SteamGame;
        let Some(app_id) = game_id(self.tables, game) else {
            return CommandResult::failure(
                kind,
                self.language.message(MessageKey::GameNotFound, &[("game", game)]),
            );
        };

        let uri = format!("{}{}", STEAM_RUN_URI, app_id);
        match self.platform.open_url(&uri) {
            Ok(()) => CommandResult::success(
                kind,
                self.language.message(MessageKey::GameLaunched, &[("game", game)]),
            ),
            Err(err) => self.launch_failed(kind, &uri, &err),
        }
    }

    /// Dynamic open: an app if one starts, otherwise a website.
    pub fn open_any(&self, target: &str) -> CommandResult {
        let result = self.open_app(target);
        if result.executed {
            return result;
        }
        self.open_website(target)
    }
}

/// Known site, an explicit http(s) URL, or a best-effort `https://` domain guess.
pub fn website_url(tables: &CommandTables, site: &str) -> String {
    if let Some(url) = tables.websites.lookup(site) {
        return url.to_string();
    }
    let lower = site.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        site.to_string()
    } else {
        format!("https://{}", site)
    }
}

/// Registered game id, or the parameter itself when it is all digits.
pub fn game_id<'a>(tables: &'a CommandTables, game: &'a str) -> Option<&'a str> {
    tables.games.lookup(game).or_else(|| {
        (!game.is_empty() && game.chars().all(|c| c.is_ascii_digit())).then_some(game)
    })
}
