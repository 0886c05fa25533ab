//! Pure intent matching: raw text in, `Resolution` out, no side effects.
//!
//! Stages run in priority order and the first hit wins:
//! slash command, exact phrase, phrase substring, dynamic triggers.

use super::registry::{CommandTables, Triggers};
use super::{Command, Resolution};
use tracing::debug;

pub const COMMAND_PREFIX: char = '/';

/// Slash verbs, for completion and help.
pub const SLASH_COMMANDS: &[&str] = &["open", "steam", "search", "site", "help", "exit", "quit"];

/// Trimmed input plus its lowercase form, with offsets mapped between them.
struct NormalizedInput<'a> {
    original: &'a str,
    normalized: String,
    /// `(normalized_offset, original_offset)` at every original char boundary.
    boundaries: Vec<(usize, usize)>,
}

impl<'a> NormalizedInput<'a> {
    fn new(raw: &'a str) -> Self {
        let original = raw.trim();
        let mut normalized = String::with_capacity(original.len());
        let mut boundaries = Vec::with_capacity(original.len() + 1);

        for (offset, ch) in original.char_indices() {
            boundaries.push((normalized.len(), offset));
            normalized.extend(ch.to_lowercase());
        }
        boundaries.push((normalized.len(), original.len()));

        Self {
            original,
            normalized,
            boundaries,
        }
    }

    /// Original-case text after the given offset into `normalized`, trimmed.
    fn original_after(&self, normalized_end: usize) -> &'a str {
        let start = self
            .boundaries
            .iter()
            .find(|(norm, _)| *norm >= normalized_end)
            .map(|(_, orig)| *orig)
            .unwrap_or(self.original.len());
        self.original[start..].trim()
    }

    /// Parameter following the first occurrence of `trigger`, if non-empty.
    fn param_after(&self, trigger: &str) -> Option<&'a str> {
        let idx = self.normalized.find(trigger)?;
        Some(self.original_after(idx + trigger.len())).filter(|p| !p.is_empty())
    }

    /// Like `param_after`, but `trigger` must open the input and be followed by a space.
    fn param_after_prefix(&self, trigger: &str) -> Option<&'a str> {
        let rest = self.normalized.strip_prefix(trigger)?;
        if !rest.starts_with(' ') {
            return None;
        }
        Some(self.original_after(trigger.len())).filter(|p| !p.is_empty())
    }
}

pub fn resolve(tables: &CommandTables, raw: &str) -> Resolution {
    let input = NormalizedInput::new(raw);

    if input.original.starts_with(COMMAND_PREFIX) {
        return parse_slash(input.original);
    }

    if let Some(rule) = tables.phrases.exact(&input.normalized) {
        debug!(stage = "exact", phrase = %rule.phrase, "matched");
        return Resolution::Command(rule.command.clone());
    }

    if let Some(rule) = tables.phrases.first_contained(&input.normalized) {
        debug!(stage = "substring", phrase = %rule.phrase, "matched");
        return Resolution::Command(rule.command.clone());
    }

    if let Some(command) = match_triggers(&tables.triggers, &input) {
        return Resolution::Command(command);
    }

    Resolution::Chat
}

fn parse_slash(original: &str) -> Resolution {
    let body = &original[COMMAND_PREFIX.len_utf8()..];
    let (verb, arg) = match body.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (body, ""),
    };
    let arg = (!arg.is_empty()).then(|| arg.to_string());

    let command = match (verb.to_lowercase().as_str(), arg) {
        ("exit" | "quit", None) => Command::Exit,
        ("help", None) => Command::Help,
        ("open", Some(target)) => Command::OpenApp(target),
        ("steam", Some(game)) => Command::SteamGame(game),
        ("search", Some(query)) => Command::Search(query),
        ("site", Some(site)) => Command::OpenWebsite(site),
        _ => {
            debug!(stage = "slash", verb, "unrecognized command");
            return Resolution::Unrecognized;
        }
    };
    debug!(stage = "slash", verb, "matched");
    Resolution::Command(command)
}

fn match_triggers(triggers: &Triggers, input: &NormalizedInput<'_>) -> Option<Command> {
    let families: [(&str, &[String], fn(String) -> Command); 2] = [
        ("search", &triggers.search, Command::Search),
        ("play", &triggers.play, Command::SteamGame),
    ];
    for (family, list, build) in families {
        for trigger in list {
            if let Some(param) = input.param_after(trigger) {
                debug!(stage = "trigger", family, trigger = %trigger, "matched");
                return Some(build(param.to_string()));
            }
        }
    }

    triggers.open.iter().find_map(|trigger| {
        input.param_after_prefix(trigger).map(|target| {
            debug!(stage = "trigger", family = "open", trigger = %trigger, "matched");
            Command::Open(target.to_string())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandKind;
    use crate::config::{CommandConfig, PhraseConfig};

    fn default_tables() -> CommandTables {
        CommandTables::try_from(&CommandConfig::default()).unwrap()
    }

    fn command(tables: &CommandTables, input: &str) -> Command {
        match resolve(tables, input) {
            Resolution::Command(c) => c,
            other => panic!("{:?} resolved to {:?}", input, other),
        }
    }

    #[test]
    fn every_phrase_matches_exactly_in_any_case() {
        let tables = default_tables();
        for rule in tables.phrases.rules() {
            assert_eq!(command(&tables, &rule.phrase.to_uppercase()), rule.command);
            assert_eq!(command(&tables, &format!("  {}  ", rule.phrase)), rule.command);
        }
    }

    #[test]
    fn phrase_ending_in_capital_sigma_matches_in_any_case() {
        let mut config = CommandConfig::default();
        config.phrases = vec![PhraseConfig {
            phrase: "ΟΔΟΣ".into(),
            command: CommandKind::Exit,
            target: None,
        }];
        let tables = CommandTables::try_from(&config).unwrap();

        for input in ["ΟΔΟΣ", "Οδοσ", "οδοσ", "πάμε ΟΔΟΣ τώρα"] {
            assert_eq!(command(&tables, input), Command::Exit, "{}", input);
        }
    }

    #[test]
    fn wrapped_phrase_resolves_to_first_rule_in_table_order() {
        let tables = default_tables();
        for rule in tables.phrases.rules() {
            let input = format!("xyz {} abc", rule.phrase);
            let expected = tables
                .phrases
                .rules()
                .iter()
                .find(|r| input.contains(r.phrase.as_str()))
                .unwrap();
            assert_eq!(command(&tables, &input), expected.command, "{}", input);
        }
        assert_eq!(
            command(&tables, "xyz відкрий стім abc"),
            Command::OpenApp("steam".into())
        );
    }

    #[test]
    fn generic_phrases_shadow_later_ones() {
        // Known mismatches, kept as-is: "пока" sits inside "покажи", "quit" inside "quite".
        let tables = default_tables();
        assert_eq!(command(&tables, "покажи мені погоду"), Command::Exit);
        assert_eq!(command(&tables, "I'm quite sure"), Command::Exit);

        let mut config = CommandConfig::default();
        config.phrases = vec![
            PhraseConfig {
                phrase: "запусти".into(),
                command: CommandKind::OpenApp,
                target: Some("steam".into()),
            },
            PhraseConfig {
                phrase: "запусти дискорд".into(),
                command: CommandKind::OpenApp,
                target: Some("discord".into()),
            },
        ];
        let tables = CommandTables::try_from(&config).unwrap();
        assert_eq!(
            command(&tables, "ну запусти дискорд будь ласка"),
            Command::OpenApp("steam".into())
        );
        assert_eq!(
            command(&tables, "запусти дискорд"),
            Command::OpenApp("discord".into())
        );
    }

    #[test]
    fn slash_commands_parse_without_phrase_tables() {
        let mut config = CommandConfig::default();
        config.phrases.clear();
        config.triggers.search.clear();
        config.triggers.play.clear();
        config.triggers.open.clear();
        let tables = CommandTables::try_from(&config).unwrap();

        assert_eq!(command(&tables, "/open notepad"), Command::OpenApp("notepad".into()));
        assert_eq!(command(&tables, "/steam  cs2 "), Command::SteamGame("cs2".into()));
        assert_eq!(
            command(&tables, "/search Rust Traits"),
            Command::Search("Rust Traits".into())
        );
        assert_eq!(command(&tables, "/site github"), Command::OpenWebsite("github".into()));
        assert_eq!(command(&tables, "/help"), Command::Help);
        assert_eq!(command(&tables, "/EXIT"), Command::Exit);
        assert_eq!(command(&tables, "/quit"), Command::Exit);
    }

    #[test]
    fn malformed_slash_commands_are_unrecognized() {
        let tables = default_tables();
        for input in ["/", "/foo", "/open", "/open   ", "/exit now", "/help me", "/opennotepad"] {
            assert_eq!(resolve(&tables, input), Resolution::Unrecognized, "{}", input);
        }
    }

    #[test]
    fn search_trigger_keeps_original_case() {
        let tables = default_tables();
        assert_eq!(command(&tables, "знайди котиків"), Command::Search("котиків".into()));
        assert_eq!(command(&tables, "Знайди Котиків"), Command::Search("Котиків".into()));
        assert_eq!(
            command(&tables, "можеш знайти рецепт борщу"),
            Command::Search("рецепт борщу".into())
        );
    }

    #[test]
    fn offsets_survive_length_changing_lowercase() {
        let tables = default_tables();
        // 'İ' grows and 'ẞ' shrinks when lowercased.
        assert_eq!(
            command(&tables, "İ знайди Котиків"),
            Command::Search("Котиків".into())
        );
        assert_eq!(
            command(&tables, "ẞẞ search Straße"),
            Command::Search("Straße".into())
        );
    }

    #[test]
    fn empty_remainder_moves_to_next_trigger() {
        let tables = default_tables();
        // "search" has nothing after it, so the play family gets a chance.
        assert_eq!(resolve(&tables, "search"), Resolution::Chat);
        assert_eq!(
            command(&tables, "пограй в Dota 2"),
            Command::SteamGame("Dota 2".into())
        );
        assert_eq!(
            command(&tables, "запусти гру cs2"),
            Command::SteamGame("cs2".into())
        );
    }

    #[test]
    fn open_trigger_must_be_a_prefix() {
        let tables = default_tables();
        assert_eq!(
            command(&tables, "Відкрий Example.com"),
            Command::Open("Example.com".into())
        );
        assert_eq!(resolve(&tables, "я хочу відкрий example.com"), Resolution::Chat);
        assert_eq!(resolve(&tables, "відкрий"), Resolution::Chat);
        assert_eq!(resolve(&tables, "openexample.com"), Resolution::Chat);
    }

    #[test]
    fn free_text_falls_back_to_chat() {
        let tables = default_tables();
        for input in ["tell me a joke", "", "   ", "як справи?"] {
            assert_eq!(resolve(&tables, input), Resolution::Chat, "{:?}", input);
        }
    }
}
