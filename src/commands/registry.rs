use super::Command;
use crate::config::CommandConfig;
use crate::core::error::AssistantError;
use std::collections::HashMap;
use tracing::warn;

/// Trim and lowercase one char at a time (no locale or context rules), the
/// same folding the matcher applies to input. Keys and queries both go through this.
pub fn normalize(s: &str) -> String {
    s.trim().chars().flat_map(char::to_lowercase).collect()
}

/// Case-insensitive name -> target lookup.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: HashMap<String, String>,
}

impl Registry {
    pub fn new<K, V, I>(entries: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (normalize(k.as_ref()), v.into()))
                .collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(&normalize(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRule {
    pub phrase: String,
    pub command: Command,
}

/// Ordered phrase table with an exact-match index.
#[derive(Debug, Clone, Default)]
pub struct PhraseTable {
    rules: Vec<CommandRule>,
    index: HashMap<String, usize>,
}

impl PhraseTable {
    /// A phrase defined twice keeps its first position; the later command wins.
    pub fn insert(&mut self, phrase: &str, command: Command) {
        let phrase = normalize(phrase);
        match self.index.get(&phrase) {
            Some(&pos) => {
                warn!(phrase = %phrase, "phrase defined twice, keeping the later command");
                self.rules[pos].command = command;
            }
            None => {
                self.index.insert(phrase.clone(), self.rules.len());
                self.rules.push(CommandRule { phrase, command });
            }
        }
    }

    pub fn exact(&self, normalized: &str) -> Option<&CommandRule> {
        self.index.get(normalized).map(|&pos| &self.rules[pos])
    }

    /// First rule, in table order, whose phrase occurs inside `normalized`.
    pub fn first_contained(&self, normalized: &str) -> Option<&CommandRule> {
        self.rules
            .iter()
            .find(|rule| normalized.contains(rule.phrase.as_str()))
    }

    pub fn rules(&self) -> &[CommandRule] {
        &self.rules
    }
}

#[derive(Debug, Clone, Default)]
pub struct Triggers {
    pub search: Vec<String>,
    pub play: Vec<String>,
    pub open: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SearchEngines {
    pub default_engine: String,
    default_template: String,
}

impl SearchEngines {
    /// Default engine template followed by the escaped query, spaces as `+`.
    pub fn url_for(&self, query: &str) -> String {
        let escaped = urlencoding::encode(query).replace("%20", "+");
        format!("{}{}", self.default_template, escaped)
    }
}

/// Everything the dispatcher matches against. Immutable once built.
#[derive(Debug, Clone)]
pub struct CommandTables {
    pub apps: Registry,
    pub websites: Registry,
    pub games: Registry,
    pub search: SearchEngines,
    pub phrases: PhraseTable,
    pub triggers: Triggers,
}

fn trigger_list(family: &str, raw: &[String]) -> Result<Vec<String>, AssistantError> {
    raw.iter()
        .map(|t| {
            let t = normalize(t);
            if t.is_empty() {
                Err(AssistantError::Config(format!("empty {} trigger", family)))
            } else {
                Ok(t)
            }
        })
        .collect()
}

impl TryFrom<&CommandConfig> for CommandTables {
    type Error = AssistantError;

    fn try_from(config: &CommandConfig) -> Result<Self, Self::Error> {
        let mut phrases = PhraseTable::default();
        for rule in &config.phrases {
            if rule.phrase.trim().is_empty() {
                return Err(AssistantError::Config("empty phrase in commands.phrases".into()));
            }
            let command = Command::from_rule(rule.command, rule.target.clone()).map_err(|e| {
                AssistantError::Config(format!("phrase \"{}\": {}", rule.phrase, e))
            })?;
            phrases.insert(&rule.phrase, command);
        }

        if let Some((name, id)) = config
            .games
            .iter()
            .find(|(_, id)| id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(AssistantError::Config(format!(
                "game \"{}\" has non-numeric id \"{}\"",
                name, id
            )));
        }

        let engines = Registry::new(&config.search_engines);
        let default_template = engines
            .lookup(&config.default_search_engine)
            .ok_or_else(|| {
                AssistantError::Config(format!(
                    "default search engine \"{}\" is not in commands.search_engines",
                    config.default_search_engine
                ))
            })?
            .to_string();

        Ok(Self {
            apps: Registry::new(&config.apps),
            websites: Registry::new(&config.websites),
            games: Registry::new(&config.games),
            search: SearchEngines {
                default_engine: normalize(&config.default_search_engine),
                default_template,
            },
            phrases,
            triggers: Triggers {
                search: trigger_list("search", &config.triggers.search)?,
                play: trigger_list("play", &config.triggers.play)?,
                open: trigger_list("open", &config.triggers.open)?,
            },
        })
    }
}
