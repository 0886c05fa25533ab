pub mod commands;

use crate::core::error::AssistantError;
use crate::i18n::Language;
pub use commands::{CommandConfig, PhraseConfig, TriggerConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    OpenRouter,
    DeepSeek,
    Ollama,
}

impl Provider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Provider::OpenAI),
            "openrouter" => Some(Provider::OpenRouter),
            "deepseek" => Some(Provider::DeepSeek),
            "ollama" => Some(Provider::Ollama),
            _ => None,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
            Provider::DeepSeek => "https://api.deepseek.com/v1",
            Provider::Ollama => "http://localhost:11434/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-4.1-mini",
            Provider::OpenRouter => "google/gemini-2.0-flash-001",
            Provider::DeepSeek => "deepseek-chat",
            Provider::Ollama => "llama3",
        }
    }

    /// Environment variable consulted when the config has no key.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAI => Some("OPENAI_API_KEY"),
            Provider::OpenRouter => Some("OPENROUTER_API_KEY"),
            Provider::DeepSeek => Some("DEEPSEEK_API_KEY"),
            Provider::Ollama => None,
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Provider::Ollama
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, friendly AI assistant. \
You can help with various tasks and answer questions. \
When the user asks to open apps, search, or control their computer, acknowledge their request naturally. \
Be conversational and friendly. You can respond in Ukrainian or English based on the user's language.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub active_provider: Option<Provider>,
    pub language: Language,
    /// Messages kept in the rolling model context.
    pub max_history: usize,
    pub save_history: bool,
    pub system_prompt: String,
    pub providers: HashMap<Provider, ProviderConfig>,
    pub commands: CommandConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_provider: None,
            language: Language::default(),
            max_history: 10,
            save_history: true,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            providers: HashMap::new(),
            commands: CommandConfig::default(),
        }
    }
}

impl Config {
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".deskchat")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn history_path() -> PathBuf {
        Self::config_dir().join("conversations.json")
    }

    pub fn input_history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    /// Load the config, writing defaults when the file does not exist yet.
    pub fn load(path: Option<&Path>) -> Result<Config, AssistantError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config = serde_yml::from_str::<Config>(&contents)
                .map_err(|e| AssistantError::Config(format!("Parse {}: {}", path.display(), e)))?;
            debug!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        let config = Config::default();
        match config.save(&path) {
            Ok(()) => info!(path = %path.display(), "wrote default config"),
            Err(e) => debug!(error = %e, "could not write default config"),
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), AssistantError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    /// Settings for `provider`, with defaults and the API key environment
    /// variable filled in.
    pub fn provider_config(&self, provider: Provider) -> ProviderConfig {
        let mut config = self.providers.get(&provider).cloned().unwrap_or_default();
        if config.api_key.is_none() {
            config.api_key = provider.api_key_env().and_then(|var| env::var(var).ok());
        }
        config
            .base_url
            .get_or_insert_with(|| provider.default_base_url().to_string());
        config
            .model
            .get_or_insert_with(|| provider.default_model().to_string());
        config
    }
}
