use std::io;
use thiserror::Error;

/// Unified error type for the assistant host
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Model backend errors (OpenAI, Ollama, etc.)
    #[error("API error: {0}")]
    Api(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),

    /// Conversation store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unknown or unexpected errors
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Failure of an OS side effect (spawning a process, opening a URL).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Os(String),
}

impl From<io::Error> for LaunchError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            LaunchError::NotFound(err.to_string())
        } else {
            LaunchError::Os(err.to_string())
        }
    }
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AssistantError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            AssistantError::Network(format!("Connection failed: {}", err))
        } else if err.is_status() {
            AssistantError::Api(format!("API returned error status: {}", err))
        } else {
            AssistantError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(err: serde_json::Error) -> Self {
        AssistantError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for AssistantError {
    fn from(err: serde_yml::Error) -> Self {
        AssistantError::Serialization(format!("YAML error: {}", err))
    }
}

impl From<rustyline::error::ReadlineError> for AssistantError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        AssistantError::Input(format!("Line editor error: {}", err))
    }
}

impl From<String> for AssistantError {
    fn from(err: String) -> Self {
        AssistantError::Unknown(err)
    }
}

impl From<&str> for AssistantError {
    fn from(err: &str) -> Self {
        AssistantError::Unknown(err.to_string())
    }
}
