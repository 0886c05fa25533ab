use crate::core::error::AssistantError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

pub type ResponseStream = BoxStream<'static, Result<String, AssistantError>>;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn get_response(&self, messages: &[Message]) -> Result<String, AssistantError>;

    async fn get_response_stream(
        &self,
        messages: &[Message],
    ) -> Result<ResponseStream, AssistantError>;

    fn set_model(&mut self, model: &str);
}

pub mod base_client;
pub mod factory;
pub mod openai_style;
