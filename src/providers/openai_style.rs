use super::base_client::HttpClient;
use super::{LLMProvider, Message, ResponseStream};
use crate::core::error::AssistantError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Collect the `delta.content` pieces of complete SSE lines.
pub fn openai_stream_parser(data: &str) -> Result<Option<String>, AssistantError> {
    let mut content = String::new();

    for line in data.lines() {
        let Some(payload) = line.strip_prefix("data:") else {
            continue;
        };
        let payload = payload.trim();
        if payload.is_empty() || payload == "[DONE]" {
            continue;
        }

        let parsed: StreamChunk = serde_json::from_str(payload).map_err(|e| {
            AssistantError::Serialization(format!("Failed to parse stream data: {}", e))
        })?;
        if let Some(text) = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
        {
            content.push_str(&text);
        }
    }

    Ok((!content.is_empty()).then_some(content))
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

/// Any backend speaking the `/chat/completions` protocol.
#[derive(Clone)]
pub struct OpenAIStyleProvider {
    client: HttpClient,
    pub model: String,
}

impl OpenAIStyleProvider {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            client: HttpClient::new(base_url, api_key, extra_headers),
            model,
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIStyleProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, AssistantError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages,
            stream: None,
        };

        let response = self.client.post("chat/completions", &payload).await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&response.text().await?)?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::Api("No choices in API response".to_string()))?
            .message
            .content
            .unwrap_or_default();

        let content = content.trim();
        if content.is_empty() {
            return Err(AssistantError::Api("Empty response from model".to_string()));
        }
        Ok(content.to_string())
    }

    async fn get_response_stream(
        &self,
        messages: &[Message],
    ) -> Result<ResponseStream, AssistantError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages,
            stream: Some(true),
        };

        let response = self.client.post("chat/completions", &payload).await?;
        Ok(self.client.stream_response(response, openai_stream_parser))
    }

    fn set_model(&mut self, model: &str) {
        self.model = model.to_string();
    }
}
