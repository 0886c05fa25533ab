use crate::config::{Provider, ProviderConfig};
use crate::core::error::AssistantError;
use crate::providers::{LLMProvider, openai_style::OpenAIStyleProvider};
use std::collections::HashMap;

type ProviderCreator =
    Box<dyn Fn(&ProviderConfig) -> Result<Box<dyn LLMProvider>, AssistantError> + Send + Sync>;

pub struct ProviderFactory {
    creators: HashMap<Provider, ProviderCreator>,
}

fn openai_style(
    provider: Provider,
    extra_headers: Option<HashMap<String, String>>,
) -> ProviderCreator {
    Box::new(move |config: &ProviderConfig| {
        if provider.api_key_env().is_some() && config.api_key.is_none() {
            return Err(AssistantError::Config(format!(
                "No API key for {:?}; set it in the config or via {}",
                provider,
                provider.api_key_env().unwrap_or_default()
            )));
        }

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| provider.default_base_url().to_string());
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| provider.default_model().to_string());

        Ok(Box::new(OpenAIStyleProvider::new(
            base_url,
            config.api_key.clone(),
            model,
            extra_headers.clone(),
        )) as Box<dyn LLMProvider>)
    })
}

impl ProviderFactory {
    pub fn new() -> Self {
        let mut creators: HashMap<Provider, ProviderCreator> = HashMap::new();

        creators.insert(Provider::OpenAI, openai_style(Provider::OpenAI, None));
        creators.insert(
            Provider::OpenRouter,
            openai_style(
                Provider::OpenRouter,
                Some(HashMap::from([
                    ("HTTP-Referer".to_string(), "https://github.com/deskchat".to_string()),
                    ("X-Title".to_string(), "deskchat".to_string()),
                ])),
            ),
        );
        creators.insert(Provider::DeepSeek, openai_style(Provider::DeepSeek, None));
        creators.insert(Provider::Ollama, openai_style(Provider::Ollama, None));

        Self { creators }
    }

    pub fn create(
        &self,
        provider: &Provider,
        config: &ProviderConfig,
    ) -> Result<Box<dyn LLMProvider>, AssistantError> {
        self.creators
            .get(provider)
            .ok_or_else(|| AssistantError::Config(format!("Provider not found: {:?}", provider)))
            .and_then(|creator| creator(config))
    }
}

impl Default for ProviderFactory {
    fn default() -> Self {
        Self::new()
    }
}
