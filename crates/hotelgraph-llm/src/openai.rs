//! OpenAI adapter implementation.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequest,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::{
    error::CompletionError,
    traits::{Completion, CompletionAdapter, FinishReason, Message, Role, TokenUsage},
};

/// OpenAI adapter for GPT models.
///
/// Defaults match the campaign workflow's generation settings: low
/// temperature, no explicit token ceiling.
pub struct OpenAiCompletions {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl OpenAiCompletions {
    /// Create a new OpenAI adapter.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `model` - Model to use (e.g., "gpt-4o", "gpt-4o-mini")
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: 0.3,
            max_tokens: None,
        }
    }

    /// Set the temperature for generation.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum tokens for generation.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Convert our message format to OpenAI's format.
    fn convert_messages(messages: &[Message]) -> Vec<ChatCompletionRequestMessage> {
        messages
            .iter()
            .map(|msg| match msg.role {
                Role::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage {
                        content: msg.content.clone().into(),
                        ..Default::default()
                    },
                ),
                Role::User => {
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: msg.content.clone().into(),
                        ..Default::default()
                    })
                }
                Role::Assistant => ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessage {
                        content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                            msg.content.clone(),
                        )),
                        ..Default::default()
                    },
                ),
            })
            .collect()
    }
}

#[async_trait]
impl CompletionAdapter for OpenAiCompletions {
    fn provider(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, messages), fields(provider = "openai", model = %self.model))]
    async fn complete(&self, messages: &[Message]) -> Result<Completion, CompletionError> {
        debug!("Requesting completion with {} messages", messages.len());

        let request = CreateChatCompletionRequest {
            model: self.model.clone(),
            messages: Self::convert_messages(messages),
            temperature: Some(self.temperature),
            max_tokens: self.max_tokens,
            ..Default::default()
        };

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| CompletionError::Api(e.to_string()))?;

        let choice = response
            .choices
            .first()
            .ok_or(CompletionError::EmptyResponse)?;

        let content = choice.message.content.clone().unwrap_or_default();

        let usage = response.usage.as_ref();

        Ok(Completion {
            content,
            tokens_used: TokenUsage {
                prompt: usage.map_or(0, |u| u.prompt_tokens),
                completion: usage.map_or(0, |u| u.completion_tokens),
                total: usage.map_or(0, |u| u.total_tokens),
            },
            finish_reason: match choice.finish_reason {
                Some(async_openai::types::FinishReason::Length) => FinishReason::Length,
                _ => FinishReason::Stop,
            },
            model: response.model,
        })
    }

    async fn health_check(&self) -> Result<bool, CompletionError> {
        self.client
            .models()
            .list()
            .await
            .map_err(|e| CompletionError::Connection(e.to_string()))?;
        Ok(true)
    }
}
