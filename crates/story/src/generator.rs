//! Story generation adapter.
//!
//! ## Tech stack
//! - `async-openai` for the chat-completion call
//! - any OpenAI-compatible endpoint (OpenAI, Azure inference, GitHub Models)

use std::time::Duration;

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
};
use async_openai::Client;
use backoff::ExponentialBackoffBuilder;
use comicgen_core::story::Story;
use tracing::{debug, info, warn};

use crate::config::StoryConfig;
use crate::template::system_prompt;

/// Errors from the story generation step.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    /// No API key is configured.
    #[error("Text-generation API key is not configured (set OPENAI_API_KEY)")]
    MissingCredential,

    /// The user prompt was blank.
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    /// The model replied with something other than `{"comics": [...]}`.
    #[error("Malformed story response: {0}")]
    MalformedResponse(String),

    /// The API call failed.
    #[error("Text-generation API call failed: {0}")]
    Upstream(#[from] OpenAIError),
}

/// Turns a user idea into a [`Story`].
///
/// One request per call. The client's built-in retry is disabled.
pub struct StoryGenerator {
    client: Option<Client<OpenAIConfig>>,
    model: String,
    system_prompt: String,
}

impl StoryGenerator {
    pub fn new(config: &StoryConfig) -> Self {
        let client = config.api_key.as_ref().map(|key| {
            let openai_config = OpenAIConfig::new()
                .with_api_key(key)
                .with_api_base(&config.base_url);
            // Built-in retry of 5xx and 429 responses is switched off.
            Client::with_config(openai_config).with_backoff(
                ExponentialBackoffBuilder::new()
                    .with_max_elapsed_time(Some(Duration::ZERO))
                    .build(),
            )
        });

        if client.is_none() {
            warn!("No text-generation API key configured; story requests will fail");
        }

        Self {
            client,
            model: config.model.clone(),
            system_prompt: system_prompt(),
        }
    }

    /// Generate a story for `user_prompt`.
    pub async fn generate_story(&self, user_prompt: &str) -> Result<Story, StoryError> {
        let client = self.client.as_ref().ok_or(StoryError::MissingCredential)?;

        let user_prompt = user_prompt.trim();
        if user_prompt.is_empty() {
            return Err(StoryError::EmptyPrompt);
        }

        debug!(model = %self.model, prompt_len = user_prompt.len(), "Requesting story");

        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(self.system_prompt.as_str())
                    .build()?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .build()?;

        let response = client.chat().create(request).await.map_err(|e| {
            warn!(error = %e, "Story request failed");
            StoryError::Upstream(e)
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| StoryError::MalformedResponse("empty reply".into()))?;

        let story = parse_story(content)?;

        let violations = story.template_violations();
        if !violations.is_empty() {
            let summary: Vec<String> = violations.iter().map(ToString::to_string).collect();
            warn!(violations = ?summary, "Story deviates from the panel template");
        }

        info!(panels = story.len(), "Story generated");
        Ok(story)
    }
}

/// Parse a model reply into a [`Story`].
pub fn parse_story(content: &str) -> Result<Story, StoryError> {
    serde_json::from_str(content.trim()).map_err(|e| StoryError::MalformedResponse(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
