/// Default chat-completion endpoint (GitHub Models on Azure inference).
pub const DEFAULT_BASE_URL: &str = "https://models.inference.ai.azure.com";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Connection settings for the text-generation API.
#[derive(Clone)]
pub struct StoryConfig {
    /// API base URL; requests go to `{base_url}/chat/completions`.
    pub base_url: String,
    /// Chat model identifier.
    pub model: String,
    /// Bearer credential. Checked at call time.
    pub api_key: Option<String>,
}

impl StoryConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var           | Default                                 |
    /// |-------------------|-----------------------------------------|
    /// | `OPENAI_BASE_URL` | `https://models.inference.ai.azure.com` |
    /// | `STORY_MODEL`     | `gpt-4o`                                |
    /// | `OPENAI_API_KEY`  | falls back to `GITHUB_API_KEY`, else none |
    pub fn from_env() -> Self {
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let model = std::env::var("STORY_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let api_key = ["OPENAI_API_KEY", "GITHUB_API_KEY"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty());

        Self {
            base_url,
            model,
            api_key,
        }
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for StoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
