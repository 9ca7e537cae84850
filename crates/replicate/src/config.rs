/// Default Replicate API origin.
pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com";

/// Connection settings for the Replicate API.
///
/// The token is optional at load time so the server can start without it;
/// every call checks for it before touching the network.
#[derive(Clone)]
pub struct ReplicateConfig {
    /// API origin without a trailing slash, e.g. `https://api.replicate.com`.
    pub base_url: String,
    /// `REPLICATE_API_TOKEN`.
    pub api_token: Option<String>,
}

impl ReplicateConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var               | Default                     |
    /// |-----------------------|-----------------------------|
    /// | `REPLICATE_BASE_URL`  | `https://api.replicate.com` |
    /// | `REPLICATE_API_TOKEN` | none                        |
    pub fn from_env() -> Self {
        let base_url = std::env::var("REPLICATE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let api_token = std::env::var("REPLICATE_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        Self {
            base_url,
            api_token,
        }
    }

    pub fn has_token(&self) -> bool {
        self.api_token.is_some()
    }
}

impl std::fmt::Debug for ReplicateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicateConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
