use comicgen_replicate::ReplicateConfig;
use comicgen_story::StoryConfig;

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held a value of the wrong type.
    #[error("{name} must be a valid {expected}, got '{value}'")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    /// A configured CORS origin is not a valid header value.
    #[error("Invalid CORS origin '{0}'")]
    InvalidOrigin(String),

    /// `HOST` is not an IP address.
    #[error("Invalid HOST address '{0}'")]
    InvalidHost(String),
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Credentials for
/// the upstream services live in the nested [`StoryConfig`] and
/// [`ReplicateConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Comic creation
    /// waits on the language model and three job submissions.
    pub request_timeout_secs: u64,
    /// Chat-completion endpoint used to write stories.
    pub story: StoryConfig,
    /// Image generation endpoint.
    pub replicate: ReplicateConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                   |
    ///
    /// See [`StoryConfig::from_env`] and [`ReplicateConfig::from_env`] for
    /// the upstream settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|name| std::env::var(name).ok())?;
        config.story = StoryConfig::from_env();
        config.replicate = ReplicateConfig::from_env();
        Ok(config)
    }

    /// Parse the server settings from an arbitrary variable source. Upstream
    /// settings are left at their defaults without credentials.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port = parse_var(&lookup, "PORT", "u16", 3000u16)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_var(&lookup, "REQUEST_TIMEOUT_SECS", "u64", 120u64)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            story: StoryConfig {
                base_url: comicgen_story::config::DEFAULT_BASE_URL.to_string(),
                model: comicgen_story::config::DEFAULT_MODEL.to_string(),
                api_key: None,
            },
            replicate: ReplicateConfig {
                base_url: comicgen_replicate::config::DEFAULT_BASE_URL.to_string(),
                api_token: None,
            },
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<std::net::SocketAddr, ConfigError> {
        let ip: std::net::IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?;
        Ok(std::net::SocketAddr::new(ip, self.port))
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name,
            expected,
            value,
        }),
    }
}
