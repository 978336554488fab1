/// Environment variable naming the coordination service base URL.
pub const API_DOMAIN_VAR: &str = "PARTFLOW_API_DOMAIN";

/// Environment variable optionally supplying the credential token.
pub const TOKEN_VAR: &str = "PARTFLOW_TOKEN";

/// Client configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{API_DOMAIN_VAR} is not set")]
    MissingApiDomain,
}

/// Client configuration sourced from the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Coordination service base URL, without a trailing slash.
    pub base_url: String,
    /// Credential token; `None` is unauthenticated mode.
    pub token: Option<String>,
}

impl ClientConfig {
    /// Reads the configuration from `PARTFLOW_API_DOMAIN` and
    /// `PARTFLOW_TOKEN`. An empty token counts as absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var(API_DOMAIN_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingApiDomain)?;
        let token = std::env::var(TOKEN_VAR).ok().filter(|t| !t.is_empty());
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }
}
