//! Client configuration: base URL and credentials.

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

pub const ENV_BASE_URL: &str = "CF_API_BASE_URL";
pub const ENV_API_TOKEN: &str = "CF_API_TOKEN";
pub const ENV_API_KEY: &str = "CF_API_KEY";
pub const ENV_API_EMAIL: &str = "CF_API_EMAIL";

/// How requests authenticate against the API.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication headers. Useful against the mock server.
    #[default]
    None,
    /// Legacy global API key, sent as `X-Auth-Key` + `X-Auth-Email`.
    ApiKey { key: String, email: String },
    /// Scoped API token, sent as `Authorization: Bearer`.
    Token(String),
}

impl Credentials {
    pub fn headers(&self) -> Vec<(String, String)> {
        match self {
            Credentials::None => Vec::new(),
            Credentials::ApiKey { key, email } => vec![
                ("X-Auth-Key".to_string(), key.clone()),
                ("X-Auth-Email".to_string(), email.clone()),
            ],
            Credentials::Token(token) => {
                vec![("Authorization".to_string(), format!("Bearer {token}"))]
            }
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::None => write!(f, "None"),
            Credentials::ApiKey { email, .. } => f
                .debug_struct("ApiKey")
                .field("key", &"<redacted>")
                .field("email", email)
                .finish(),
            Credentials::Token(_) => write!(f, "Token(<redacted>)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    credentials: Credentials,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: Credentials::None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build a config from `CF_API_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// A token wins over a key/email pair when both are set. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let base_url = var(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let credentials = match (var(ENV_API_TOKEN), var(ENV_API_KEY), var(ENV_API_EMAIL)) {
            (Some(token), _, _) => Credentials::Token(token),
            (None, Some(key), Some(email)) => Credentials::ApiKey { key, email },
            (None, Some(_), None) => {
                return Err(ApiError::Config(format!(
                    "{ENV_API_KEY} is set but {ENV_API_EMAIL} is missing"
                )))
            }
            (None, None, Some(_)) => {
                return Err(ApiError::Config(format!(
                    "{ENV_API_EMAIL} is set but {ENV_API_KEY} is missing"
                )))
            }
            (None, None, None) => Credentials::None,
        };

        Ok(Self::new(&base_url).with_credentials(credentials))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
