use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::TokenError;
use crate::secret::SecretString;

/// Tokens are treated as expired this long before their real expiry.
pub const DEFAULT_EXPIRY_SKEW: Duration = Duration::from_secs(120);

/// Client-credentials settings for the Learn token endpoint.
///
/// `Debug` redacts [`client_secret`](Self::client_secret).
#[derive(Clone)]
pub struct OAuthClientConfig {
    /// Usually `{base}/learn/api/public/v1/oauth2/token`.
    pub token_endpoint: Url,

    /// Application key registered with the Learn developer portal.
    pub client_id: String,

    /// Application secret.
    pub client_secret: SecretString,

    /// JSON file the last token is persisted to. `None` keeps tokens in memory only.
    pub token_file: Option<PathBuf>,

    pub expiry_skew: Duration,

    /// Lifetime assumed when the endpoint omits `expires_in`.
    pub default_ttl: Duration,

    /// Override for the token endpoint's HTTP client.
    /// Defaults to [`RestClientConfig::token_endpoint`](chawk_http::RestClientConfig::token_endpoint).
    pub http_config: Option<chawk_http::RestClientConfig>,
}

impl OAuthClientConfig {
    /// Settings with defaults for everything but the endpoint and credentials.
    pub fn new(
        token_endpoint: Url,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            token_endpoint,
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret),
            token_file: None,
            expiry_skew: DEFAULT_EXPIRY_SKEW,
            default_ttl: Duration::from_secs(3600),
            http_config: None,
        }
    }

    /// # Errors
    /// Returns [`TokenError::ConfigError`] for blank credentials or a token
    /// endpoint that is not http(s).
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.client_id.trim().is_empty() {
            return Err(TokenError::ConfigError(
                "client_id must not be empty".to_owned(),
            ));
        }
        if self.client_secret.is_empty() {
            return Err(TokenError::ConfigError(
                "client_secret must not be empty".to_owned(),
            ));
        }
        if !matches!(self.token_endpoint.scheme(), "http" | "https") {
            return Err(TokenError::ConfigError(format!(
                "token_endpoint must be http(s), got '{}'",
                self.token_endpoint.scheme()
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for OAuthClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClientConfig")
            .field("token_endpoint", &self.token_endpoint.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("token_file", &self.token_file)
            .field("expiry_skew", &self.expiry_skew)
            .field("default_ttl", &self.default_ttl)
            .field("http_config", &self.http_config)
            .finish()
    }
}
