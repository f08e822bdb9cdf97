use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chawk_http::{RestClientConfig, TlsRootConfig, TransportSecurity};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ClientError;

const REDACTED: &str = "[REDACTED]";

/// Connection settings for a Learn server.
///
/// `Debug` redacts `client_secret`; use [`redacted`](Self::redacted) before
/// serializing for display.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChawkConfig {
    /// Server root, e.g. `https://learn.example.edu`
    pub base_url: String,
    /// REST application key
    pub client_id: String,
    /// REST application secret
    pub client_secret: String,
    /// Where the access token is cached between runs
    pub token_file: Option<PathBuf>,
    pub http: HttpSettings,
}

impl fmt::Debug for ChawkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChawkConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .field("token_file", &self.token_file)
            .field("http", &self.http)
            .finish()
    }
}

impl ChawkConfig {
    /// Parsed [`base_url`](Self::base_url).
    ///
    /// # Errors
    /// [`ClientError::Config`] when the URL is malformed or not http(s).
    pub fn base_url(&self) -> Result<Url, ClientError> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|e| ClientError::config(format!("base_url '{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::config(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(url)
    }

    /// # Errors
    /// [`ClientError::Config`] for blank credentials or an unusable base URL.
    pub fn validate(&self) -> Result<(), ClientError> {
        self.base_url()?;
        if self.client_id.trim().is_empty() {
            return Err(ClientError::config("client_id must not be empty"));
        }
        if self.client_secret.is_empty() {
            return Err(ClientError::config("client_secret must not be empty"));
        }
        Ok(())
    }

    /// Copy with the secret masked, for printing.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.client_secret.is_empty() {
            REDACTED.clone_into(&mut copy.client_secret);
        }
        copy
    }

    /// HTTP client settings for API calls.
    #[must_use]
    pub fn rest_config(&self) -> RestClientConfig {
        self.http.apply(RestClientConfig::default())
    }

    /// HTTP client settings for the token endpoint.
    #[must_use]
    pub fn token_rest_config(&self) -> RestClientConfig {
        let base = RestClientConfig::token_endpoint();
        let limit = base.request_timeout;
        let mut config = self.http.apply(base);
        config.request_timeout = limit.min(self.http.request_timeout);
        config
    }
}

/// HTTP engine knobs exposed in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout, humantime syntax (`"10s"`, `"1m 30s"`)
    #[serde(with = "humantime_duration")]
    pub request_timeout: Duration,
    pub user_agent: Option<String>,
    /// Accept `http://` base URLs (local mock servers)
    pub allow_insecure_http: bool,
    /// Trust the operating-system certificate store instead of bundled roots
    pub native_roots: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            user_agent: None,
            allow_insecure_http: false,
            native_roots: false,
        }
    }
}

impl HttpSettings {
    fn apply(&self, mut config: RestClientConfig) -> RestClientConfig {
        config.request_timeout = self.request_timeout;
        if let Some(agent) = &self.user_agent {
            config.user_agent.clone_from(agent);
        }
        if self.allow_insecure_http {
            config.transport = TransportSecurity::AllowInsecureHttp;
        }
        if self.native_roots {
            config.tls_roots = TlsRootConfig::Native;
        }
        config
    }
}

mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(raw.trim()).map_err(de::Error::custom)
    }
}
