use std::time::Duration;

/// Default `User-Agent` sent to the Learn server.
pub const DEFAULT_USER_AGENT: &str = concat!("chawk/", env!("CARGO_PKG_VERSION"));

/// Upper bound on the body excerpt kept in [`RestError::Status`](crate::RestError::Status).
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// Where the TLS trust anchors come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TlsRootConfig {
    /// Mozilla roots bundled through webpki-roots
    #[default]
    WebPki,
    /// Operating-system certificate store
    Native,
}

/// Whether plain `http://` URLs are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    /// `https://` only
    #[default]
    TlsOnly,
    /// Accept `http://` as well. Meant for mock servers in tests.
    AllowInsecureHttp,
}

/// Settings for [`RestClient`](crate::RestClient).
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Per-request timeout (default: 10 seconds)
    pub request_timeout: Duration,

    /// Maximum decompressed response body size in bytes (default: 10 MB)
    pub max_body_size: usize,

    /// `User-Agent` header value
    pub user_agent: String,

    /// Transport security mode (default: `TlsOnly`)
    pub transport: TransportSecurity,

    /// TLS root strategy (default: `WebPki`)
    pub tls_roots: TlsRootConfig,

    /// Requests that may wait in the buffer before `Overloaded` is returned
    pub buffer_capacity: usize,

    /// Idle pooled connections are closed after this long (`None` keeps hyper's default)
    pub pool_idle_timeout: Option<Duration>,

    /// Idle connections kept per host
    pub pool_max_idle_per_host: usize,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_body_size: 10 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            transport: TransportSecurity::TlsOnly,
            tls_roots: TlsRootConfig::WebPki,
            buffer_capacity: 256,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 8,
        }
    }
}

impl RestClientConfig {
    /// Settings for the OAuth token endpoint: short timeout, small bodies.
    #[must_use]
    pub fn token_endpoint() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            max_body_size: 64 * 1024,
            buffer_capacity: 16,
            pool_max_idle_per_host: 1,
            ..Self::default()
        }
    }

    /// Settings for tests against local mock servers (plain HTTP allowed).
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            transport: TransportSecurity::AllowInsecureHttp,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RestClientConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.transport, TransportSecurity::TlsOnly);
        assert_eq!(config.tls_roots, TlsRootConfig::WebPki);
        assert!(config.user_agent.starts_with("chawk/"));
    }

    #[test]
    fn test_token_endpoint_preset() {
        let config = RestClientConfig::token_endpoint();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_body_size, 64 * 1024);
        assert_eq!(config.transport, TransportSecurity::TlsOnly);
    }

    #[test]
    fn test_for_testing_allows_http() {
        let config = RestClientConfig::for_testing();
        assert_eq!(config.transport, TransportSecurity::AllowInsecureHttp);
    }
}
