use thiserror::Error;

/// Token acquisition failures. No variant ever carries a secret.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TokenError {
    /// Transport or status failure talking to the token endpoint; built by
    /// [`format_rest_error`](crate::format_rest_error).
    #[error("{0}")]
    Http(String),

    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    #[error("unsupported token type: {0}")]
    UnsupportedTokenType(String),

    #[error("OAuth2 config error: {0}")]
    ConfigError(String),

    /// Reading or writing the token cache file failed.
    #[error("token cache error: {0}")]
    Cache(String),
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn variants_render() {
        assert_eq!(
            TokenError::ConfigError("client_id must not be empty".to_owned()).to_string(),
            "OAuth2 config error: client_id must not be empty"
        );
        assert_eq!(
            TokenError::UnsupportedTokenType("mac".to_owned()).to_string(),
            "unsupported token type: mac"
        );
        assert_eq!(
            TokenError::Http("OAuth2 token HTTP 401 Unauthorized".to_owned()).to_string(),
            "OAuth2 token HTTP 401 Unauthorized"
        );
    }
}
