use chawk_auth::TokenError;
use chawk_http::RestError;
use thiserror::Error;

/// Failures while assembling a [`BlackboardClient`](crate::BlackboardClient).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("token setup failed: {0}")]
    Token(#[from] TokenError),

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] RestError),
}

impl ClientError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
