use thiserror::Error;

/// Errors raised by user operations.
///
/// Which operations raise and which report an outcome is part of each
/// operation's contract; see [`UsersApi`](crate::UsersApi).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UsersError {
    /// Rejected locally; no request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The server answered 401.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The server answered with a status the operation does not expect.
    #[error("Learn API returned HTTP {status}")]
    Api { status: u16, body: Option<String> },

    #[error("user not found: {0}")]
    UserNotFound(String),

    /// No HTTP response was obtained (network, TLS, timeout, token endpoint).
    #[error("transport error: {0}")]
    Transport(String),

    /// A success response did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl UsersError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn api(status: u16, body: Option<String>) -> Self {
        Self::Api { status, body }
    }

    pub fn user_not_found(username: impl Into<String>) -> Self {
        Self::UserNotFound(username.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Authentication(_) => Some(401),
            _ => None,
        }
    }
}
