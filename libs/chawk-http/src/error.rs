use std::time::Duration;
use thiserror::Error;

/// Why a URL was rejected before any request went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidUrlKind {
    /// Not parseable as a URI
    Malformed,
    /// No host
    MissingHost,
    /// No scheme
    MissingScheme,
}

/// Errors produced by [`RestClient`](crate::RestClient).
///
/// Non-2xx responses are not errors unless the caller asks for it through
/// [`RestResponse::error_for_status`](crate::RestResponse::error_for_status),
/// [`RestResponse::json`](crate::RestResponse::json) or
/// [`RestResponse::text`](crate::RestResponse::text).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RestError {
    #[error("failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Network level failure (connect, reset, DNS, ...)
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("TLS error: {0}")]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("response body too large: limit {limit} bytes, got {actual} bytes")]
    BodyTooLarge { limit: usize, actual: usize },

    /// Non-2xx status surfaced by one of the checked readers
    #[error("HTTP {status}: {body_preview}")]
    Status {
        status: http::StatusCode,
        body_preview: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("form encoding failed: {0}")]
    FormEncode(#[from] serde_urlencoded::ser::Error),

    /// Request buffer full
    #[error("client overloaded: request buffer is full")]
    Overloaded,

    /// Buffer worker is gone
    #[error("client unavailable: request worker stopped")]
    ServiceClosed,

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        url: String,
        kind: InvalidUrlKind,
        reason: String,
    },

    #[error("URL scheme '{scheme}' not allowed: {reason}")]
    InvalidScheme { scheme: String, reason: String },
}

impl RestError {
    /// Status code carried by a [`RestError::Status`].
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<hyper_util::client::legacy::Error> for RestError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        RestError::Transport(Box::new(err))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::error::Error;
    use std::fmt;

    #[derive(Debug)]
    struct Refused;

    impl fmt::Display for Refused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("connection refused")
        }
    }

    impl Error for Refused {}

    #[test]
    fn test_transport_error_keeps_source() {
        let err = RestError::Transport(Box::new(Refused));
        let source = err.source().unwrap();
        assert!(source.downcast_ref::<Refused>().is_some());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn test_status_accessor() {
        let err = RestError::Status {
            status: http::StatusCode::FORBIDDEN,
            body_preview: "nope".to_owned(),
        };
        assert_eq!(err.status(), Some(http::StatusCode::FORBIDDEN));
        assert_eq!(RestError::Overloaded.status(), None);
    }
}
