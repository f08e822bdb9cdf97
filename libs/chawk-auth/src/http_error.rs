use chawk_http::RestError;

/// Render a [`RestError`] with a context prefix (`"OAuth2 token"`, ...).
///
/// Status errors keep only the status code; response bodies of the token
/// endpoint are not echoed into logs.
#[must_use]
pub fn format_rest_error(e: &RestError, prefix: &str) -> String {
    match e {
        RestError::Status { status, .. } => format!("{prefix} HTTP {status}"),
        RestError::Json(err) => format!("{prefix} JSON parse failed: {err}"),
        RestError::Timeout(duration) => {
            format!("{prefix} request timed out after {}ms", duration.as_millis())
        }
        RestError::Transport(err) => format!("{prefix} transport error: {err}"),
        RestError::Tls(err) => format!("{prefix} TLS error: {err}"),
        RestError::BodyTooLarge { limit, actual } => {
            format!("{prefix} response too large: limit {limit} bytes, got {actual} bytes")
        }
        RestError::RequestBuild(err) => format!("{prefix} request build failed: {err}"),
        RestError::InvalidHeaderName(err) => format!("{prefix} invalid header name: {err}"),
        RestError::InvalidHeaderValue(err) => format!("{prefix} invalid header value: {err}"),
        RestError::FormEncode(err) => format!("{prefix} form encode error: {err}"),
        RestError::Overloaded => format!("{prefix} request rejected: client overloaded"),
        RestError::ServiceClosed => format!("{prefix} client unavailable"),
        RestError::InvalidUrl { url, reason, .. } => {
            format!("{prefix} invalid URL '{url}': {reason}")
        }
        RestError::InvalidScheme { scheme, reason } => {
            format!("{prefix} invalid scheme '{scheme}': {reason}")
        }
        _ => format!("{prefix} request failed"),
    }
}
