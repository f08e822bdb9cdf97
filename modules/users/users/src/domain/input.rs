use chawk_users_sdk::UsersError;
use serde::Serialize;

/// Trimmed `value`, or [`UsersError::InvalidArgument`] naming `field` when blank.
pub fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, UsersError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UsersError::invalid_argument(format!(
            "{field} must not be empty"
        )));
    }
    Ok(trimmed)
}

/// Trimmed `value`, or `None` when blank.
pub fn optional(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

pub fn to_body<T: Serialize>(payload: &T) -> Result<serde_json::Value, UsersError> {
    serde_json::to_value(payload)
        .map_err(|e| UsersError::invalid_argument(format!("request body: {e}")))
}
