//! Collaborators of [`UserOperations`](super::service::UserOperations).
//!
//! The service only sees status codes and bodies; authentication, TLS and
//! URL layout live behind these traits.

use async_trait::async_trait;
use bytes::Bytes;
use chawk_users_sdk::{Course, UsersError};
use serde::de::DeserializeOwned;

/// Status and body of an HTTP exchange. Non-2xx answers are ordinary values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body as text; invalid UTF-8 is replaced.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// # Errors
    /// [`UsersError::Decode`] when the body is not the expected JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, UsersError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| UsersError::decode(format!("HTTP {} body: {e}", self.status)))
    }
}

/// Authenticated JSON exchanges with the Learn server.
///
/// Implementations attach credentials and return every HTTP answer; only
/// failures to obtain one (network, TLS, timeout, token endpoint) are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, UsersError>;

    async fn post(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, UsersError>;

    async fn patch(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, UsersError>;
}

/// Resources addressed by user operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// Collection users are created in
    CreateUser,
    /// A user by user name
    User { username: &'a str },
    /// A user by external id
    UserByExternalId { external_id: &'a str },
    /// Course memberships of a user
    UserCourses { username: &'a str },
    /// A user's membership in one course, by institution course id
    CourseMembership {
        course_id: &'a str,
        username: &'a str,
    },
    /// A course by primary id
    Course { id: &'a str },
}

/// Maps an [`Endpoint`] to an absolute URL.
pub trait EndpointResolver: Send + Sync {
    /// # Errors
    /// [`UsersError::InvalidArgument`] when no URL can be formed.
    fn resolve(&self, endpoint: &Endpoint<'_>) -> Result<String, UsersError>;
}

/// Course lookups used to expand enrollments.
#[async_trait]
pub trait CourseOperations: Send + Sync {
    async fn get_course(&self, id: &str) -> Result<Course, UsersError>;
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn text_replaces_invalid_utf8() {
        let resp = TransportResponse::new(400, vec![b'o', b'k', 0xff]);
        assert_eq!(resp.text(), "ok\u{fffd}");
    }

    #[test]
    fn json_failure_is_a_decode_error() {
        let resp = TransportResponse::new(200, "<html>");
        let err = resp.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, UsersError::Decode(msg) if msg.starts_with("HTTP 200 body")));
    }
}
