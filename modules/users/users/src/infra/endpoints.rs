use chawk_users_sdk::UsersError;
use url::Url;

use crate::domain::ports::{Endpoint, EndpointResolver};

const PUBLIC_V1: [&str; 4] = ["learn", "api", "public", "v1"];
const PUBLIC_V3: [&str; 4] = ["learn", "api", "public", "v3"];

/// Learn REST paths under a server base URL.
///
/// The base may carry a path prefix (`https://host/bb`); parameters are
/// appended as percent-encoded path segments.
#[derive(Debug, Clone)]
pub struct LearnEndpoints {
    base: Url,
}

impl LearnEndpoints {
    /// # Errors
    /// [`UsersError::InvalidArgument`] when `base` cannot carry a path.
    pub fn new(base: Url) -> Result<Self, UsersError> {
        if base.cannot_be_a_base() {
            return Err(UsersError::invalid_argument(format!(
                "base URL '{base}' cannot carry a path"
            )));
        }
        Ok(Self { base })
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Token endpoint of the same server.
    ///
    /// # Errors
    /// Same as [`EndpointResolver::resolve`].
    pub fn token(&self) -> Result<Url, UsersError> {
        self.join(&PUBLIC_V1, &["oauth2", "token"])
    }

    fn join(&self, prefix: &[&str], rest: &[&str]) -> Result<Url, UsersError> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| UsersError::invalid_argument("invalid Learn base URL"))?
            .pop_if_empty()
            .extend(prefix)
            .extend(rest);
        Ok(url)
    }
}

impl EndpointResolver for LearnEndpoints {
    fn resolve(&self, endpoint: &Endpoint<'_>) -> Result<String, UsersError> {
        let url = match *endpoint {
            Endpoint::CreateUser => self.join(&PUBLIC_V1, &["users"])?,
            Endpoint::User { username } => {
                self.join(&PUBLIC_V1, &["users", &format!("userName:{username}")])?
            }
            Endpoint::UserByExternalId { external_id } => {
                self.join(&PUBLIC_V1, &["users", &format!("externalId:{external_id}")])?
            }
            Endpoint::UserCourses { username } => self.join(
                &PUBLIC_V1,
                &["users", &format!("userName:{username}"), "courses"],
            )?,
            Endpoint::CourseMembership {
                course_id,
                username,
            } => self.join(
                &PUBLIC_V1,
                &[
                    "courses",
                    &format!("courseId:{course_id}"),
                    "users",
                    &format!("userName:{username}"),
                ],
            )?,
            Endpoint::Course { id } => self.join(&PUBLIC_V3, &["courses", id])?,
        };
        Ok(url.into())
    }
}
