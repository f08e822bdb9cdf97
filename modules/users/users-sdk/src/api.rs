use async_trait::async_trait;

use crate::errors::UsersError;
use crate::models::{Course, CreateUserOutcome, NewUser, UpdateOutcome, User};

/// User management against a Blackboard Learn server.
///
/// Every call issues its requests one after another; nothing is retried.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Provision an account. Validation failures are raised before any request;
    /// every HTTP answer is reported as an outcome.
    async fn create_user(&self, user: &NewUser) -> Result<CreateUserOutcome, UsersError>;

    /// `true` on 200, `false` on 404, [`UsersError::Authentication`] on 401,
    /// [`UsersError::Api`] otherwise.
    async fn user_exists(&self, username: &str) -> Result<bool, UsersError>;

    /// Existence check followed by a fetch. `None` when absent or when the
    /// fetch does not return 200.
    async fn get_user(&self, username: &str) -> Result<Option<User>, UsersError>;

    /// Learn user name for an external id; empty when unknown.
    async fn resolve_local_username(&self, external_id: &str) -> Result<String, UsersError>;

    async fn update_institution_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<UpdateOutcome, UsersError>;

    async fn update_email(&self, username: &str, email: &str)
    -> Result<UpdateOutcome, UsersError>;

    /// Not supported by this client; sends nothing and returns `None`.
    async fn delete_user(&self, username: &str) -> Option<u16>;

    /// `availability` must be `Yes`, `No` or `Disabled` (surrounding
    /// whitespace ignored). Missing users yield [`UpdateOutcome::NotFound`].
    async fn update_availability(
        &self,
        username: &str,
        availability: &str,
    ) -> Result<UpdateOutcome, UsersError>;

    /// Missing users raise [`UsersError::UserNotFound`].
    async fn update_data_source(
        &self,
        username: &str,
        data_source_id: &str,
    ) -> Result<UpdateOutcome, UsersError>;

    /// The user's `courseRoleId` in a course.
    async fn get_course_role(&self, username: &str, course_id: &str)
    -> Result<String, UsersError>;

    /// Replace the institution roles with `roles`.
    async fn add_institution_roles(
        &self,
        username: &str,
        roles: &[String],
    ) -> Result<UpdateOutcome, UsersError>;

    /// Courses of the first enrollment page. Failures are logged and produce
    /// an empty list.
    async fn get_enrollments(&self, username: &str) -> Vec<Course>;

    /// Like [`get_enrollments`](Self::get_enrollments) but failures are returned.
    async fn try_get_enrollments(&self, username: &str) -> Result<Vec<Course>, UsersError>;

    /// Change given and/or family name; at least one must be non-blank.
    async fn update_name(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UpdateOutcome, UsersError>;

    async fn update_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UpdateOutcome, UsersError>;
}
