use async_trait::async_trait;
use chawk_users_sdk::{
    Course, CreateUserOutcome, NewUser, UpdateOutcome, User, UsersApi, UsersError,
};

use crate::domain::service::UserOperations;

#[async_trait]
impl UsersApi for UserOperations {
    async fn create_user(&self, user: &NewUser) -> Result<CreateUserOutcome, UsersError> {
        UserOperations::create_user(self, user).await
    }

    async fn user_exists(&self, username: &str) -> Result<bool, UsersError> {
        UserOperations::user_exists(self, username).await
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>, UsersError> {
        UserOperations::get_user(self, username).await
    }

    async fn resolve_local_username(&self, external_id: &str) -> Result<String, UsersError> {
        UserOperations::resolve_local_username(self, external_id).await
    }

    async fn update_institution_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<UpdateOutcome, UsersError> {
        UserOperations::update_institution_email(self, username, email).await
    }

    async fn update_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<UpdateOutcome, UsersError> {
        UserOperations::update_email(self, username, email).await
    }

    async fn delete_user(&self, username: &str) -> Option<u16> {
        UserOperations::delete_user(self, username)
    }

    async fn update_availability(
        &self,
        username: &str,
        availability: &str,
    ) -> Result<UpdateOutcome, UsersError> {
        UserOperations::update_availability(self, username, availability).await
    }

    async fn update_data_source(
        &self,
        username: &str,
        data_source_id: &str,
    ) -> Result<UpdateOutcome, UsersError> {
        UserOperations::update_data_source(self, username, data_source_id).await
    }

    async fn get_course_role(
        &self,
        username: &str,
        course_id: &str,
    ) -> Result<String, UsersError> {
        UserOperations::get_course_role(self, username, course_id).await
    }

    async fn add_institution_roles(
        &self,
        username: &str,
        roles: &[String],
    ) -> Result<UpdateOutcome, UsersError> {
        UserOperations::add_institution_roles(self, username, roles).await
    }

    async fn get_enrollments(&self, username: &str) -> Vec<Course> {
        UserOperations::get_enrollments(self, username).await
    }

    async fn try_get_enrollments(&self, username: &str) -> Result<Vec<Course>, UsersError> {
        UserOperations::try_get_enrollments(self, username).await
    }

    async fn update_name(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UpdateOutcome, UsersError> {
        UserOperations::update_name(self, username, first_name, last_name).await
    }

    async fn update_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UpdateOutcome, UsersError> {
        UserOperations::update_password(self, username, password).await
    }
}
