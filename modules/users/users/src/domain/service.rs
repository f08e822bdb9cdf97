use std::sync::Arc;

use chawk_users_sdk::{
    Availability, Course, CreateUserOutcome, NewUser, UpdateOutcome, User, UsersError,
};
use tracing::{debug, error, info, instrument, warn};

use crate::domain::input::{optional, required, to_body};
use crate::domain::ports::{
    CourseOperations, Endpoint, EndpointResolver, Transport, TransportResponse,
};
use crate::domain::wire::{
    AvailabilityBody, ContactBody, CreateUserBody, EnrollmentPage, MembershipRecord, NameBody,
    UserPatch, UserRecord,
};

/// Body fragment Learn returns with a 400 when the user name is already taken.
const DUPLICATE_USER_MARKER: &str = "A database error occurred";

/// User management over the Learn REST API.
///
/// Holds no state of its own besides its collaborators; clones share them.
#[derive(Clone)]
pub struct UserOperations {
    transport: Arc<dyn Transport>,
    endpoints: Arc<dyn EndpointResolver>,
    courses: Arc<dyn CourseOperations>,
}

impl UserOperations {
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoints: Arc<dyn EndpointResolver>,
        courses: Arc<dyn CourseOperations>,
    ) -> Self {
        Self {
            transport,
            endpoints,
            courses,
        }
    }

    /// # Errors
    /// [`UsersError::InvalidArgument`] for a blank user name, first or last
    /// name; transport failures. HTTP answers are reported as outcomes.
    #[instrument(skip_all, fields(username = %user.username.trim()))]
    pub async fn create_user(&self, user: &NewUser) -> Result<CreateUserOutcome, UsersError> {
        let username = required("username", &user.username)?;
        let first_name = required("first_name", &user.first_name)?;
        let last_name = required("last_name", &user.last_name)?;

        let body = to_body(&CreateUserBody {
            user_name: username,
            password: user.password.trim(),
            availability: AvailabilityBody {
                available: Availability::Yes.as_str(),
            },
            name: NameBody {
                given: Some(first_name),
                family: Some(last_name),
                preferred_display_name: Some("GivenName"),
            },
            contact: ContactBody {
                email: Some(user.email.trim()),
                institution_email: None,
            },
        })?;
        let url = self.endpoints.resolve(&Endpoint::CreateUser)?;
        let resp = self.transport.post(&url, &body).await?;

        let outcome = match resp.status {
            201 => {
                info!("user created");
                CreateUserOutcome::Created
            }
            403 => {
                error!("insufficient privileges to create user");
                CreateUserOutcome::InsufficientPrivilege
            }
            409 => {
                error!("user already exists");
                CreateUserOutcome::Conflict
            }
            400 => {
                let body = resp.text();
                if body.contains(DUPLICATE_USER_MARKER) {
                    error!("user already exists");
                    CreateUserOutcome::Conflict
                } else {
                    error!(body = %body, "create user request rejected as malformed");
                    CreateUserOutcome::Malformed { body }
                }
            }
            status => CreateUserOutcome::Unknown {
                status,
                body: resp.text(),
            },
        };
        Ok(outcome)
    }

    /// # Errors
    /// [`UsersError::Authentication`] on 401, [`UsersError::Api`] on any
    /// status other than 200 and 404.
    #[instrument(skip_all, fields(username = %username.trim()))]
    pub async fn user_exists(&self, username: &str) -> Result<bool, UsersError> {
        let username = required("username", username)?;
        let resp = self.get(&Endpoint::User { username }).await?;
        match resp.status {
            200 => Ok(true),
            404 => Ok(false),
            401 => Err(UsersError::Authentication(resp.text())),
            status => Err(UsersError::api(status, Some(resp.text()))),
        }
    }

    /// # Errors
    /// Errors of [`user_exists`](Self::user_exists); [`UsersError::Decode`]
    /// when the user record lacks roles or names.
    #[instrument(skip_all, fields(username = %username.trim()))]
    pub async fn get_user(&self, username: &str) -> Result<Option<User>, UsersError> {
        let username = required("username", username)?;
        if !self.user_exists(username).await? {
            debug!("user not found");
            return Ok(None);
        }

        let resp = self.get(&Endpoint::User { username }).await?;
        if resp.status != 200 {
            debug!(status = resp.status, "user fetch did not succeed");
            return Ok(None);
        }

        let record: UserRecord = resp.json()?;
        let roles = record
            .institution_role_ids
            .ok_or_else(|| UsersError::decode("user record without institutionRoleIds"))?;
        let name = record
            .name
            .ok_or_else(|| UsersError::decode("user record without name"))?;
        let (Some(first_name), Some(last_name)) = (name.given, name.family) else {
            return Err(UsersError::decode("user record without given or family name"));
        };

        Ok(Some(User {
            username: username.to_owned(),
            first_name,
            last_name,
            email: None,
            roles,
        }))
    }

    /// Learn user name for `external_id`; empty when the lookup fails.
    ///
    /// # Errors
    /// Transport failures; [`UsersError::Decode`] for a 200 that is not JSON.
    #[instrument(skip_all, fields(external_id = %external_id.trim()))]
    pub async fn resolve_local_username(&self, external_id: &str) -> Result<String, UsersError> {
        let external_id = required("external_id", external_id)?;
        let resp = self
            .get(&Endpoint::UserByExternalId { external_id })
            .await?;
        if resp.status != 200 {
            debug!(status = resp.status, "no user for external id");
            return Ok(String::new());
        }
        let record: UserRecord = resp.json()?;
        Ok(record.user_name.unwrap_or_default())
    }

    /// # Errors
    /// [`UsersError::InvalidArgument`] for a blank user name; transport failures.
    #[instrument(skip_all, fields(username = %username.trim()))]
    pub async fn update_institution_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<UpdateOutcome, UsersError> {
        let username = required("username", username)?;
        let patch = UserPatch {
            contact: Some(ContactBody {
                institution_email: Some(email.trim()),
                ..ContactBody::default()
            }),
            ..UserPatch::default()
        };
        let resp = self.patch_user(username, &patch).await?;
        Ok(logged_update(&resp, "institution email updated"))
    }

    /// # Errors
    /// [`UsersError::InvalidArgument`] for a blank user name; transport failures.
    #[instrument(skip_all, fields(username = %username.trim()))]
    pub async fn update_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<UpdateOutcome, UsersError> {
        let username = required("username", username)?;
        let patch = UserPatch {
            contact: Some(ContactBody {
                email: Some(email.trim()),
                ..ContactBody::default()
            }),
            ..UserPatch::default()
        };
        let resp = self.patch_user(username, &patch).await?;
        Ok(logged_update(&resp, "email updated"))
    }

    /// Account deletion is not offered; nothing is sent.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn delete_user(&self, username: &str) -> Option<u16> {
        warn!(username = %username.trim(), "deleting users is not supported; no request sent");
        None
    }

    /// # Errors
    /// [`UsersError::InvalidArgument`] for an unknown availability or blank
    /// user name; errors of [`user_exists`](Self::user_exists).
    #[instrument(skip_all, fields(username = %username.trim()))]
    pub async fn update_availability(
        &self,
        username: &str,
        availability: &str,
    ) -> Result<UpdateOutcome, UsersError> {
        let username = required("username", username)?;
        let availability: Availability = availability.parse()?;

        if !self.user_exists(username).await? {
            error!("user does not exist; availability not changed");
            return Ok(UpdateOutcome::NotFound);
        }

        let patch = UserPatch {
            availability: Some(AvailabilityBody {
                available: availability.as_str(),
            }),
            ..UserPatch::default()
        };
        let resp = self.patch_user(username, &patch).await?;
        if resp.status == 200 {
            info!(%availability, "availability updated");
            return Ok(UpdateOutcome::Updated);
        }
        Ok(rejected(&resp))
    }

    /// # Errors
    /// [`UsersError::UserNotFound`] when the user does not exist; errors of
    /// [`user_exists`](Self::user_exists).
    #[instrument(skip_all, fields(username = %username.trim()))]
    pub async fn update_data_source(
        &self,
        username: &str,
        data_source_id: &str,
    ) -> Result<UpdateOutcome, UsersError> {
        let username = required("username", username)?;
        let data_source_id = data_source_id.trim();

        if !self.user_exists(username).await? {
            return Err(UsersError::user_not_found(username));
        }

        let patch = UserPatch {
            data_source_id: Some(data_source_id),
            ..UserPatch::default()
        };
        let resp = self.patch_user(username, &patch).await?;
        if resp.status == 200 {
            info!(data_source_id, "data source updated");
            return Ok(UpdateOutcome::Updated);
        }
        Ok(rejected(&resp))
    }

    /// # Errors
    /// [`UsersError::Api`] without a body for any status but 200;
    /// [`UsersError::Decode`] when `courseRoleId` is missing.
    #[instrument(skip_all, fields(username = %username.trim(), course_id = %course_id.trim()))]
    pub async fn get_course_role(
        &self,
        username: &str,
        course_id: &str,
    ) -> Result<String, UsersError> {
        let username = required("username", username)?;
        let course_id = required("course_id", course_id)?;
        let resp = self
            .get(&Endpoint::CourseMembership {
                course_id,
                username,
            })
            .await?;
        if resp.status != 200 {
            return Err(UsersError::api(resp.status, None));
        }
        let record: MembershipRecord = resp.json()?;
        record
            .course_role_id
            .ok_or_else(|| UsersError::decode("membership without courseRoleId"))
    }

    /// Replaces the user's institution roles with `roles`.
    ///
    /// # Errors
    /// [`UsersError::InvalidArgument`] for a blank user name; transport failures.
    #[instrument(skip_all, fields(username = %username.trim()))]
    pub async fn add_institution_roles(
        &self,
        username: &str,
        roles: &[String],
    ) -> Result<UpdateOutcome, UsersError> {
        let username = required("username", username)?;
        let patch = UserPatch {
            institution_role_ids: Some(roles),
            ..UserPatch::default()
        };
        let resp = self.patch_user(username, &patch).await?;
        if resp.status == 200 {
            info!(roles = %roles.join(","), "institution roles updated");
            return Ok(UpdateOutcome::Updated);
        }
        error!(status = resp.status, body = %resp.text(), "institution roles update failed");
        Ok(rejected(&resp))
    }

    /// Courses of the first enrollment page; empty on any failure.
    #[instrument(skip_all, fields(username = %username.trim()))]
    pub async fn get_enrollments(&self, username: &str) -> Vec<Course> {
        match self.try_get_enrollments(username).await {
            Ok(courses) => courses,
            Err(e) => {
                error!(error = %e, "failed to fetch enrollments");
                Vec::new()
            }
        }
    }

    /// # Errors
    /// [`UsersError::Api`] when the membership listing is not 200; errors of
    /// the course lookups.
    pub async fn try_get_enrollments(&self, username: &str) -> Result<Vec<Course>, UsersError> {
        let username = required("username", username)?;
        let resp = self.get(&Endpoint::UserCourses { username }).await?;
        if resp.status != 200 {
            return Err(UsersError::api(resp.status, Some(resp.text())));
        }

        let page: EnrollmentPage = resp.json()?;
        let mut courses = Vec::with_capacity(page.results.len());
        for course_id in page.results.into_iter().filter_map(|r| r.course_id) {
            courses.push(self.courses.get_course(&course_id).await?);
        }
        debug!(count = courses.len(), "enrollments resolved");
        Ok(courses)
    }

    /// # Errors
    /// [`UsersError::InvalidArgument`] when both names are blank; transport failures.
    #[instrument(skip_all, fields(username = %username.trim()))]
    pub async fn update_name(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UpdateOutcome, UsersError> {
        let username = required("username", username)?;
        let given = optional(first_name);
        let family = optional(last_name);
        if given.is_none() && family.is_none() {
            return Err(UsersError::invalid_argument(
                "first_name or last_name must not be empty",
            ));
        }

        let patch = UserPatch {
            name: Some(NameBody {
                given,
                family,
                preferred_display_name: None,
            }),
            ..UserPatch::default()
        };
        let resp = self.patch_user(username, &patch).await?;
        Ok(classify_update(&resp, "name updated"))
    }

    /// # Errors
    /// [`UsersError::InvalidArgument`] for a blank password; transport failures.
    #[instrument(skip_all, fields(username = %username.trim()))]
    pub async fn update_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UpdateOutcome, UsersError> {
        let username = required("username", username)?;
        let password = required("password", password)?;
        let patch = UserPatch {
            password: Some(password),
            ..UserPatch::default()
        };
        let resp = self.patch_user(username, &patch).await?;
        Ok(classify_update(&resp, "password updated"))
    }

    async fn get(&self, endpoint: &Endpoint<'_>) -> Result<TransportResponse, UsersError> {
        let url = self.endpoints.resolve(endpoint)?;
        self.transport.get(&url).await
    }

    async fn patch_user(
        &self,
        username: &str,
        patch: &UserPatch<'_>,
    ) -> Result<TransportResponse, UsersError> {
        let body = to_body(patch)?;
        let url = self.endpoints.resolve(&Endpoint::User { username })?;
        self.transport.patch(&url, &body).await
    }
}

fn rejected(resp: &TransportResponse) -> UpdateOutcome {
    UpdateOutcome::Rejected {
        status: resp.status,
        body: resp.text(),
    }
}

/// 200 is success; anything else is logged and rejected.
fn logged_update(resp: &TransportResponse, done: &str) -> UpdateOutcome {
    if resp.status == 200 {
        info!("{done}");
        return UpdateOutcome::Updated;
    }
    error!(status = resp.status, body = %resp.text(), "user update failed");
    rejected(resp)
}

fn classify_update(resp: &TransportResponse, done: &str) -> UpdateOutcome {
    match resp.status {
        200 | 204 => {
            info!("{done}");
            UpdateOutcome::Updated
        }
        404 => {
            error!("user does not exist");
            UpdateOutcome::NotFound
        }
        _ => {
            error!(status = resp.status, body = %resp.text(), "user update failed");
            rejected(resp)
        }
    }
}
