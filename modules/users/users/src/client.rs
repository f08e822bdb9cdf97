use std::sync::Arc;

use chawk_auth::{OAuthClientConfig, RestClientBuilderExt, Token};
use chawk_http::RestClientBuilder;
use chawk_users_sdk::UsersApi;
use tracing::info;

use crate::config::ChawkConfig;
use crate::domain::ports::{CourseOperations, EndpointResolver, Transport};
use crate::domain::service::UserOperations;
use crate::errors::ClientError;
use crate::infra::{HttpCourseOperations, HttpTransport, LearnEndpoints};

/// Entry point wiring the default collaborators for one Learn server.
///
/// ```ignore
/// let client = BlackboardClient::connect(&config).await?;
/// if client.users().user_exists("bob").await? { /* ... */ }
/// ```
#[derive(Clone)]
pub struct BlackboardClient {
    users: UserOperations,
    courses: Arc<dyn CourseOperations>,
    token: Token,
}

impl BlackboardClient {
    /// Validate `config`, prepare the token handle and build the HTTP stack.
    ///
    /// No token is requested here unless a cached one is loaded from
    /// `token_file`; the first API call fetches it.
    ///
    /// # Errors
    /// [`ClientError::Config`] for invalid settings, [`ClientError::Token`]
    /// for unusable OAuth settings, [`ClientError::Http`] when the TLS stack
    /// cannot be built.
    pub async fn connect(config: &ChawkConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let endpoints = LearnEndpoints::new(config.base_url()?)
            .map_err(|e| ClientError::config(e.to_string()))?;
        let token_endpoint = endpoints
            .token()
            .map_err(|e| ClientError::config(e.to_string()))?;

        let mut oauth = OAuthClientConfig::new(
            token_endpoint,
            config.client_id.trim(),
            config.client_secret.as_str(),
        );
        oauth.token_file.clone_from(&config.token_file);
        oauth.http_config = Some(config.token_rest_config());
        let token = Token::new(oauth).await?;

        let rest = RestClientBuilder::with_config(config.rest_config())
            .with_bearer_auth(token.clone())
            .build()?;

        info!(base_url = %endpoints.base(), "Learn client ready");

        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(rest));
        let endpoints: Arc<dyn EndpointResolver> = Arc::new(endpoints);
        let courses: Arc<dyn CourseOperations> = Arc::new(HttpCourseOperations::new(
            transport.clone(),
            endpoints.clone(),
        ));
        let users = UserOperations::new(transport, endpoints, courses.clone());

        Ok(Self {
            users,
            courses,
            token,
        })
    }

    #[must_use]
    pub fn users(&self) -> &UserOperations {
        &self.users
    }

    /// The user operations as a trait object.
    #[must_use]
    pub fn users_api(&self) -> Arc<dyn UsersApi> {
        Arc::new(self.users.clone())
    }

    #[must_use]
    pub fn courses(&self) -> &dyn CourseOperations {
        self.courses.as_ref()
    }

    /// Forget the cached access token, including its `token_file` copy; the
    /// next call authenticates again.
    pub async fn reset_token(&self) {
        self.token.invalidate().await;
    }
}
