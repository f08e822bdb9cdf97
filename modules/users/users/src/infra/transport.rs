use async_trait::async_trait;
use chawk_auth::format_rest_error;
use chawk_http::{RestClient, RestError, RestRequest, RestResponse};
use chawk_users_sdk::UsersError;
use tracing::{debug, instrument};

use crate::domain::ports::{Transport, TransportResponse};

const RATE_LIMIT_REMAINING: &str = "x-rate-limit-remaining";

/// [`Transport`] over a [`RestClient`].
///
/// Authentication is the client's concern (see
/// `chawk_auth::RestClientBuilderExt::with_bearer_auth`); this adapter only
/// turns exchanges into status and body.
#[derive(Clone)]
pub struct HttpTransport {
    client: RestClient,
}

impl HttpTransport {
    #[must_use]
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    async fn exchange(&self, request: RestRequest) -> Result<TransportResponse, UsersError> {
        let response = request
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| map_rest_error(&e))?;
        into_transport_response(response).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(name = "learn.get", skip_all, fields(url = %url))]
    async fn get(&self, url: &str) -> Result<TransportResponse, UsersError> {
        self.exchange(self.client.get(url)).await
    }

    #[instrument(name = "learn.post", skip_all, fields(url = %url))]
    async fn post(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, UsersError> {
        let request = self.client.post(url).json(body).map_err(|e| map_rest_error(&e))?;
        self.exchange(request).await
    }

    #[instrument(name = "learn.patch", skip_all, fields(url = %url))]
    async fn patch(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, UsersError> {
        let request = self.client.patch(url).json(body).map_err(|e| map_rest_error(&e))?;
        self.exchange(request).await
    }
}

async fn into_transport_response(response: RestResponse) -> Result<TransportResponse, UsersError> {
    let status = response.status().as_u16();
    if let Some(remaining) = response
        .headers()
        .get(RATE_LIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
    {
        debug!(remaining, "Learn rate limit");
    }
    let body = response.bytes().await.map_err(|e| map_rest_error(&e))?;
    debug!(status, len = body.len(), "Learn response");
    Ok(TransportResponse { status, body })
}

/// Transport failures carry a message only; HTTP bodies never leak into it.
fn map_rest_error(err: &RestError) -> UsersError {
    match err {
        RestError::InvalidUrl { .. } | RestError::InvalidScheme { .. } => {
            UsersError::invalid_argument(format_rest_error(err, "Learn"))
        }
        _ => UsersError::transport(format_rest_error(err, "Learn")),
    }
}
