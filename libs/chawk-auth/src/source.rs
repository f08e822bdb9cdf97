use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};
use http::header::AUTHORIZATION;
use serde::Deserialize;
use time::OffsetDateTime;
use url::Url;
use zeroize::Zeroizing;

use crate::config::OAuthClientConfig;
use crate::error::TokenError;
use crate::http_error::format_rest_error;
use crate::secret::SecretString;
use crate::store::IssuedToken;

const CONTEXT: &str = "OAuth2 token";

/// Token endpoint response. Deserialize-only so it cannot be re-serialized
/// into a log line.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Exchanges client credentials for an access token.
pub struct TokenSource {
    client: chawk_http::RestClient,
    token_endpoint: Url,
    client_id: String,
    client_secret: SecretString,
    default_ttl: Duration,
}

impl TokenSource {
    pub fn new(config: &OAuthClientConfig) -> Result<Self, TokenError> {
        let http_config = config
            .http_config
            .clone()
            .unwrap_or_else(chawk_http::RestClientConfig::token_endpoint);
        let client = chawk_http::RestClientBuilder::with_config(http_config)
            .build()
            .map_err(|e| TokenError::Http(format_rest_error(&e, CONTEXT)))?;

        Ok(Self {
            client,
            token_endpoint: config.token_endpoint.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            default_ttl: config.default_ttl,
        })
    }

    /// `POST grant_type=client_credentials` with HTTP Basic credentials.
    pub async fn request_token(&self) -> Result<IssuedToken, TokenError> {
        let credentials = Zeroizing::new(format!(
            "{}:{}",
            self.client_id,
            self.client_secret.expose()
        ));
        let encoded = Zeroizing::new(general_purpose::STANDARD.encode(credentials.as_bytes()));
        let header_value = Zeroizing::new(format!("Basic {}", encoded.as_str()));

        tracing::debug!(endpoint = %self.token_endpoint, "requesting access token");

        let response = self
            .client
            .post(self.token_endpoint.as_str())
            .sensitive_header(AUTHORIZATION, &header_value)
            .form(&[("grant_type", "client_credentials")])
            .map_err(|e| TokenError::Http(format_rest_error(&e, CONTEXT)))?
            .send()
            .await
            .map_err(|e| TokenError::Http(format_rest_error(&e, CONTEXT)))?;

        let body: TokenResponse = response
            .error_for_status()
            .map_err(|e| TokenError::Http(format_rest_error(&e, CONTEXT)))?
            .json()
            .await
            .map_err(|e| match e {
                chawk_http::RestError::Json(err) => TokenError::InvalidResponse(err.to_string()),
                other => TokenError::Http(format_rest_error(&other, CONTEXT)),
            })?;

        let token_type = body.token_type.unwrap_or_else(|| "bearer".to_owned());
        if !token_type.eq_ignore_ascii_case("bearer") {
            return Err(TokenError::UnsupportedTokenType(token_type));
        }
        if body.access_token.is_empty() {
            return Err(TokenError::InvalidResponse(
                "access_token is empty".to_owned(),
            ));
        }

        let expires_in = body.expires_in.unwrap_or(self.default_ttl.as_secs());
        let lifetime = time::Duration::seconds(i64::try_from(expires_in).unwrap_or(i64::MAX));
        let expiry = OffsetDateTime::now_utc().saturating_add(lifetime);

        tracing::info!(expires_in, "obtained access token");

        Ok(IssuedToken {
            access_token: SecretString::new(body.access_token),
            token_type,
            expires_in,
            expiry,
        })
    }
}
