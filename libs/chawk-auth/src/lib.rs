#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Outbound `OAuth2` client-credentials flow for Blackboard Learn.
//!
//! [`Token`] fetches an access token lazily, keeps it in memory (and
//! optionally in a JSON file so short-lived processes reuse it), and refreshes
//! it shortly before expiry. [`BearerAuthLayer`] attaches it to every request
//! of a [`chawk_http::RestClient`] and drops it when the server answers 401.
//!
//! ```ignore
//! use chawk_auth::{OAuthClientConfig, RestClientBuilderExt, Token};
//!
//! let token = Token::new(config).await?;
//! let client = chawk_http::RestClient::builder()
//!     .with_bearer_auth(token)
//!     .build()?;
//! ```

mod builder_ext;
mod config;
mod error;
mod http_error;
mod layer;
mod secret;
mod source;
mod store;
mod token;

pub use builder_ext::RestClientBuilderExt;
pub use config::{DEFAULT_EXPIRY_SKEW, OAuthClientConfig};
pub use error::TokenError;
pub use http_error::format_rest_error;
pub use layer::{BearerAuthLayer, BearerAuthService};
pub use secret::SecretString;
pub use token::Token;
