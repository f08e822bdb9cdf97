#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP engine used by the chawk Blackboard Learn client.
//!
//! A hyper + rustls client wrapped in a tower stack:
//! - HTTPS only unless [`TransportSecurity::AllowInsecureHttp`] is chosen
//! - per-request timeout
//! - `User-Agent` injection
//! - transparent gzip/brotli/deflate decompression, size limits applied to
//!   the decompressed bytes
//! - an optional auth layer slot (bearer tokens live in `chawk-auth`)
//! - a `Buffer` front so the client is `Clone + Send + Sync` with fail-fast
//!   overload behaviour
//!
//! `send()` resolves to `Ok` for every HTTP status. Status handling belongs to
//! the caller, which is what the Learn operations need: a 404 is an answer,
//! not a failure.
//!
//! ```ignore
//! use chawk_http::RestClient;
//! use std::time::Duration;
//!
//! let client = RestClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! let resp = client
//!     .get("https://learn.example.edu/learn/api/public/v1/users/userName:bob")
//!     .send()
//!     .await?;
//! if resp.status() == http::StatusCode::NOT_FOUND { /* ... */ }
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod request;
mod response;
mod tls;

pub use builder::{InnerService, RestClientBuilder};
pub use client::RestClient;
pub use config::{
    DEFAULT_USER_AGENT, ERROR_BODY_PREVIEW_LIMIT, RestClientConfig, TlsRootConfig,
    TransportSecurity,
};
pub use error::{InvalidUrlKind, RestError};
pub use layers::{UserAgentLayer, UserAgentService};
pub use request::RestRequest;
pub use response::{ResponseBody, RestResponse};
