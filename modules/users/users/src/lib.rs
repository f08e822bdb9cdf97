#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Users module implementation.
//!
//! The public API is defined in `chawk-users-sdk` and re-exported here.
//! [`BlackboardClient`] wires the default HTTP collaborators; tests and
//! embedders can assemble [`UserOperations`] from their own ports instead.

pub use chawk_users_sdk::{
    Availability, Course, CreateUserOutcome, NewUser, UpdateOutcome, User, UsersApi, UsersError,
};

pub mod client;
pub mod config;
pub mod errors;

pub use client::BlackboardClient;
pub use config::{ChawkConfig, HttpSettings};
pub use errors::ClientError;

pub use domain::ports::{
    CourseOperations, Endpoint, EndpointResolver, Transport, TransportResponse,
};
pub use domain::service::UserOperations;
pub use infra::{HttpCourseOperations, HttpTransport, LearnEndpoints};

#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
