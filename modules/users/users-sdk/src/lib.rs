#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Users SDK.
//!
//! Transport-agnostic surface of the `users` module:
//!
//! - [`UsersApi`] - user management operations against Blackboard Learn
//! - [`User`], [`NewUser`], [`Course`], [`Availability`] - models
//! - [`CreateUserOutcome`], [`UpdateOutcome`] - explicit results of mutations
//! - [`UsersError`] - error taxonomy
//!
//! ```ignore
//! use chawk_users_sdk::{UsersApi, UpdateOutcome};
//!
//! let users: Arc<dyn UsersApi> = client.users_api();
//! if users.user_exists("bob").await? {
//!     let outcome = users.update_availability("bob", "No").await?;
//!     assert_eq!(outcome, UpdateOutcome::Updated);
//! }
//! ```

pub mod api;
pub mod errors;
pub mod models;

pub use api::UsersApi;
pub use errors::UsersError;
pub use models::{Availability, Course, CreateUserOutcome, NewUser, UpdateOutcome, User};
