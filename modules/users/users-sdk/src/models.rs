use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::UsersError;

/// Snapshot of a Learn user account.
///
/// Built by a lookup and never written back. `email` is not filled in by
/// [`UsersApi::get_user`](crate::UsersApi::get_user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    /// Institution role ids, in server order.
    pub roles: Vec<String>,
}

/// Input of [`UsersApi::create_user`](crate::UsersApi::create_user).
///
/// Every field is trimmed before use; `username`, `first_name` and
/// `last_name` must be non-empty afterwards.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Course resolved from an enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    /// Primary id (`_123_1`)
    pub id: String,
    /// Institution course id
    pub course_id: String,
    pub external_id: Option<String>,
    pub data_source_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub term_id: Option<String>,
    pub organization: Option<bool>,
    pub ultra_status: Option<String>,
    /// `availability.available` (`Yes`, `No`, `Disabled`, `Term`)
    pub available: Option<String>,
}

/// Account availability accepted by
/// [`UsersApi::update_availability`](crate::UsersApi::update_availability).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Availability {
    Yes,
    No,
    Disabled,
}

impl Availability {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Disabled => "Disabled",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = UsersError;

    /// Surrounding whitespace is ignored; the value itself is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Yes" => Ok(Self::Yes),
            "No" => Ok(Self::No),
            "Disabled" => Ok(Self::Disabled),
            other => Err(UsersError::invalid_argument(format!(
                "availability must be one of Disabled, Yes, No (got '{other}')"
            ))),
        }
    }
}

/// Result of [`UsersApi::create_user`](crate::UsersApi::create_user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CreateUserOutcome {
    /// 201
    Created,
    /// 403
    InsufficientPrivilege,
    /// 409, or the 400 Learn sends for a duplicate user name
    Conflict,
    /// 400
    Malformed { body: String },
    /// Any other status
    Unknown { status: u16, body: String },
}

impl CreateUserOutcome {
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created)
    }
}

/// Result of the update operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UpdateOutcome {
    Updated,
    /// The user does not exist; nothing was sent or the server said 404.
    NotFound,
    /// The server refused the change.
    Rejected { status: u16, body: String },
}

impl UpdateOutcome {
    #[must_use]
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn availability_parses_trimmed_values() {
        assert_eq!(" Yes ".parse::<Availability>().unwrap(), Availability::Yes);
        assert_eq!("No".parse::<Availability>().unwrap(), Availability::No);
        assert_eq!(
            "\tDisabled\n".parse::<Availability>().unwrap(),
            Availability::Disabled
        );
    }

    #[test]
    fn availability_rejects_unknown_and_wrong_case() {
        for bad in ["Maybe", "yes", "", "  "] {
            assert!(
                matches!(bad.parse::<Availability>(), Err(UsersError::InvalidArgument(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn new_user_debug_hides_password() {
        let user = NewUser {
            username: "bob".to_owned(),
            password: "hunter2".to_owned(),
            ..NewUser::default()
        };
        let rendered = format!("{user:?}");
        assert!(rendered.contains("bob"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn outcome_serializes_for_cli_output() {
        let json = serde_json::to_string(&UpdateOutcome::Rejected {
            status: 400,
            body: "bad".to_owned(),
        })
        .unwrap();
        assert_eq!(json, r#"{"Rejected":{"status":400,"body":"bad"}}"#);
    }
}
