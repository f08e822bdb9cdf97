//! Learn REST payloads sent and received by user operations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody<'a> {
    pub user_name: &'a str,
    pub password: &'a str,
    pub availability: AvailabilityBody<'a>,
    pub name: NameBody<'a>,
    pub contact: ContactBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityBody<'a> {
    pub available: &'a str,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_display_name: Option<&'a str>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_email: Option<&'a str>,
}

/// Partial user update; only the fields that are set are sent.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<AvailabilityBody<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactBody<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_role_ids: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<NameBody<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_name: Option<String>,
    pub institution_role_ids: Option<Vec<String>>,
    pub name: Option<NameRecord>,
}

#[derive(Debug, Deserialize)]
pub struct NameRecord {
    pub given: Option<String>,
    pub family: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRecord {
    pub course_role_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollmentPage {
    #[serde(default)]
    pub results: Vec<EnrollmentRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    pub course_id: Option<String>,
}
