#![allow(clippy::unwrap_used, clippy::expect_used)]

//! `BlackboardClient` against a mock Learn server: token endpoint and REST API.

use chawk_users::{
    BlackboardClient, ChawkConfig, ClientError, CreateUserOutcome, HttpSettings, NewUser,
    UpdateOutcome, UsersError,
};
use httpmock::prelude::*;
use serde_json::json;

const TOKEN_PATH: &str = "/learn/api/public/v1/oauth2/token";

fn config(server: &MockServer) -> ChawkConfig {
    ChawkConfig {
        base_url: server.base_url(),
        client_id: "app-key".to_owned(),
        client_secret: "app-secret".to_owned(),
        token_file: None,
        http: HttpSettings {
            allow_insecure_http: true,
            ..HttpSettings::default()
        },
    }
}

fn mock_token<'a>(server: &'a MockServer, access_token: &str) -> httpmock::Mock<'a> {
    let body = json!({ "access_token": access_token, "token_type": "bearer", "expires_in": 3599 });
    server.mock(|when, then| {
        when.method(POST)
            .path(TOKEN_PATH)
            .body("grant_type=client_credentials");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(body);
    })
}

#[tokio::test]
async fn api_calls_carry_bearer_token() {
    let server = MockServer::start();
    let token = mock_token(&server, "tok-1");
    let lookup = server.mock(|when, then| {
        when.method(GET)
            .path("/learn/api/public/v1/users/userName:bob")
            .header("authorization", "Bearer tok-1");
        then.status(200).json_body(json!({ "userName": "bob" }));
    });

    let client = BlackboardClient::connect(&config(&server)).await.unwrap();

    assert!(client.users().user_exists("bob").await.unwrap());
    assert!(client.users().user_exists(" bob ").await.unwrap());
    token.assert_calls(1);
    lookup.assert_calls(2);
}

#[tokio::test]
async fn create_user_round_trip() {
    let server = MockServer::start();
    mock_token(&server, "tok");
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/learn/api/public/v1/users")
            .json_body(json!({
                "userName": "ann",
                "password": "pw",
                "availability": { "available": "Yes" },
                "name": { "given": "Ann", "family": "Ito", "preferredDisplayName": "GivenName" },
                "contact": { "email": "ann@example.edu" }
            }));
        then.status(201).json_body(json!({ "id": "_9_1", "userName": "ann" }));
    });

    let client = BlackboardClient::connect(&config(&server)).await.unwrap();
    let outcome = client
        .users()
        .create_user(&NewUser {
            username: "ann".to_owned(),
            first_name: "Ann".to_owned(),
            last_name: "Ito".to_owned(),
            email: "ann@example.edu".to_owned(),
            password: "pw".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(outcome, CreateUserOutcome::Created);
    create.assert();
}

#[tokio::test]
async fn enrollments_resolve_courses_through_v3() {
    let server = MockServer::start();
    mock_token(&server, "tok");
    server.mock(|when, then| {
        when.method(GET)
            .path("/learn/api/public/v1/users/userName:bob/courses");
        then.status(200).json_body(json!({
            "results": [{ "courseId": "_1_1" }, { "courseId": "_2_1" }]
        }));
    });
    for (id, name) in [("_1_1", "Biology"), ("_2_1", "Chemistry")] {
        server.mock(|when, then| {
            when.method(GET)
                .path(format!("/learn/api/public/v3/courses/{id}"));
            then.status(200).json_body(json!({
                "id": id,
                "courseId": format!("{name}-101"),
                "name": name,
                "availability": { "available": "Yes" }
            }));
        });
    }

    let client = BlackboardClient::connect(&config(&server)).await.unwrap();
    let courses = client.users().get_enrollments("bob").await;

    let names: Vec<_> = courses.iter().filter_map(|c| c.name.as_deref()).collect();
    assert_eq!(names, ["Biology", "Chemistry"]);
}

#[tokio::test]
async fn unauthorized_response_forces_new_token() {
    let server = MockServer::start();
    let token = mock_token(&server, "stale");
    let lookup = server.mock(|when, then| {
        when.method(GET)
            .path("/learn/api/public/v1/users/userName:bob");
        then.status(401).body("token expired");
    });

    let client = BlackboardClient::connect(&config(&server)).await.unwrap();
    let users = client.users_api();

    let err = users.user_exists("bob").await.unwrap_err();
    assert_eq!(err, UsersError::Authentication("token expired".to_owned()));
    users.user_exists("bob").await.unwrap_err();

    token.assert_calls(2);
    lookup.assert_calls(2);
}

#[tokio::test]
async fn token_endpoint_failure_is_a_transport_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(TOKEN_PATH);
        then.status(401).body(r#"{"error":"invalid_client"}"#);
    });
    let api = server.mock(|when, then| {
        when.method(PATCH);
        then.status(200);
    });

    let client = BlackboardClient::connect(&config(&server)).await.unwrap();
    let err = client
        .users()
        .update_email("bob", "bob@example.edu")
        .await
        .unwrap_err();

    assert!(matches!(err, UsersError::Transport(_)));
    api.assert_calls(0);
}

#[tokio::test]
async fn cached_token_file_is_reused_across_clients() {
    let server = MockServer::start();
    let token = mock_token(&server, "persisted");
    server.mock(|when, then| {
        when.method(PATCH)
            .path("/learn/api/public/v1/users/userName:bob")
            .header("authorization", "Bearer persisted");
        then.status(200).body("{}");
    });
    let dir = tempfile::tempdir().unwrap();
    let cfg = ChawkConfig {
        token_file: Some(dir.path().join("token.json")),
        ..config(&server)
    };

    let first = BlackboardClient::connect(&cfg).await.unwrap();
    assert_eq!(
        first.users().update_password("bob", "n3w").await.unwrap(),
        UpdateOutcome::Updated
    );
    let second = BlackboardClient::connect(&cfg).await.unwrap();
    assert_eq!(
        second.users().update_password("bob", "n3w").await.unwrap(),
        UpdateOutcome::Updated
    );

    token.assert_calls(1);
}

#[tokio::test]
async fn connect_rejects_incomplete_config() {
    let server = MockServer::start();
    let cfg = ChawkConfig {
        client_secret: String::new(),
        ..config(&server)
    };

    let err = BlackboardClient::connect(&cfg).await.err().unwrap();

    assert!(matches!(err, ClientError::Config(_)));
}
