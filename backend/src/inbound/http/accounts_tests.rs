//! Tests for account API handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockAccountCommand, MockAccountQuery};
use crate::domain::{AccessToken, ErrorCode, UserId};
use crate::inbound::http::test_utils::{bearer, sample_user, state_with, test_app};

fn session_for(id: i64) -> AuthSession {
    AuthSession {
        token: AccessToken::new("signed.jwt.token"),
        user: sample_user(id),
    }
}

async fn send(state: HttpState, req: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(state)).await;
    let res = actix_test::call_service(&app, req.to_request()).await;
    let status = res.status();
    (status, actix_test::read_body_json(res).await)
}

#[actix_web::test]
async fn registering_returns_token_and_profile() {
    let mut accounts = MockAccountCommand::new();
    accounts
        .expect_register()
        .withf(|registration| {
            registration.email().as_str() == "sarah@example.com"
                && registration.phone().is_none()
        })
        .times(1)
        .return_once(|_| Ok(session_for(1)));
    let state = state_with(|state| state.accounts = Arc::new(accounts));

    let (status, body) = send(
        state,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "name": "Sarah Chen",
                "email": "Sarah@Example.com",
                "password": "password123"
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["token"], "signed.jwt.token");
    assert_eq!(body["user"]["id"], 1);
    assert_eq!(body["user"]["tripsCount"], 12);
    assert!(body["user"].get("password").is_none());
}

#[rstest]
#[case(json!({"email": "a@b.co", "password": "secret1"}), "name")]
#[case(json!({"name": "Sam", "password": "secret1"}), "email")]
#[case(json!({"name": "Sam", "email": "a@b.co", "password": "  "}), "password")]
#[actix_web::test]
async fn registration_requires_every_mandatory_field(
    #[case] payload: Value,
    #[case] field: &str,
) {
    let (status, body) = send(
        state_with(|_| {}),
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please fill in all required fields.");
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn short_passwords_are_rejected() {
    let (status, body) = send(
        state_with(|_| {}),
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({"name": "Sam", "email": "a@b.co", "password": "12345"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password must be at least 6 characters.");
}

#[actix_web::test]
async fn duplicate_emails_conflict() {
    let mut accounts = MockAccountCommand::new();
    accounts
        .expect_register()
        .return_once(|_| Err(Error::conflict("Email already registered.")));
    let state = state_with(|state| state.accounts = Arc::new(accounts));

    let (status, body) = send(
        state,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({"name": "Sam", "email": "a@b.co", "password": "secret1"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["message"], "Email already registered.");
}

#[actix_web::test]
async fn login_rejects_bad_credentials() {
    let mut accounts = MockAccountCommand::new();
    accounts
        .expect_login()
        .return_once(|_| Err(Error::unauthorized("Invalid email or password.")));
    let state = state_with(|state| state.accounts = Arc::new(accounts));

    let (status, body) = send(
        state,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "a@b.co", "password": "wrong-pass"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password.");
}

#[actix_web::test]
async fn login_requires_both_fields() {
    let (status, body) = send(
        state_with(|_| {}),
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "a@b.co"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email and password are required.");
    assert_eq!(body["details"]["field"], "password");
}

#[actix_web::test]
async fn profile_requires_a_token() {
    let (status, body) = send(
        state_with(|_| {}),
        actix_test::TestRequest::get().uri("/api/v1/auth/me"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access denied. No token provided.");
}

#[actix_web::test]
async fn profile_is_read_for_the_token_subject() {
    let mut query = MockAccountQuery::new();
    query
        .expect_profile()
        .withf(|id| *id == UserId::new(3))
        .return_once(|id| Ok(sample_user(id.as_i64())));
    let state = state_with(|state| state.account_query = Arc::new(query));

    let (status, body) = send(
        state,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(bearer(3)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 3);
    assert_eq!(body["email"], "sarah@example.com");
}

#[actix_web::test]
async fn profile_updates_leave_absent_fields_alone() {
    let mut accounts = MockAccountCommand::new();
    accounts
        .expect_update_profile()
        .withf(|id, update| {
            *id == UserId::new(3)
                && update.name.is_none()
                && update.phone.as_ref().map(|p| p.as_str()) == Some("555-0100")
        })
        .return_once(|id, _| Ok(sample_user(id.as_i64())));
    let state = state_with(|state| state.accounts = Arc::new(accounts));

    let (status, body) = send(
        state,
        actix_test::TestRequest::put()
            .uri("/api/v1/auth/me")
            .insert_header(bearer(3))
            .set_json(json!({"phone": "555-0100"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile updated.");
    assert_eq!(body["user"]["id"], 3);
}

#[test]
fn invalid_emails_name_their_field() {
    let error = credentials_error(CredentialsValidationError::User(
        UserValidationError::InvalidEmail,
    ));

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.details().and_then(|d| d["field"].as_str()), Some("email"));
}
