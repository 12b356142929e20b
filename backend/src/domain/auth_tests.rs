//! Tests for the authorization gate.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockTokenService, MockUserRepository, TokenServiceError};
use crate::domain::user::User;

fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

fn directory_user(raw_email: &str, role: Role) -> User {
    User {
        email: email(raw_email),
        display_name: "Ada".to_owned(),
        role,
        created_at: Utc::now(),
    }
}

fn verifying_token_service(raw_email: &'static str) -> MockTokenService {
    let mut tokens = MockTokenService::new();
    tokens
        .expect_verify()
        .returning(move |_| Ok(Identity::new(email(raw_email))));
    tokens
}

#[tokio::test]
async fn missing_bearer_fails_with_missing_token() {
    let gate = AuthorizationGate::new(
        Arc::new(MockTokenService::new()),
        Arc::new(MockUserRepository::new()),
    );

    let error = gate
        .authorize(None, Capability::Authenticated)
        .await
        .expect_err("no token");
    assert_eq!(error.code(), ErrorCode::MissingToken);
}

#[rstest]
#[case(TokenServiceError::invalid("bad signature"), ErrorCode::InvalidToken)]
#[case(TokenServiceError::expired(), ErrorCode::ExpiredToken)]
#[tokio::test]
async fn token_failures_propagate_unchanged(
    #[case] token_error: TokenServiceError,
    #[case] expected: ErrorCode,
) {
    let mut tokens = MockTokenService::new();
    tokens
        .expect_verify()
        .return_once(move |_| Err(token_error));

    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(0);

    let gate = AuthorizationGate::new(Arc::new(tokens), Arc::new(users));
    let error = gate
        .authorize(Some("token"), Capability::Admin)
        .await
        .expect_err("verification fails");
    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn authenticated_capability_skips_the_directory() {
    let tokens = verifying_token_service("ada@example.com");
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(0);

    let gate = AuthorizationGate::new(Arc::new(tokens), Arc::new(users));
    let identity = gate
        .authorize(Some("token"), Capability::Authenticated)
        .await
        .expect("any verified identity passes");
    assert_eq!(identity.email, email("ada@example.com"));
}

#[rstest]
#[case(Capability::Admin, Role::Admin, true)]
#[case(Capability::Admin, Role::Instructor, false)]
#[case(Capability::Admin, Role::Student, false)]
#[case(Capability::Instructor, Role::Instructor, true)]
#[case(Capability::Instructor, Role::Admin, false)]
#[tokio::test]
async fn role_must_equal_required_capability(
    #[case] capability: Capability,
    #[case] stored_role: Role,
    #[case] should_pass: bool,
) {
    let tokens = verifying_token_service("ada@example.com");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(directory_user("ada@example.com", stored_role))));

    let gate = AuthorizationGate::new(Arc::new(tokens), Arc::new(users));
    let result = gate.authorize(Some("token"), capability).await;
    match result {
        Ok(_) => assert!(should_pass, "expected Forbidden for {stored_role:?}"),
        Err(error) => {
            assert!(!should_pass, "expected success for {stored_role:?}");
            assert_eq!(error.code(), ErrorCode::Forbidden);
        }
    }
}

#[tokio::test]
async fn unknown_caller_is_forbidden() {
    let tokens = verifying_token_service("ghost@example.com");
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));

    let gate = AuthorizationGate::new(Arc::new(tokens), Arc::new(users));
    let error = gate
        .authorize(Some("token"), Capability::Instructor)
        .await
        .expect_err("unknown caller");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn self_role_query_mismatch_is_a_negative_answer() {
    let tokens = verifying_token_service("ada@example.com");
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(0);

    let gate = AuthorizationGate::new(Arc::new(tokens), Arc::new(users));
    let identity = Identity::new(email("ada@example.com"));
    let held = gate
        .holds_role(&identity, &email("someone-else@example.com"), Role::Admin)
        .await
        .expect("mismatch is not an error");
    assert!(!held);
}

#[rstest]
#[case(Role::Admin, Role::Admin, true)]
#[case(Role::Instructor, Role::Admin, false)]
#[tokio::test]
async fn self_role_query_reflects_directory(
    #[case] stored: Role,
    #[case] queried: Role,
    #[case] expected: bool,
) {
    let tokens = verifying_token_service("ada@example.com");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(directory_user("ada@example.com", stored))));

    let gate = AuthorizationGate::new(Arc::new(tokens), Arc::new(users));
    let identity = Identity::new(email("ada@example.com"));
    let held = gate
        .holds_role(&identity, &email("ada@example.com"), queried)
        .await
        .expect("directory read succeeds");
    assert_eq!(held, expected);
}
