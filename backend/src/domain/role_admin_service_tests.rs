//! Tests for role administration.

use std::sync::Arc;

use rstest::rstest;
use uuid::Uuid;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockClassRepository, MockUserRepository};

fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

fn service(users: MockUserRepository, classes: MockClassRepository) -> RoleAdminService {
    RoleAdminService::new(Arc::new(users), Arc::new(classes))
}

#[rstest]
#[case(Role::Instructor)]
#[case(Role::Admin)]
#[tokio::test]
async fn promotion_updates_the_directory(#[case] role: Role) {
    let mut users = MockUserRepository::new();
    users
        .expect_set_role()
        .withf(move |_, requested| *requested == role)
        .times(1)
        .returning(|_, _| Ok(true));

    service(users, MockClassRepository::new())
        .promote(&email("ada@example.com"), role)
        .await
        .expect("promotion succeeds");
}

#[tokio::test]
async fn demotion_to_student_is_rejected() {
    let mut users = MockUserRepository::new();
    users.expect_set_role().times(0);

    let error = service(users, MockClassRepository::new())
        .promote(&email("ada@example.com"), Role::Student)
        .await
        .expect_err("student is not a grantable role");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn promoting_an_unknown_user_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_set_role().returning(|_, _| Ok(false));

    let error = service(users, MockClassRepository::new())
        .promote(&email("ghost@example.com"), Role::Admin)
        .await
        .expect_err("no such user");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(ApprovalStatus::Approved)]
#[case(ApprovalStatus::Denied)]
#[tokio::test]
async fn approval_status_is_applied(#[case] status: ApprovalStatus) {
    let mut classes = MockClassRepository::new();
    classes
        .expect_set_status()
        .withf(move |_, requested| *requested == status)
        .times(1)
        .returning(|_, _| Ok(true));

    service(MockUserRepository::new(), classes)
        .set_class_approval(Uuid::new_v4(), status)
        .await
        .expect("status update succeeds");
}

#[tokio::test]
async fn resetting_to_pending_is_rejected() {
    let mut classes = MockClassRepository::new();
    classes.expect_set_status().times(0);

    let error = service(MockUserRepository::new(), classes)
        .set_class_approval(Uuid::new_v4(), ApprovalStatus::Pending)
        .await
        .expect_err("pending is not settable");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn feedback_for_a_missing_class_is_not_found() {
    let mut classes = MockClassRepository::new();
    classes.expect_set_feedback().returning(|_, _| Ok(false));

    let error = service(MockUserRepository::new(), classes)
        .set_class_feedback(Uuid::new_v4(), "please add a syllabus")
        .await
        .expect_err("no such class");
    assert_eq!(error.code(), ErrorCode::NotFound);
}
