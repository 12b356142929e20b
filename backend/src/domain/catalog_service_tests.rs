//! Tests for the class catalog service.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockClassRepository;

fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

fn stored_class(id: Uuid, instructor: &str, status: ApprovalStatus) -> Class {
    Class::new(ClassDraft {
        id,
        title: "Violin for beginners".to_owned(),
        instructor_email: email(instructor),
        image_url: None,
        price_cents: 12_000,
        total_seats: 10,
        available_seats: 10,
        enrolled_count: 0,
        status,
        feedback: None,
        created_at: Utc::now(),
    })
    .expect("valid class")
}

fn submission() -> ClassSubmission {
    ClassSubmission {
        title: "Violin for beginners".to_owned(),
        image_url: Some("https://img.example.com/violin.png".to_owned()),
        price_cents: 12_000,
        total_seats: 10,
    }
}

#[tokio::test]
async fn submission_is_stored_pending_with_full_capacity() {
    let mut classes = MockClassRepository::new();
    classes.expect_insert().times(1).returning(|_| Ok(()));

    let service = CatalogService::new(Arc::new(classes));
    let class = service
        .submit_class(email("ada@example.com"), submission())
        .await
        .expect("submission succeeds");

    assert_eq!(class.status, ApprovalStatus::Pending);
    assert_eq!(class.available_seats, 10);
    assert_eq!(class.enrolled_count, 0);
}

#[tokio::test]
async fn invalid_submission_is_rejected_without_a_write() {
    let mut classes = MockClassRepository::new();
    classes.expect_insert().times(0);

    let service = CatalogService::new(Arc::new(classes));
    let mut bad = submission();
    bad.total_seats = 0;
    let error = service
        .submit_class(email("ada@example.com"), bad)
        .await
        .expect_err("zero seats");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn get_class_maps_missing_row_to_not_found() {
    let mut classes = MockClassRepository::new();
    classes.expect_find_by_id().returning(|_| Ok(None));

    let service = CatalogService::new(Arc::new(classes));
    let error = service
        .get_class(Uuid::new_v4())
        .await
        .expect_err("absent class");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn editing_another_instructors_class_is_forbidden() {
    let id = Uuid::new_v4();
    let mut classes = MockClassRepository::new();
    classes
        .expect_find_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(stored_class(id, "owner@example.com", ApprovalStatus::Pending))));
    classes.expect_update_editable().times(0);

    let service = CatalogService::new(Arc::new(classes));
    let error = service
        .edit_my_class(&email("intruder@example.com"), id, ClassEdit::default())
        .await
        .expect_err("not the owner");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn approved_classes_are_frozen() {
    let id = Uuid::new_v4();
    let mut classes = MockClassRepository::new();
    classes.expect_find_by_id().returning(move |_| {
        Ok(Some(stored_class(
            id,
            "ada@example.com",
            ApprovalStatus::Approved,
        )))
    });
    classes.expect_update_editable().times(0);

    let service = CatalogService::new(Arc::new(classes));
    let error = service
        .edit_my_class(&email("ada@example.com"), id, ClassEdit::default())
        .await
        .expect_err("frozen after approval");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn seat_edit_resets_available_capacity() {
    let id = Uuid::new_v4();
    let mut classes = MockClassRepository::new();
    classes.expect_find_by_id().returning(move |_| {
        Ok(Some(stored_class(
            id,
            "ada@example.com",
            ApprovalStatus::Pending,
        )))
    });
    classes
        .expect_update_editable()
        .withf(|_, _, update| update.total_seats == Some(4) && update.available_seats == Some(4))
        .times(1)
        .returning(|_, _, _| Ok(true));

    let service = CatalogService::new(Arc::new(classes));
    let edit = ClassEdit {
        total_seats: Some(4),
        ..ClassEdit::default()
    };
    service
        .edit_my_class(&email("ada@example.com"), id, edit)
        .await
        .expect("edit succeeds");
}
