//! Tests for the settlement orchestrator.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    MockClassRepository, MockIntentRepository, MockPaymentRepository, MockSettlementUnit,
    SettlementCommit,
};
use crate::domain::{ApprovalStatus, ClassDraft, EnrollmentIntent, ErrorCode};

fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

fn class_with_seats(id: Uuid, available: i32, enrolled: i32) -> Class {
    Class::new(ClassDraft {
        id,
        title: "Violin for beginners".to_owned(),
        instructor_email: email("ada@example.com"),
        image_url: None,
        price_cents: 12_000,
        total_seats: available + enrolled,
        available_seats: available,
        enrolled_count: enrolled,
        status: ApprovalStatus::Approved,
        feedback: None,
        created_at: Utc::now(),
    })
    .expect("valid class")
}

struct Fixture {
    class_id: Uuid,
    intent_id: Uuid,
    classes: MockClassRepository,
    intents: MockIntentRepository,
    payments: MockPaymentRepository,
    unit: MockSettlementUnit,
}

impl Fixture {
    fn new() -> Self {
        Self {
            class_id: Uuid::new_v4(),
            intent_id: Uuid::new_v4(),
            classes: MockClassRepository::new(),
            intents: MockIntentRepository::new(),
            payments: MockPaymentRepository::new(),
            unit: MockSettlementUnit::new(),
        }
    }

    fn request(&self) -> SettlementRequest {
        SettlementRequest {
            student_email: email("student@example.com"),
            class_id: self.class_id,
            intent_id: self.intent_id,
            amount_cents: 12_000,
            charge_ref: ChargeRef::new("pi_123").expect("valid charge ref"),
        }
    }

    fn intent(&self) -> EnrollmentIntent {
        EnrollmentIntent {
            id: self.intent_id,
            student_email: email("student@example.com"),
            class_id: self.class_id,
            created_at: Utc::now(),
        }
    }

    fn with_fresh_charge(mut self) -> Self {
        self.payments
            .expect_find_by_charge_ref()
            .returning(|_| Ok(None));
        self
    }

    fn with_class(mut self, available: i32, enrolled: i32) -> Self {
        let class_id = self.class_id;
        self.classes
            .expect_find_by_id()
            .with(eq(class_id))
            .returning(move |_| Ok(Some(class_with_seats(class_id, available, enrolled))));
        self
    }

    fn with_intent(mut self) -> Self {
        let intent = self.intent();
        self.intents
            .expect_find_by_id()
            .with(eq(self.intent_id))
            .returning(move |_| Ok(Some(intent.clone())));
        self
    }

    fn service(self) -> SettlementService {
        SettlementService::new(
            Arc::new(self.classes),
            Arc::new(self.intents),
            Arc::new(self.payments),
            Arc::new(self.unit),
        )
    }
}

fn commit_for(payment: &Payment, available: i32, enrolled: i32) -> SettlementCommit {
    SettlementCommit {
        payment: payment.clone(),
        available_seats: available,
        enrolled_count: enrolled,
    }
}

#[tokio::test]
async fn successful_settlement_returns_new_counters() {
    let mut fixture = Fixture::new().with_fresh_charge().with_class(1, 2);
    fixture = fixture.with_intent();
    fixture
        .unit
        .expect_commit()
        .times(1)
        .returning(|payment| Ok(commit_for(payment, 0, 3)));
    let request = fixture.request();

    let receipt = fixture
        .service()
        .settle(request)
        .await
        .expect("settlement succeeds");

    assert_eq!(receipt.available_seats, 0);
    assert_eq!(receipt.enrolled_count, 3);
    assert!(!receipt.replayed);
    assert_eq!(receipt.payment.charge_ref.as_ref(), "pi_123");
}

#[tokio::test]
async fn exhausted_class_fails_before_any_mutation() {
    let mut fixture = Fixture::new().with_fresh_charge().with_class(0, 3);
    fixture.intents.expect_find_by_id().times(0);
    fixture.unit.expect_commit().times(0);
    let request = fixture.request();

    let error = fixture
        .service()
        .settle(request)
        .await
        .expect_err("no seats");
    assert_eq!(error.code(), ErrorCode::NoSeatsAvailable);
}

#[tokio::test]
async fn missing_intent_fails_before_commit() {
    let mut fixture = Fixture::new().with_fresh_charge().with_class(1, 2);
    fixture.intents.expect_find_by_id().returning(|_| Ok(None));
    fixture.unit.expect_commit().times(0);
    let request = fixture.request();

    let error = fixture
        .service()
        .settle(request)
        .await
        .expect_err("intent gone");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn intent_owned_by_someone_else_reads_as_missing() {
    let mut fixture = Fixture::new().with_fresh_charge().with_class(1, 2);
    let class_id = fixture.class_id;
    let intent_id = fixture.intent_id;
    fixture.intents.expect_find_by_id().returning(move |_| {
        Ok(Some(EnrollmentIntent {
            id: intent_id,
            student_email: email("other@example.com"),
            class_id,
            created_at: Utc::now(),
        }))
    });
    fixture.unit.expect_commit().times(0);
    let request = fixture.request();

    let error = fixture
        .service()
        .settle(request)
        .await
        .expect_err("wrong owner");
    assert_eq!(error.code(), ErrorCode::NotFound);
    // Same code and message shape as a genuinely absent intent.
    assert!(error.message().contains(&intent_id.to_string()));
}

#[tokio::test]
async fn replay_returns_original_payment_without_committing() {
    let mut fixture = Fixture::new();
    let class_id = fixture.class_id;
    let original = Payment {
        id: Uuid::new_v4(),
        student_email: email("student@example.com"),
        class_id,
        intent_id: fixture.intent_id,
        amount_cents: 12_000,
        charge_ref: ChargeRef::new("pi_123").expect("valid charge ref"),
        created_at: Utc::now(),
    };
    let replayed = original.clone();
    fixture
        .payments
        .expect_find_by_charge_ref()
        .returning(move |_| Ok(Some(replayed.clone())));
    fixture
        .classes
        .expect_find_by_id()
        .returning(move |_| Ok(Some(class_with_seats(class_id, 0, 3))));
    fixture.unit.expect_commit().times(0);
    let request = fixture.request();

    let receipt = fixture
        .service()
        .settle(request)
        .await
        .expect("replay succeeds");
    assert!(receipt.replayed);
    assert_eq!(receipt.payment.id, original.id);
    assert_eq!(receipt.available_seats, 0);
}

#[tokio::test]
async fn losing_the_last_seat_at_commit_surfaces_no_seats() {
    let mut fixture = Fixture::new().with_fresh_charge().with_class(1, 2);
    fixture = fixture.with_intent();
    let class_id = fixture.class_id;
    fixture
        .unit
        .expect_commit()
        .times(1)
        .returning(move |_| Err(SettlementUnitError::seats_exhausted(class_id)));
    let request = fixture.request();

    let error = fixture
        .service()
        .settle(request)
        .await
        .expect_err("commit-time recheck fails");
    assert_eq!(error.code(), ErrorCode::NoSeatsAvailable);
}

#[tokio::test]
async fn transient_conflicts_are_retried_then_surface_conflict() {
    let mut fixture = Fixture::new().with_fresh_charge().with_class(1, 2);
    fixture = fixture.with_intent();
    fixture
        .unit
        .expect_commit()
        .times(3)
        .returning(|_| Err(SettlementUnitError::retryable("serialization failure")));
    let request = fixture.request();

    let error = fixture
        .service()
        .settle(request)
        .await
        .expect_err("retries exhausted");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn transient_conflict_then_success_settles() {
    let mut fixture = Fixture::new().with_fresh_charge().with_class(1, 2);
    fixture = fixture.with_intent();
    let mut calls = 0;
    fixture.unit.expect_commit().times(2).returning(move |payment| {
        calls += 1;
        if calls == 1 {
            Err(SettlementUnitError::retryable("serialization failure"))
        } else {
            Ok(commit_for(payment, 0, 3))
        }
    });
    let request = fixture.request();

    let receipt = fixture
        .service()
        .settle(request)
        .await
        .expect("second attempt succeeds");
    assert_eq!(receipt.available_seats, 0);
}

#[tokio::test]
async fn duplicate_charge_at_commit_replays_the_winner() {
    let mut fixture = Fixture::new().with_class(1, 2);
    fixture = fixture.with_intent();
    let class_id = fixture.class_id;
    let winner = Payment {
        id: Uuid::new_v4(),
        student_email: email("student@example.com"),
        class_id,
        intent_id: fixture.intent_id,
        amount_cents: 12_000,
        charge_ref: ChargeRef::new("pi_123").expect("valid charge ref"),
        created_at: Utc::now(),
    };
    let winner_id = winner.id;
    // First ledger probe misses; after the unit reports the duplicate, the
    // second probe finds the winner.
    let mut probes = 0;
    fixture
        .payments
        .expect_find_by_charge_ref()
        .returning(move |_| {
            probes += 1;
            if probes == 1 {
                Ok(None)
            } else {
                Ok(Some(winner.clone()))
            }
        });
    fixture
        .unit
        .expect_commit()
        .times(1)
        .returning(|payment| Err(SettlementUnitError::duplicate_charge(
            payment.charge_ref.as_ref(),
        )));
    let request = fixture.request();

    let receipt = fixture
        .service()
        .settle(request)
        .await
        .expect("winner replayed");
    assert!(receipt.replayed);
    assert_eq!(receipt.payment.id, winner_id);
}
