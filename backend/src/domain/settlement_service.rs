//! Settlement orchestrator.
//!
//! Converts a confirmed charge plus an enrollment intent into a payment
//! ledger entry, the intent's removal, and a seat decrement — exactly once.
//! Preconditions are checked before any mutation, the write set goes through
//! the atomic [`SettlementUnit`], and the charge reference makes retries
//! replay the original outcome instead of settling twice.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{
    ClassRepository, ClassRepositoryError, IntentRepository, IntentRepositoryError,
    PaymentRepository, PaymentRepositoryError, SettlementUnit, SettlementUnitError,
};
use crate::domain::{ChargeRef, Class, Email, Error, Payment};

/// Commit attempts before a transient store conflict surfaces as `Conflict`.
const MAX_COMMIT_ATTEMPTS: u32 = 3;

fn map_catalog_error(error: ClassRepositoryError) -> Error {
    match error {
        ClassRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("class catalog unavailable: {message}"))
        }
        ClassRepositoryError::Query { message } => {
            Error::internal(format!("class catalog error: {message}"))
        }
    }
}

fn map_intent_error(error: IntentRepositoryError) -> Error {
    match error {
        IntentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("intent store unavailable: {message}"))
        }
        IntentRepositoryError::Query { message } => {
            Error::internal(format!("intent store error: {message}"))
        }
    }
}

fn map_ledger_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("payment ledger unavailable: {message}"))
        }
        PaymentRepositoryError::Query { message } => {
            Error::internal(format!("payment ledger error: {message}"))
        }
    }
}

fn no_seats_error(class: &Class) -> Error {
    Error::no_seats_available(format!("class {} has no remaining seats", class.id)).with_details(
        json!({
            "classId": class.id,
            "availableSeats": class.available_seats,
            "enrolledCount": class.enrolled_count,
        }),
    )
}

/// A settlement request naming an already-confirmed charge.
#[derive(Debug, Clone)]
pub struct SettlementRequest {
    pub student_email: Email,
    pub class_id: Uuid,
    pub intent_id: Uuid,
    pub amount_cents: i64,
    pub charge_ref: ChargeRef,
}

/// Outcome of a settlement, carrying the post-commit seat counters.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementReceipt {
    pub payment: Payment,
    pub available_seats: i32,
    pub enrolled_count: i32,
    /// True when the charge was already settled and the original payment is
    /// being returned instead of a fresh commit.
    pub replayed: bool,
}

/// Orchestrator running the settlement consistency unit.
#[derive(Clone)]
pub struct SettlementService {
    classes: Arc<dyn ClassRepository>,
    intents: Arc<dyn IntentRepository>,
    payments: Arc<dyn PaymentRepository>,
    unit: Arc<dyn SettlementUnit>,
}

impl SettlementService {
    /// Create a settlement service over its collaborating ports.
    pub fn new(
        classes: Arc<dyn ClassRepository>,
        intents: Arc<dyn IntentRepository>,
        payments: Arc<dyn PaymentRepository>,
        unit: Arc<dyn SettlementUnit>,
    ) -> Self {
        Self {
            classes,
            intents,
            payments,
            unit,
        }
    }

    /// Settle a confirmed charge.
    ///
    /// Either every effect applies (payment inserted, intent removed, seat
    /// decremented) or none do. Re-invocation with a charge reference that
    /// already settled returns the original payment with current counters.
    pub async fn settle(&self, request: SettlementRequest) -> Result<SettlementReceipt, Error> {
        if let Some(existing) = self
            .payments
            .find_by_charge_ref(&request.charge_ref)
            .await
            .map_err(map_ledger_error)?
        {
            return self.replay(existing).await;
        }

        // Preconditions before any mutation. The atomic unit re-checks both
        // at commit time; these early reads just give callers clean failures
        // without opening a transaction.
        let class = self
            .classes
            .find_by_id(request.class_id)
            .await
            .map_err(map_catalog_error)?
            .ok_or_else(|| Error::not_found(format!("class {} not found", request.class_id)))?;
        if !class.has_available_seat() {
            return Err(no_seats_error(&class));
        }

        let intent = self
            .intents
            .find_by_id(request.intent_id)
            .await
            .map_err(map_intent_error)?
            .ok_or_else(|| {
                Error::not_found(format!(
                    "enrollment intent {} not found",
                    request.intent_id
                ))
            })?;
        // An intent held by someone else is reported exactly like a missing
        // one, so probing ids cannot confirm an intent exists. The atomic
        // unit folds the same mismatch into its missing-intent failure.
        if intent.student_email != request.student_email {
            return Err(Error::not_found(format!(
                "enrollment intent {} not found",
                request.intent_id
            )));
        }
        if intent.class_id != request.class_id {
            return Err(Error::invalid_request(
                "enrollment intent references a different class",
            ));
        }

        let payment = Payment {
            id: Uuid::new_v4(),
            student_email: request.student_email,
            class_id: request.class_id,
            intent_id: request.intent_id,
            amount_cents: request.amount_cents,
            charge_ref: request.charge_ref,
            created_at: chrono::Utc::now(),
        };

        self.commit_with_retry(payment, &class).await
    }

    async fn commit_with_retry(
        &self,
        payment: Payment,
        class: &Class,
    ) -> Result<SettlementReceipt, Error> {
        let mut attempt = 1;
        loop {
            match self.unit.commit(&payment).await {
                Ok(commit) => {
                    return Ok(SettlementReceipt {
                        payment: commit.payment,
                        available_seats: commit.available_seats,
                        enrolled_count: commit.enrolled_count,
                        replayed: false,
                    });
                }
                Err(SettlementUnitError::SeatsExhausted { .. }) => {
                    // Lost the race for the last seat after the optimistic
                    // precondition read.
                    return Err(no_seats_error(class));
                }
                Err(SettlementUnitError::IntentMissing { intent_id }) => {
                    return Err(Error::not_found(format!(
                        "enrollment intent {intent_id} not found"
                    )));
                }
                Err(SettlementUnitError::DuplicateCharge { charge_ref }) => {
                    // A concurrent retry with the same charge committed
                    // first; replay its outcome.
                    let winner = self
                        .payments
                        .find_by_charge_ref(&payment.charge_ref)
                        .await
                        .map_err(map_ledger_error)?
                        .ok_or_else(|| {
                            Error::internal(format!(
                                "charge {charge_ref} reported settled but has no payment"
                            ))
                        })?;
                    return self.replay(winner).await;
                }
                Err(SettlementUnitError::Retryable { message }) if attempt < MAX_COMMIT_ATTEMPTS => {
                    warn!(attempt, %message, "settlement commit aborted, retrying");
                    attempt += 1;
                }
                Err(SettlementUnitError::Retryable { message }) => {
                    return Err(Error::conflict(format!(
                        "settlement lost to concurrent commits after \
                         {MAX_COMMIT_ATTEMPTS} attempts: {message}"
                    )));
                }
                Err(SettlementUnitError::Connection { message }) => {
                    return Err(Error::service_unavailable(format!(
                        "settlement store unavailable: {message}"
                    )));
                }
                Err(SettlementUnitError::Query { message }) => {
                    return Err(Error::internal(format!("settlement error: {message}")));
                }
            }
        }
    }

    /// Return the original payment for an already-settled charge, with the
    /// class's current counters re-read so the caller can render capacity.
    async fn replay(&self, payment: Payment) -> Result<SettlementReceipt, Error> {
        let class = self
            .classes
            .find_by_id(payment.class_id)
            .await
            .map_err(map_catalog_error)?
            .ok_or_else(|| {
                Error::internal(format!(
                    "settled class {} missing from catalog",
                    payment.class_id
                ))
            })?;
        Ok(SettlementReceipt {
            payment,
            available_seats: class.available_seats,
            enrolled_count: class.enrolled_count,
            replayed: true,
        })
    }
}

#[cfg(test)]
#[path = "settlement_service_tests.rs"]
mod tests;
