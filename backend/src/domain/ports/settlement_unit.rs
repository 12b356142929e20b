//! Port abstraction for the atomic settlement commit.
//!
//! Implementations must apply the payment insert, the intent delete, and the
//! seat-counter update as one all-or-nothing unit with respect to concurrent
//! settlements on the same class. The seat decrement must be a store-level
//! conditional update ("decrement only while at least one seat remains"), not
//! a read-then-write, so two settlers racing for the last seat cannot both
//! commit.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Payment;

use super::define_port_error;

define_port_error! {
    /// Errors raised by settlement unit adapters.
    pub enum SettlementUnitError {
        /// Store connection could not be established.
        Connection { message: String } => "settlement store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "settlement query failed: {message}",
        /// The guarded seat decrement matched no row: the class is either
        /// absent or out of seats. The transaction was rolled back.
        SeatsExhausted { class_id: Uuid } => "class {class_id} has no remaining seats",
        /// The referenced intent no longer exists (already settled or
        /// cancelled). The transaction was rolled back.
        IntentMissing { intent_id: Uuid } => "enrollment intent {intent_id} not found",
        /// Another settlement already recorded this charge reference. The
        /// transaction was rolled back; the caller should replay the winner's
        /// payment.
        DuplicateCharge { charge_ref: String } => "charge {charge_ref} was already settled",
        /// The store aborted the transaction for transient concurrency
        /// reasons; the commit may be retried.
        Retryable { message: String } => "settlement transaction aborted, retryable: {message}",
    }
}

/// Result of a committed settlement, carrying the post-commit counters so
/// the caller can render capacity without a second read.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementCommit {
    pub payment: Payment,
    pub available_seats: i32,
    pub enrolled_count: i32,
}

/// Port executing the settlement write set atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettlementUnit: Send + Sync {
    /// Atomically insert `payment`, remove its intent, and decrement the
    /// class's available seats while incrementing its enrolled count.
    ///
    /// On any error no partial state remains: there is never a payment
    /// without a seat decrement, nor a seat decrement without a payment.
    async fn commit(&self, payment: &Payment) -> Result<SettlementCommit, SettlementUnitError>;
}
