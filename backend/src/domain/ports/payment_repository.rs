//! Port abstraction for the payment ledger.
//!
//! The ledger is append-only and written exclusively by the settlement unit;
//! this port only exposes the reads the orchestrator needs.

use async_trait::async_trait;

use crate::domain::{ChargeRef, Email, Payment};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment ledger adapters.
    pub enum PaymentRepositoryError {
        /// Ledger connection could not be established.
        Connection { message: String } => "payment ledger connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "payment ledger query failed: {message}",
    }
}

/// Port for payment ledger reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Look up the payment settled for a charge reference, if any.
    ///
    /// This is the idempotency probe: a hit means the charge was already
    /// settled and the original outcome must be replayed.
    async fn find_by_charge_ref(
        &self,
        charge_ref: &ChargeRef,
    ) -> Result<Option<Payment>, PaymentRepositoryError>;

    /// List a student's payments, most recent first.
    async fn list_for_student(
        &self,
        email: &Email,
    ) -> Result<Vec<Payment>, PaymentRepositoryError>;
}
