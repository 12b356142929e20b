//! Port abstraction for the external charge-intent provider.
//!
//! The service only ever *creates* charge intents; confirmation happens
//! client-side and comes back as an already-confirmed charge reference, so
//! settlement never polls the gateway.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment gateway adapters. Gateway failures are
    /// propagated to the caller, never retried here.
    pub enum PaymentGatewayError {
        /// The gateway could not be reached.
        Connection { message: String } => "payment gateway unreachable: {message}",
        /// The gateway rejected the request or returned an error payload.
        Rejected { message: String } => "payment gateway rejected the charge intent: {message}",
        /// The gateway response could not be decoded.
        Protocol { message: String } => "payment gateway protocol error: {message}",
    }
}

/// A freshly created charge intent awaiting client-side confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeIntent {
    /// Secret handed to the client so it can confirm the charge.
    pub client_secret: String,
}

/// Port for creating charge intents with the external provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a charge intent for the given amount.
    async fn create_charge_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<ChargeIntent, PaymentGatewayError>;
}

/// Fixture gateway for tests and runs without provider credentials.
///
/// Returns a deterministic client secret derived from the amount.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentGateway;

#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn create_charge_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<ChargeIntent, PaymentGatewayError> {
        Ok(ChargeIntent {
            client_secret: format!("fixture_secret_{currency}_{amount_cents}"),
        })
    }
}
