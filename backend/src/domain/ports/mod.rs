//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod class_repository;
mod intent_repository;
mod payment_gateway;
mod payment_repository;
mod settlement_unit;
mod token_service;
mod user_repository;

#[cfg(test)]
pub use class_repository::MockClassRepository;
pub use class_repository::{ClassRepository, ClassRepositoryError, ClassUpdate};
#[cfg(test)]
pub use intent_repository::MockIntentRepository;
pub use intent_repository::{IntentRepository, IntentRepositoryError};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{
    ChargeIntent, FixturePaymentGateway, PaymentGateway, PaymentGatewayError,
};
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{PaymentRepository, PaymentRepositoryError};
#[cfg(test)]
pub use settlement_unit::MockSettlementUnit;
pub use settlement_unit::{SettlementCommit, SettlementUnit, SettlementUnitError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{Identity, TokenService, TokenServiceError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
