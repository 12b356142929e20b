//! Persistence adapters for the marketplace store.

pub mod diesel_class_repository;
pub mod diesel_error_mapping;
pub mod diesel_intent_repository;
pub mod diesel_payment_repository;
pub mod diesel_settlement_unit;
pub mod diesel_user_repository;
pub mod memory;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_class_repository::DieselClassRepository;
pub use diesel_intent_repository::DieselIntentRepository;
pub use diesel_payment_repository::DieselPaymentRepository;
pub use diesel_settlement_unit::DieselSettlementUnit;
pub use diesel_user_repository::DieselUserRepository;
pub use memory::MemoryStore;
pub use pool::{DbPool, PoolConfig, PoolError};
