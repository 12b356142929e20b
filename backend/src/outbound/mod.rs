//! Outbound adapters: persistence, authentication, and the payment gateway.

pub mod auth;
pub mod payments;
pub mod persistence;
