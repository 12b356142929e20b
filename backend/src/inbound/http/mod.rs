//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod bearer;
pub mod classes;
pub mod error;
pub mod health;
pub mod intents;
pub mod payments;
pub mod state;
pub mod users;
pub mod validation;

pub use error::ApiResult;
