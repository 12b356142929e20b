//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{PaymentGateway, PaymentRepository, TokenService, UserRepository};
use crate::domain::{
    AuthorizationGate, CatalogService, EnrollmentService, RoleAdminService, SettlementService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub gate: AuthorizationGate,
    pub catalog: CatalogService,
    pub enrollment: EnrollmentService,
    pub role_admin: RoleAdminService,
    pub settlement: SettlementService,
    pub tokens: Arc<dyn TokenService>,
    pub users: Arc<dyn UserRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
}
