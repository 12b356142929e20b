//! Domain entities, services, and ports.
//!
//! Everything here is transport and storage agnostic: entities validate
//! their own invariants, services implement the use-cases over ports, and
//! adapters live in `outbound`/`inbound`.

pub mod auth;
pub mod catalog_service;
pub mod class;
pub mod enrollment;
pub mod enrollment_service;
pub mod error;
pub mod payment;
pub mod ports;
pub mod role_admin_service;
pub mod settlement_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{AuthorizationGate, Capability};
pub use self::catalog_service::{CatalogService, ClassEdit, ClassSubmission};
pub use self::class::{ApprovalStatus, Class, ClassDraft, ClassValidationError};
pub use self::enrollment::EnrollmentIntent;
pub use self::enrollment_service::EnrollmentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::payment::{ChargeRef, ChargeRefValidationError, Payment};
pub use self::role_admin_service::RoleAdminService;
pub use self::settlement_service::{SettlementReceipt, SettlementRequest, SettlementService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, EmailValidationError, Role, User};
