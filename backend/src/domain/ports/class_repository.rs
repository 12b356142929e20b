//! Port abstraction for the class catalog.
//!
//! Catalog writes here follow single-document last-writer-wins semantics;
//! they are authorization-restricted and not contended by design. The seat
//! counters are deliberately *not* writable through this port — only the
//! settlement unit mutates them, atomically.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ApprovalStatus, Class, Email};

use super::define_port_error;

define_port_error! {
    /// Errors raised by class catalog adapters.
    pub enum ClassRepositoryError {
        /// Catalog connection could not be established.
        Connection { message: String } => "class catalog connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "class catalog query failed: {message}",
    }
}

/// Editable fields an instructor may change on a pending class.
///
/// `None` leaves the stored value untouched. Seat counters are recomputed by
/// the catalog service before the update reaches this port.
#[derive(Debug, Clone, Default)]
pub struct ClassUpdate {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price_cents: Option<i64>,
    pub total_seats: Option<i32>,
    pub available_seats: Option<i32>,
}

/// Port for class catalog storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassRepository: Send + Sync {
    /// Insert a freshly submitted class.
    async fn insert(&self, class: &Class) -> Result<(), ClassRepositoryError>;

    /// Point lookup by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Class>, ClassRepositoryError>;

    /// List all classes ordered by enrolled count, most popular first.
    async fn list_by_enrollment(&self) -> Result<Vec<Class>, ClassRepositoryError>;

    /// List the classes owned by an instructor.
    async fn list_by_instructor(&self, email: &Email) -> Result<Vec<Class>, ClassRepositoryError>;

    /// Apply an instructor edit to a class they own.
    ///
    /// Returns `false` when no class matches the (id, instructor) pair.
    async fn update_editable(
        &self,
        id: Uuid,
        instructor_email: &Email,
        update: ClassUpdate,
    ) -> Result<bool, ClassRepositoryError>;

    /// Set the approval status. Returns `false` when the class is absent.
    async fn set_status(
        &self,
        id: Uuid,
        status: ApprovalStatus,
    ) -> Result<bool, ClassRepositoryError>;

    /// Set the admin feedback text. Returns `false` when the class is absent.
    async fn set_feedback(&self, id: Uuid, feedback: &str)
    -> Result<bool, ClassRepositoryError>;
}
