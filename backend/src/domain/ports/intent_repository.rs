//! Port abstraction for enrollment intent storage.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Email, EnrollmentIntent};

use super::define_port_error;

define_port_error! {
    /// Errors raised by enrollment intent adapters.
    pub enum IntentRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "intent store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "intent store query failed: {message}",
    }
}

/// Port for enrollment intent storage and retrieval.
///
/// Deletion through this port serves manual cancellation; settlement removes
/// the intent inside its own atomic unit instead.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntentRepository: Send + Sync {
    /// Insert a new intent. Duplicates per (student, class) are permitted.
    async fn insert(&self, intent: &EnrollmentIntent) -> Result<(), IntentRepositoryError>;

    /// Point lookup by identifier.
    async fn find_by_id(&self, id: Uuid)
    -> Result<Option<EnrollmentIntent>, IntentRepositoryError>;

    /// List all live intents for a student.
    async fn list_for_student(
        &self,
        email: &Email,
    ) -> Result<Vec<EnrollmentIntent>, IntentRepositoryError>;

    /// Delete an intent. Returns `false` when it was already gone.
    async fn delete(&self, id: Uuid) -> Result<bool, IntentRepositoryError>;
}
