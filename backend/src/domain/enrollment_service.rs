//! Enrollment intent lifecycle.
//!
//! Creation is deliberately open (the storefront lets anonymous visitors
//! pencil in a class); reading or cancelling a specific student's intents is
//! scoped to that student's verified identity.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::ports::{Identity, IntentRepository, IntentRepositoryError};
use crate::domain::{Email, EnrollmentIntent, Error};

fn map_repository_error(error: IntentRepositoryError) -> Error {
    match error {
        IntentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("intent store unavailable: {message}"))
        }
        IntentRepositoryError::Query { message } => {
            Error::internal(format!("intent store error: {message}"))
        }
    }
}

/// Enrollment intent service over the intent repository.
#[derive(Clone)]
pub struct EnrollmentService {
    intents: Arc<dyn IntentRepository>,
}

impl EnrollmentService {
    /// Create an enrollment service with the intent repository.
    pub fn new(intents: Arc<dyn IntentRepository>) -> Self {
        Self { intents }
    }

    /// Record a student's tentative class selection.
    ///
    /// Duplicate (student, class) intents are allowed; settlement validates
    /// the specific intent it is handed, so correctness never depends on
    /// uniqueness here.
    pub async fn create_intent(
        &self,
        student_email: Email,
        class_id: Uuid,
    ) -> Result<EnrollmentIntent, Error> {
        let intent = EnrollmentIntent::new(student_email, class_id);
        self.intents
            .insert(&intent)
            .await
            .map_err(map_repository_error)?;
        Ok(intent)
    }

    /// List a student's live intents.
    ///
    /// The caller's verified identity must match the queried student.
    pub async fn list_intents(
        &self,
        caller: &Identity,
        student_email: &Email,
    ) -> Result<Vec<EnrollmentIntent>, Error> {
        if caller.email != *student_email {
            return Err(Error::forbidden(
                "intents may only be listed by their owner",
            ));
        }
        self.intents
            .list_for_student(student_email)
            .await
            .map_err(map_repository_error)
    }

    /// Point lookup for an intent.
    pub async fn get_intent(&self, id: Uuid) -> Result<EnrollmentIntent, Error> {
        self.intents
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("enrollment intent {id} not found")))
    }

    /// Cancel an intent.
    ///
    /// Cancelling one that settlement already consumed is `NotFound`, never
    /// a seat-count change.
    pub async fn delete_intent(&self, id: Uuid) -> Result<(), Error> {
        let removed = self
            .intents
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "enrollment intent {id} not found"
            )))
        }
    }
}

#[cfg(test)]
#[path = "enrollment_service_tests.rs"]
mod tests;
