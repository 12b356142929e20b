//! Class catalog use-cases.
//!
//! Instructors submit and edit their own classes; everyone may browse the
//! catalog. Approval and feedback live in role administration; seat counters
//! are settlement's alone.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{ClassRepository, ClassRepositoryError, ClassUpdate};
use crate::domain::{ApprovalStatus, Class, ClassDraft, Email, Error};

fn map_repository_error(error: ClassRepositoryError) -> Error {
    match error {
        ClassRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("class catalog unavailable: {message}"))
        }
        ClassRepositoryError::Query { message } => {
            Error::internal(format!("class catalog error: {message}"))
        }
    }
}

/// New class submission from an instructor.
#[derive(Debug, Clone)]
pub struct ClassSubmission {
    pub title: String,
    pub image_url: Option<String>,
    pub price_cents: i64,
    pub total_seats: i32,
}

/// Instructor edit of an existing, still pending class.
#[derive(Debug, Clone, Default)]
pub struct ClassEdit {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price_cents: Option<i64>,
    pub total_seats: Option<i32>,
}

/// Catalog service over the class repository.
#[derive(Clone)]
pub struct CatalogService {
    classes: Arc<dyn ClassRepository>,
}

impl CatalogService {
    /// Create a catalog service with the class repository.
    pub fn new(classes: Arc<dyn ClassRepository>) -> Self {
        Self { classes }
    }

    /// Submit a new class. Status is forced to pending regardless of input.
    pub async fn submit_class(
        &self,
        instructor_email: Email,
        submission: ClassSubmission,
    ) -> Result<Class, Error> {
        let total_seats = submission.total_seats;
        let class = Class::new(ClassDraft {
            id: Uuid::new_v4(),
            title: submission.title,
            instructor_email,
            image_url: submission.image_url,
            price_cents: submission.price_cents,
            total_seats,
            available_seats: total_seats,
            enrolled_count: 0,
            status: ApprovalStatus::Pending,
            feedback: None,
            created_at: Utc::now(),
        })
        .map_err(|err| Error::invalid_request(format!("invalid class submission: {err}")))?;

        self.classes
            .insert(&class)
            .await
            .map_err(map_repository_error)?;
        Ok(class)
    }

    /// List all classes, most enrolled first.
    pub async fn list_classes(&self) -> Result<Vec<Class>, Error> {
        self.classes
            .list_by_enrollment()
            .await
            .map_err(map_repository_error)
    }

    /// Point lookup for a class.
    pub async fn get_class(&self, id: Uuid) -> Result<Class, Error> {
        self.classes
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("class {id} not found")))
    }

    /// List the classes owned by the calling instructor.
    pub async fn list_my_classes(&self, instructor_email: &Email) -> Result<Vec<Class>, Error> {
        self.classes
            .list_by_instructor(instructor_email)
            .await
            .map_err(map_repository_error)
    }

    /// Edit a class the instructor owns.
    ///
    /// Only pending classes are editable; once approved for booking, the
    /// catalog fields freeze and the seat counters belong to settlement.
    pub async fn edit_my_class(
        &self,
        instructor_email: &Email,
        id: Uuid,
        edit: ClassEdit,
    ) -> Result<Class, Error> {
        let current = self.get_class(id).await?;
        if current.instructor_email != *instructor_email {
            return Err(Error::forbidden("class belongs to another instructor"));
        }
        if current.status != ApprovalStatus::Pending {
            return Err(Error::conflict(format!(
                "class {id} is {} and no longer editable",
                current.status
            )));
        }

        if let Some(title) = &edit.title
            && title.trim().is_empty()
        {
            return Err(Error::invalid_request("class title must not be empty"));
        }
        if let Some(price_cents) = edit.price_cents
            && price_cents < 0
        {
            return Err(Error::invalid_request("class price must not be negative"));
        }
        if let Some(total_seats) = edit.total_seats
            && total_seats < 1
        {
            return Err(Error::invalid_request("class must have at least one seat"));
        }

        // Pending classes have no enrollments, so a seat change resets the
        // whole capacity.
        let available_seats = edit.total_seats;
        let updated = self
            .classes
            .update_editable(
                id,
                instructor_email,
                ClassUpdate {
                    title: edit.title,
                    image_url: edit.image_url,
                    price_cents: edit.price_cents,
                    total_seats: edit.total_seats,
                    available_seats,
                },
            )
            .await
            .map_err(map_repository_error)?;
        if !updated {
            return Err(Error::not_found(format!("class {id} not found")));
        }
        self.get_class(id).await
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
