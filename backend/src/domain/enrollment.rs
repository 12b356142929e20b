//! Enrollment intent data model.
//!
//! An intent records a student's tentative selection of a class before
//! payment. It is a reservation *attempt*: creating one never decrements
//! seats, and it is consumed exactly once by settlement or removed by
//! cancellation. Duplicate (student, class) intents are permitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::Email;

/// A student's unpaid reservation record for a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentIntent {
    pub id: Uuid,
    pub student_email: Email,
    pub class_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl EnrollmentIntent {
    /// Construct a fresh intent for a class selection.
    #[must_use]
    pub fn new(student_email: Email, class_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_email,
            class_id,
            created_at: Utc::now(),
        }
    }
}
