//! Class catalog data model.
//!
//! The seat counters are the only shared mutable state in the system. The
//! invariant `available + enrolled == total` with `0 <= available <= total`
//! is established here at construction and preserved by the settlement unit,
//! which mutates counters only through a guarded decrement.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::Email;

/// Approval lifecycle of a class submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Denied,
}

impl ApprovalStatus {
    /// Stable string form stored in the catalog.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown approval status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownApprovalStatus(pub String);

impl fmt::Display for UnknownApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown approval status: {}", self.0)
    }
}

impl std::error::Error for UnknownApprovalStatus {}

impl FromStr for ApprovalStatus {
    type Err = UnknownApprovalStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            other => Err(UnknownApprovalStatus(other.to_owned())),
        }
    }
}

/// Validation errors returned by [`Class::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassValidationError {
    EmptyTitle,
    NegativePrice,
    ZeroSeats,
    SeatCountersInconsistent {
        total: i32,
        available: i32,
        enrolled: i32,
    },
}

impl fmt::Display for ClassValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "class title must not be empty"),
            Self::NegativePrice => write!(f, "class price must not be negative"),
            Self::ZeroSeats => write!(f, "class must have at least one seat"),
            Self::SeatCountersInconsistent {
                total,
                available,
                enrolled,
            } => write!(
                f,
                "seat counters must satisfy available + enrolled == total \
                 (total={total}, available={available}, enrolled={enrolled})"
            ),
        }
    }
}

impl std::error::Error for ClassValidationError {}

/// Unvalidated field bundle used to construct a [`Class`].
#[derive(Debug, Clone)]
pub struct ClassDraft {
    pub id: Uuid,
    pub title: String,
    pub instructor_email: Email,
    pub image_url: Option<String>,
    pub price_cents: i64,
    pub total_seats: i32,
    pub available_seats: i32,
    pub enrolled_count: i32,
    pub status: ApprovalStatus,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A class in the catalog.
///
/// Constructed only through [`Class::new`], which enforces the seat-counter
/// invariant; rows loaded from the store go through the same validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: Uuid,
    pub title: String,
    pub instructor_email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub price_cents: i64,
    pub total_seats: i32,
    pub available_seats: i32,
    pub enrolled_count: i32,
    pub status: ApprovalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Class {
    /// Validate and construct a [`Class`] from a draft.
    pub fn new(draft: ClassDraft) -> Result<Self, ClassValidationError> {
        let ClassDraft {
            id,
            title,
            instructor_email,
            image_url,
            price_cents,
            total_seats,
            available_seats,
            enrolled_count,
            status,
            feedback,
            created_at,
        } = draft;

        if title.trim().is_empty() {
            return Err(ClassValidationError::EmptyTitle);
        }
        if price_cents < 0 {
            return Err(ClassValidationError::NegativePrice);
        }
        if total_seats < 1 {
            return Err(ClassValidationError::ZeroSeats);
        }
        if available_seats < 0
            || available_seats > total_seats
            || available_seats + enrolled_count != total_seats
        {
            return Err(ClassValidationError::SeatCountersInconsistent {
                total: total_seats,
                available: available_seats,
                enrolled: enrolled_count,
            });
        }

        Ok(Self {
            id,
            title,
            instructor_email,
            image_url,
            price_cents,
            total_seats,
            available_seats,
            enrolled_count,
            status,
            feedback,
            created_at,
        })
    }

    /// Whether a settlement could currently reserve a seat.
    #[must_use]
    pub fn has_available_seat(&self) -> bool {
        self.available_seats >= 1
    }
}
