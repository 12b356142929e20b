//! Payment ledger data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::Email;

/// Validation errors returned by [`ChargeRef::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeRefValidationError {
    Empty,
}

impl fmt::Display for ChargeRefValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "charge reference must not be empty"),
        }
    }
}

impl std::error::Error for ChargeRefValidationError {}

/// Opaque reference to a charge already confirmed by the payment gateway.
///
/// Uniqueness of this value in the payment ledger is what makes settlement
/// idempotent: a retry with the same reference finds the original payment
/// instead of creating a second one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "pi_3MtwBwLkdIwHu7ix28a3tqPa")]
pub struct ChargeRef(String);

impl ChargeRef {
    /// Validate and construct a [`ChargeRef`].
    pub fn new(raw: impl Into<String>) -> Result<Self, ChargeRefValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ChargeRefValidationError::Empty);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ChargeRef {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ChargeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for ChargeRef {
    type Error = ChargeRefValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChargeRef> for String {
    fn from(value: ChargeRef) -> Self {
        value.0
    }
}

/// An immutable settlement ledger entry.
///
/// Created exactly once per successful settlement; never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub student_email: Email,
    pub class_id: Uuid,
    pub intent_id: Uuid,
    pub amount_cents: i64,
    pub charge_ref: ChargeRef,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_charge_ref_is_rejected() {
        assert_eq!(ChargeRef::new("  "), Err(ChargeRefValidationError::Empty));
    }

    #[test]
    fn charge_ref_preserves_raw_value() {
        let charge = ChargeRef::new("pi_123").expect("valid charge ref");
        assert_eq!(charge.as_ref(), "pi_123");
    }
}
