//! User directory data model.
//!
//! Users are keyed by email (the identity asserted in bearer tokens). Roles
//! form a closed set checked by the authorization gate rather than ad-hoc
//! string comparisons scattered across handlers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors returned by [`Email::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    Empty,
    MissingAtSign,
    ContainsWhitespace,
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "email must not be empty"),
            Self::MissingAtSign => write!(f, "email must contain an '@' separator"),
            Self::ContainsWhitespace => write!(f, "email must not contain whitespace"),
        }
    }
}

impl std::error::Error for EmailValidationError {}

/// User identity: a validated, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "ada@example.com")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let raw = raw.as_ref();
        if raw.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(EmailValidationError::ContainsWhitespace);
        }
        let (local, domain) = raw
            .split_once('@')
            .ok_or(EmailValidationError::MissingAtSign)?;
        if local.is_empty() || domain.is_empty() {
            return Err(EmailValidationError::MissingAtSign);
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for Email {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Closed set of user roles.
///
/// `Student` is the default granted at first login; `Instructor` and `Admin`
/// are assigned only through role administration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    /// Stable string form stored in the user directory.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "instructor" => Ok(Self::Instructor),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// A record in the user directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identity; never changes once created.
    pub email: Email,
    /// Human-readable display name captured at registration.
    pub display_name: String,
    /// Current role; read fresh on every authorization decision.
    pub role: Role,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}
