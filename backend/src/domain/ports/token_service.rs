//! Port abstraction for signed identity assertions.

use crate::domain::Email;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token service adapters.
    ///
    /// `Invalid` and `Expired` are distinct because callers surface them as
    /// different failure kinds.
    pub enum TokenServiceError {
        /// The token signature or shape is invalid.
        Invalid { message: String } => "invalid token: {message}",
        /// The token is past its validity window.
        Expired => "token expired",
        /// Signing failed while issuing a token.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Verified identity claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Subject of the assertion: the user's email.
    pub email: Email,
    /// Display name claim captured at issue time, if any.
    pub display_name: Option<String>,
}

impl Identity {
    /// Construct an identity for the given email with no extra claims.
    #[must_use]
    pub fn new(email: Email) -> Self {
        Self {
            email,
            display_name: None,
        }
    }
}

/// Port issuing and verifying time-bounded identity tokens.
///
/// Token operations are pure computation over a signing secret; no I/O is
/// involved, so the trait is synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a signed, time-bounded token for the identity.
    fn issue(&self, identity: &Identity) -> Result<String, TokenServiceError>;

    /// Verify a token and return the identity it asserts.
    fn verify(&self, token: &str) -> Result<Identity, TokenServiceError>;
}
