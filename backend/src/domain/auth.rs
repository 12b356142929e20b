//! Authorization gate.
//!
//! Every privileged mutation goes through [`AuthorizationGate::authorize`]:
//! verify the bearer token, then check the caller's role in the user
//! directory against the required capability. The directory is read on every
//! call — roles are never cached, because role administration can change
//! them between requests.

use std::sync::Arc;

use crate::domain::ports::{
    Identity, TokenService, TokenServiceError, UserRepository, UserRepositoryError,
};
use crate::domain::{Email, Error, Role};

/// Permission level required to invoke an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any verified identity suffices.
    Authenticated,
    /// Caller must hold the instructor role.
    Instructor,
    /// Caller must hold the admin role.
    Admin,
}

fn map_token_error(error: TokenServiceError) -> Error {
    match error {
        TokenServiceError::Invalid { message } => {
            Error::invalid_token(format!("token rejected: {message}"))
        }
        TokenServiceError::Expired => Error::expired_token("token past its validity window"),
        TokenServiceError::Signing { message } => {
            Error::internal(format!("token signing failure during verify: {message}"))
        }
    }
}

fn map_directory_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

/// Gate combining token verification with a fresh directory role check.
#[derive(Clone)]
pub struct AuthorizationGate {
    tokens: Arc<dyn TokenService>,
    users: Arc<dyn UserRepository>,
}

impl AuthorizationGate {
    /// Create a gate over the token service and user directory.
    pub fn new(tokens: Arc<dyn TokenService>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    /// Authorize a request carrying an optional bearer token.
    ///
    /// Token failures propagate unchanged as their distinct kinds
    /// (`MissingToken`, `InvalidToken`, `ExpiredToken`); a verified caller
    /// lacking the required role fails `Forbidden`.
    pub async fn authorize(
        &self,
        bearer: Option<&str>,
        capability: Capability,
    ) -> Result<Identity, Error> {
        let token = bearer.ok_or_else(|| Error::missing_token("bearer token required"))?;
        let identity = self.tokens.verify(token).map_err(map_token_error)?;

        let required = match capability {
            Capability::Authenticated => return Ok(identity),
            Capability::Instructor => Role::Instructor,
            Capability::Admin => Role::Admin,
        };

        let user = self
            .users
            .find_by_email(&identity.email)
            .await
            .map_err(map_directory_error)?;

        match user {
            Some(user) if user.role == required => Ok(identity),
            _ => Err(Error::forbidden(format!(
                "caller lacks the {required} role"
            ))),
        }
    }

    /// Self-scoped role query: "does `email` hold `role`?".
    ///
    /// This is how clients discover their own role, so an identity/path
    /// mismatch yields a negative answer rather than an error.
    pub async fn holds_role(
        &self,
        identity: &Identity,
        email: &Email,
        role: Role,
    ) -> Result<bool, Error> {
        if identity.email != *email {
            return Ok(false);
        }
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_directory_error)?;
        Ok(user.is_some_and(|user| user.role == role))
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
