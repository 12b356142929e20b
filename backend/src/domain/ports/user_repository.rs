//! Port abstraction for the user directory.

use async_trait::async_trait;

use crate::domain::{Email, Role, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserRepositoryError {
        /// Directory connection could not be established.
        Connection { message: String } => "user directory connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user directory query failed: {message}",
    }
}

/// Port for user directory storage and retrieval.
///
/// The authorization gate reads through this port on every privileged call;
/// implementations must not cache roles, because role administration can
/// change them between requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Point lookup by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError>;

    /// Insert the user unless the email is already registered.
    ///
    /// Returns `true` when a new record was created, `false` when the email
    /// already existed (first-login registration is a no-op on repeat).
    async fn insert_if_absent(&self, user: &User) -> Result<bool, UserRepositoryError>;

    /// List every user in the directory.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// List users holding the given role.
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserRepositoryError>;

    /// Overwrite a user's role.
    ///
    /// Returns `false` when no user with the email exists.
    async fn set_role(&self, email: &Email, role: Role) -> Result<bool, UserRepositoryError>;
}
