//! Role administration use-cases, all scoped to the admin capability by the
//! inbound adapter.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::ports::{
    ClassRepository, ClassRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{ApprovalStatus, Email, Error, Role, User};

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

fn map_catalog_error(error: ClassRepositoryError) -> Error {
    match error {
        ClassRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("class catalog unavailable: {message}"))
        }
        ClassRepositoryError::Query { message } => {
            Error::internal(format!("class catalog error: {message}"))
        }
    }
}

/// Admin mutations on the user directory and class catalog.
#[derive(Clone)]
pub struct RoleAdminService {
    users: Arc<dyn UserRepository>,
    classes: Arc<dyn ClassRepository>,
}

impl RoleAdminService {
    /// Create a role administration service.
    pub fn new(users: Arc<dyn UserRepository>, classes: Arc<dyn ClassRepository>) -> Self {
        Self { users, classes }
    }

    /// List every user in the directory.
    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_directory_error)
    }

    /// List approved instructors for the public storefront.
    pub async fn list_instructors(&self) -> Result<Vec<User>, Error> {
        self.users
            .list_by_role(Role::Instructor)
            .await
            .map_err(map_directory_error)
    }

    /// Promote a user to instructor or admin.
    ///
    /// Demotion back to student is not part of the product; rejecting it
    /// here keeps the closed set visible in one place.
    pub async fn promote(&self, email: &Email, role: Role) -> Result<(), Error> {
        if role == Role::Student {
            return Err(Error::invalid_request(
                "users can only be promoted to instructor or admin",
            ));
        }
        let updated = self
            .users
            .set_role(email, role)
            .await
            .map_err(map_directory_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {email} not found")))
        }
    }

    /// Approve or deny a class submission.
    pub async fn set_class_approval(
        &self,
        class_id: Uuid,
        status: ApprovalStatus,
    ) -> Result<(), Error> {
        if status == ApprovalStatus::Pending {
            return Err(Error::invalid_request(
                "classes cannot be moved back to pending",
            ));
        }
        let updated = self
            .classes
            .set_status(class_id, status)
            .await
            .map_err(map_catalog_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found(format!("class {class_id} not found")))
        }
    }

    /// Attach feedback text to a class submission.
    pub async fn set_class_feedback(&self, class_id: Uuid, feedback: &str) -> Result<(), Error> {
        let updated = self
            .classes
            .set_feedback(class_id, feedback)
            .await
            .map_err(map_catalog_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found(format!("class {class_id} not found")))
        }
    }
}

#[cfg(test)]
#[path = "role_admin_service_tests.rs"]
mod tests;
