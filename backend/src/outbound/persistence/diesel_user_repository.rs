//! Diesel-backed user directory.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Email, Role, User};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// PostgreSQL implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(message: impl Into<String>) -> UserRepositoryError {
    UserRepositoryError::query(message.into())
}

fn map_error(error: diesel::result::Error) -> UserRepositoryError {
    map_diesel_error(error, UserRepositoryError::query, |message| {
        UserRepositoryError::connection(message)
    })
}

fn rows_to_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserRepositoryError> {
    rows.into_iter()
        .map(|row| row.into_domain().map_err(query_error))
        .collect()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(|row| row.into_domain().map_err(query_error))
            .transpose()
    }

    async fn insert_if_absent(&self, user: &User) -> Result<bool, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        let inserted = diesel::insert_into(users::table)
            .values(NewUserRow::from_domain(user))
            .on_conflict(users::email)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(inserted > 0)
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        let rows = users::table
            .order(users::created_at.asc())
            .select(UserRow::as_select())
            .load::<UserRow>(&mut conn)
            .await
            .map_err(map_error)?;

        rows_to_users(rows)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        let rows = users::table
            .filter(users::role.eq(role.as_str()))
            .order(users::created_at.asc())
            .select(UserRow::as_select())
            .load::<UserRow>(&mut conn)
            .await
            .map_err(map_error)?;

        rows_to_users(rows)
    }

    async fn set_role(&self, email: &Email, role: Role) -> Result<bool, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        let updated = diesel::update(users::table.filter(users::email.eq(email.as_ref())))
            .set(users::role.eq(role.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(updated > 0)
    }
}
