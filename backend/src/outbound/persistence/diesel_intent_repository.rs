//! Diesel-backed enrollment intent store.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{IntentRepository, IntentRepositoryError};
use crate::domain::{Email, EnrollmentIntent};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{IntentRow, NewIntentRow};
use super::pool::DbPool;
use super::schema::enrollment_intents;

/// PostgreSQL implementation of [`IntentRepository`].
#[derive(Clone)]
pub struct DieselIntentRepository {
    pool: DbPool,
}

impl DieselIntentRepository {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(message: impl Into<String>) -> IntentRepositoryError {
    IntentRepositoryError::query(message.into())
}

fn map_error(error: diesel::result::Error) -> IntentRepositoryError {
    map_diesel_error(error, IntentRepositoryError::query, |message| {
        IntentRepositoryError::connection(message)
    })
}

#[async_trait]
impl IntentRepository for DieselIntentRepository {
    async fn insert(&self, intent: &EnrollmentIntent) -> Result<(), IntentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, IntentRepositoryError::connection))?;

        diesel::insert_into(enrollment_intents::table)
            .values(NewIntentRow::from_domain(intent))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<EnrollmentIntent>, IntentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, IntentRepositoryError::connection))?;

        let row = enrollment_intents::table
            .find(id)
            .select(IntentRow::as_select())
            .first::<IntentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(|row| row.into_domain().map_err(query_error))
            .transpose()
    }

    async fn list_for_student(
        &self,
        email: &Email,
    ) -> Result<Vec<EnrollmentIntent>, IntentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, IntentRepositoryError::connection))?;

        let rows = enrollment_intents::table
            .filter(enrollment_intents::student_email.eq(email.as_ref()))
            .order(enrollment_intents::created_at.desc())
            .select(IntentRow::as_select())
            .load::<IntentRow>(&mut conn)
            .await
            .map_err(map_error)?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(query_error))
            .collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, IntentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, IntentRepositoryError::connection))?;

        let deleted = diesel::delete(enrollment_intents::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(deleted > 0)
    }
}
