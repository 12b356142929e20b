//! Diesel-backed class catalog.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ClassRepository, ClassRepositoryError, ClassUpdate};
use crate::domain::{ApprovalStatus, Class, Email};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ClassRow, NewClassRow};
use super::pool::DbPool;
use super::schema::classes;

/// PostgreSQL implementation of [`ClassRepository`].
#[derive(Clone)]
pub struct DieselClassRepository {
    pool: DbPool,
}

impl DieselClassRepository {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = classes)]
struct ClassChangeset<'a> {
    title: Option<&'a str>,
    image_url: Option<&'a str>,
    price_cents: Option<i64>,
    total_seats: Option<i32>,
    available_seats: Option<i32>,
}

impl<'a> ClassChangeset<'a> {
    fn from_update(update: &'a ClassUpdate) -> Self {
        Self {
            title: update.title.as_deref(),
            image_url: update.image_url.as_deref(),
            price_cents: update.price_cents,
            total_seats: update.total_seats,
            available_seats: update.available_seats,
        }
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.image_url.is_none()
            && self.price_cents.is_none()
            && self.total_seats.is_none()
            && self.available_seats.is_none()
    }
}

fn query_error(message: impl Into<String>) -> ClassRepositoryError {
    ClassRepositoryError::query(message.into())
}

fn map_error(error: diesel::result::Error) -> ClassRepositoryError {
    map_diesel_error(error, ClassRepositoryError::query, |message| {
        ClassRepositoryError::connection(message)
    })
}

fn rows_to_classes(rows: Vec<ClassRow>) -> Result<Vec<Class>, ClassRepositoryError> {
    rows.into_iter()
        .map(|row| row.into_domain().map_err(query_error))
        .collect()
}

#[async_trait]
impl ClassRepository for DieselClassRepository {
    async fn insert(&self, class: &Class) -> Result<(), ClassRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ClassRepositoryError::connection))?;

        diesel::insert_into(classes::table)
            .values(NewClassRow::from_domain(class))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Class>, ClassRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ClassRepositoryError::connection))?;

        let row = classes::table
            .find(id)
            .select(ClassRow::as_select())
            .first::<ClassRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(|row| row.into_domain().map_err(query_error))
            .transpose()
    }

    async fn list_by_enrollment(&self) -> Result<Vec<Class>, ClassRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ClassRepositoryError::connection))?;

        let rows = classes::table
            .order(classes::enrolled_count.desc())
            .select(ClassRow::as_select())
            .load::<ClassRow>(&mut conn)
            .await
            .map_err(map_error)?;

        rows_to_classes(rows)
    }

    async fn list_by_instructor(&self, email: &Email) -> Result<Vec<Class>, ClassRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ClassRepositoryError::connection))?;

        let rows = classes::table
            .filter(classes::instructor_email.eq(email.as_ref()))
            .order(classes::created_at.desc())
            .select(ClassRow::as_select())
            .load::<ClassRow>(&mut conn)
            .await
            .map_err(map_error)?;

        rows_to_classes(rows)
    }

    async fn update_editable(
        &self,
        id: Uuid,
        instructor_email: &Email,
        update: ClassUpdate,
    ) -> Result<bool, ClassRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ClassRepositoryError::connection))?;

        let changeset = ClassChangeset::from_update(&update);
        let target = classes::table.filter(
            classes::id
                .eq(id)
                .and(classes::instructor_email.eq(instructor_email.as_ref())),
        );

        // Diesel rejects an empty changeset; a no-op edit degrades to an
        // ownership check.
        if changeset.is_empty() {
            let matched: i64 = target
                .count()
                .get_result(&mut conn)
                .await
                .map_err(map_error)?;
            return Ok(matched > 0);
        }

        let updated = diesel::update(target)
            .set(changeset)
            .execute(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(updated > 0)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ApprovalStatus,
    ) -> Result<bool, ClassRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ClassRepositoryError::connection))?;

        let updated = diesel::update(classes::table.find(id))
            .set(classes::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(updated > 0)
    }

    async fn set_feedback(
        &self,
        id: Uuid,
        feedback: &str,
    ) -> Result<bool, ClassRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ClassRepositoryError::connection))?;

        let updated = diesel::update(classes::table.find(id))
            .set(classes::feedback.eq(feedback))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(updated > 0)
    }
}
