//! Diesel-backed payment ledger reads.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};
use crate::domain::{ChargeRef, Email, Payment};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::PaymentRow;
use super::pool::DbPool;
use super::schema::payments;

/// PostgreSQL implementation of [`PaymentRepository`].
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(message: impl Into<String>) -> PaymentRepositoryError {
    PaymentRepositoryError::query(message.into())
}

fn map_error(error: diesel::result::Error) -> PaymentRepositoryError {
    map_diesel_error(error, PaymentRepositoryError::query, |message| {
        PaymentRepositoryError::connection(message)
    })
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn find_by_charge_ref(
        &self,
        charge_ref: &ChargeRef,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, PaymentRepositoryError::connection))?;

        let row = payments::table
            .filter(payments::charge_ref.eq(charge_ref.as_ref()))
            .select(PaymentRow::as_select())
            .first::<PaymentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(|row| row.into_domain().map_err(query_error))
            .transpose()
    }

    async fn list_for_student(
        &self,
        email: &Email,
    ) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, PaymentRepositoryError::connection))?;

        let rows = payments::table
            .filter(payments::student_email.eq(email.as_ref()))
            .order(payments::created_at.desc())
            .select(PaymentRow::as_select())
            .load::<PaymentRow>(&mut conn)
            .await
            .map_err(map_error)?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(query_error))
            .collect()
    }
}
