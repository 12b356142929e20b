//! Diesel-backed atomic settlement commit.
//!
//! All three writes happen inside one PostgreSQL transaction. The seat
//! decrement is a guarded `UPDATE ... WHERE available_seats >= 1` so the
//! database, not the application, arbitrates the last seat: of N concurrent
//! settlers on a class with K seats, exactly K see a matched row and the
//! rest roll back with [`SettlementUnitError::SeatsExhausted`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::Payment;
use crate::domain::ports::{SettlementCommit, SettlementUnit, SettlementUnitError};

use super::diesel_error_mapping::map_pool_error;
use super::models::NewPaymentRow;
use super::pool::DbPool;
use super::schema::{classes, enrollment_intents, payments};

/// PostgreSQL implementation of [`SettlementUnit`].
#[derive(Clone)]
pub struct DieselSettlementUnit {
    pool: DbPool,
}

impl DieselSettlementUnit {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Internal transaction outcome, widened to [`SettlementUnitError`] after
/// the rollback has completed.
#[derive(Debug)]
enum CommitError {
    SeatsExhausted,
    IntentMissing,
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for CommitError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_commit_error(error: CommitError, payment: &Payment) -> SettlementUnitError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        CommitError::SeatsExhausted => SettlementUnitError::seats_exhausted(payment.class_id),
        CommitError::IntentMissing => SettlementUnitError::intent_missing(payment.intent_id),
        CommitError::Diesel(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            _,
        )) => SettlementUnitError::duplicate_charge(payment.charge_ref.as_ref()),
        CommitError::Diesel(DieselError::DatabaseError(
            DatabaseErrorKind::SerializationFailure,
            info,
        )) => SettlementUnitError::retryable(info.message()),
        CommitError::Diesel(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            info,
        )) => SettlementUnitError::connection(info.message()),
        CommitError::Diesel(other) => SettlementUnitError::query(other.to_string()),
    }
}

#[async_trait]
impl SettlementUnit for DieselSettlementUnit {
    async fn commit(&self, payment: &Payment) -> Result<SettlementCommit, SettlementUnitError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SettlementUnitError::connection))?;

        let result = conn
            .transaction::<(i32, i32), CommitError, _>(|conn| {
                async move {
                    // Guarded decrement: matches only while a seat remains.
                    let counters = diesel::update(
                        classes::table.filter(
                            classes::id
                                .eq(payment.class_id)
                                .and(classes::available_seats.ge(1)),
                        ),
                    )
                    .set((
                        classes::available_seats.eq(classes::available_seats - 1),
                        classes::enrolled_count.eq(classes::enrolled_count + 1),
                    ))
                    .returning((classes::available_seats, classes::enrolled_count))
                    .get_result::<(i32, i32)>(conn)
                    .await
                    .optional()?
                    .ok_or(CommitError::SeatsExhausted)?;

                    // Consume the intent; zero rows means another settlement
                    // or a cancellation got there first.
                    let deleted = diesel::delete(
                        enrollment_intents::table.filter(
                            enrollment_intents::id
                                .eq(payment.intent_id)
                                .and(
                                    enrollment_intents::student_email
                                        .eq(payment.student_email.as_ref()),
                                ),
                        ),
                    )
                    .execute(conn)
                    .await?;
                    if deleted == 0 {
                        return Err(CommitError::IntentMissing);
                    }

                    // Unique charge_ref turns a replayed charge into a
                    // unique violation here, rolling everything back.
                    diesel::insert_into(payments::table)
                        .values(NewPaymentRow::from_domain(payment))
                        .execute(conn)
                        .await?;

                    Ok(counters)
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok((available_seats, enrolled_count)) => Ok(SettlementCommit {
                payment: payment.clone(),
                available_seats,
                enrolled_count,
            }),
            Err(error) => Err(map_commit_error(error, payment)),
        }
    }
}
