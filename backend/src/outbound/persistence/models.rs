//! Row structs bridging Diesel and the domain entities.
//!
//! Queryable rows carry raw column values; conversion into domain types
//! revalidates invariants so a corrupted row surfaces as a query error
//! instead of an invalid entity.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    ApprovalStatus, ChargeRef, Class, ClassDraft, Email, EnrollmentIntent, Payment, Role, User,
};

use super::schema::{classes, enrollment_intents, payments, users};

/// A user row as stored in the `users` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert the row into a domain [`User`].
    ///
    /// # Errors
    ///
    /// Returns a description of the offending column when the stored value
    /// no longer parses as a valid email or role.
    pub fn into_domain(self) -> Result<User, String> {
        let email = Email::new(&self.email).map_err(|err| format!("users.email: {err}"))?;
        let role: Role = self
            .role
            .parse()
            .map_err(|err| format!("users.role: {err}"))?;
        Ok(User {
            email,
            display_name: self.display_name,
            role,
            created_at: self.created_at,
        })
    }
}

/// Insertable form of a user row.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub email: &'a str,
    pub display_name: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewUserRow<'a> {
    pub fn from_domain(user: &'a User) -> Self {
        Self {
            email: user.email.as_ref(),
            display_name: &user.display_name,
            role: user.role.as_str(),
            created_at: user.created_at,
        }
    }
}

/// A class row as stored in the `classes` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = classes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClassRow {
    pub id: Uuid,
    pub title: String,
    pub instructor_email: String,
    pub image_url: Option<String>,
    pub price_cents: i64,
    pub total_seats: i32,
    pub available_seats: i32,
    pub enrolled_count: i32,
    pub status: String,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ClassRow {
    /// Convert the row into a domain [`Class`], revalidating invariants.
    pub fn into_domain(self) -> Result<Class, String> {
        let instructor_email = Email::new(&self.instructor_email)
            .map_err(|err| format!("classes.instructor_email: {err}"))?;
        let status: ApprovalStatus = self
            .status
            .parse()
            .map_err(|err| format!("classes.status: {err}"))?;
        Class::new(ClassDraft {
            id: self.id,
            title: self.title,
            instructor_email,
            image_url: self.image_url,
            price_cents: self.price_cents,
            total_seats: self.total_seats,
            available_seats: self.available_seats,
            enrolled_count: self.enrolled_count,
            status,
            feedback: self.feedback,
            created_at: self.created_at,
        })
        .map_err(|err| format!("classes row {id}: {err}", id = self.id))
    }
}

/// Insertable form of a class row.
#[derive(Debug, Insertable)]
#[diesel(table_name = classes)]
pub struct NewClassRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub instructor_email: &'a str,
    pub image_url: Option<&'a str>,
    pub price_cents: i64,
    pub total_seats: i32,
    pub available_seats: i32,
    pub enrolled_count: i32,
    pub status: &'a str,
    pub feedback: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewClassRow<'a> {
    pub fn from_domain(class: &'a Class) -> Self {
        Self {
            id: class.id,
            title: &class.title,
            instructor_email: class.instructor_email.as_ref(),
            image_url: class.image_url.as_deref(),
            price_cents: class.price_cents,
            total_seats: class.total_seats,
            available_seats: class.available_seats,
            enrolled_count: class.enrolled_count,
            status: class.status.as_str(),
            feedback: class.feedback.as_deref(),
            created_at: class.created_at,
        }
    }
}

/// An enrollment intent row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = enrollment_intents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IntentRow {
    pub id: Uuid,
    pub student_email: String,
    pub class_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl IntentRow {
    pub fn into_domain(self) -> Result<EnrollmentIntent, String> {
        let student_email = Email::new(&self.student_email)
            .map_err(|err| format!("enrollment_intents.student_email: {err}"))?;
        Ok(EnrollmentIntent {
            id: self.id,
            student_email,
            class_id: self.class_id,
            created_at: self.created_at,
        })
    }
}

/// Insertable form of an enrollment intent row.
#[derive(Debug, Insertable)]
#[diesel(table_name = enrollment_intents)]
pub struct NewIntentRow<'a> {
    pub id: Uuid,
    pub student_email: &'a str,
    pub class_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewIntentRow<'a> {
    pub fn from_domain(intent: &'a EnrollmentIntent) -> Self {
        Self {
            id: intent.id,
            student_email: intent.student_email.as_ref(),
            class_id: intent.class_id,
            created_at: intent.created_at,
        }
    }
}

/// A payment ledger row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentRow {
    pub id: Uuid,
    pub student_email: String,
    pub class_id: Uuid,
    pub intent_id: Uuid,
    pub amount_cents: i64,
    pub charge_ref: String,
    pub created_at: DateTime<Utc>,
}

impl PaymentRow {
    pub fn into_domain(self) -> Result<Payment, String> {
        let student_email =
            Email::new(&self.student_email).map_err(|err| format!("payments.student_email: {err}"))?;
        let charge_ref =
            ChargeRef::new(&self.charge_ref).map_err(|err| format!("payments.charge_ref: {err}"))?;
        Ok(Payment {
            id: self.id,
            student_email,
            class_id: self.class_id,
            intent_id: self.intent_id,
            amount_cents: self.amount_cents,
            charge_ref,
            created_at: self.created_at,
        })
    }
}

/// Insertable form of a payment ledger row.
#[derive(Debug, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPaymentRow<'a> {
    pub id: Uuid,
    pub student_email: &'a str,
    pub class_id: Uuid,
    pub intent_id: Uuid,
    pub amount_cents: i64,
    pub charge_ref: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewPaymentRow<'a> {
    pub fn from_domain(payment: &'a Payment) -> Self {
        Self {
            id: payment.id,
            student_email: payment.student_email.as_ref(),
            class_id: payment.class_id,
            intent_id: payment.intent_id,
            amount_cents: payment.amount_cents,
            charge_ref: payment.charge_ref.as_ref(),
            created_at: payment.created_at,
        }
    }
}
