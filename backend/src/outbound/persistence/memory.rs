//! In-memory implementations of the persistence ports.
//!
//! Used when the server starts without a database and by integration tests.
//! A single mutex guards the whole store, so the settlement commit holds the
//! same atomicity contract as the SQL transaction: all three writes happen
//! under one lock acquisition or none do.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    ClassRepository, ClassRepositoryError, ClassUpdate, IntentRepository, IntentRepositoryError,
    PaymentRepository, PaymentRepositoryError, SettlementCommit, SettlementUnit,
    SettlementUnitError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    ApprovalStatus, ChargeRef, Class, Email, EnrollmentIntent, Payment, Role, User,
};

#[derive(Debug, Default)]
struct StoreState {
    users: HashMap<Email, User>,
    classes: HashMap<Uuid, Class>,
    intents: HashMap<Uuid, EnrollmentIntent>,
    payments: Vec<Payment>,
}

/// Shared in-memory store implementing every persistence port.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        // A poisoned lock means a panic mid-mutation in another test; the
        // store has no invariants a panic could half-apply outside the
        // settlement path, which writes last.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock().users.get(email).cloned())
    }

    async fn insert_if_absent(&self, user: &User) -> Result<bool, UserRepositoryError> {
        let mut state = self.lock();
        if state.users.contains_key(&user.email) {
            return Ok(false);
        }
        state.users.insert(user.email.clone(), user.clone());
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut users: Vec<User> = self.lock().users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserRepositoryError> {
        let mut users: Vec<User> = self
            .lock()
            .users
            .values()
            .filter(|user| user.role == role)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn set_role(&self, email: &Email, role: Role) -> Result<bool, UserRepositoryError> {
        let mut state = self.lock();
        match state.users.get_mut(email) {
            Some(user) => {
                user.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ClassRepository for MemoryStore {
    async fn insert(&self, class: &Class) -> Result<(), ClassRepositoryError> {
        self.lock().classes.insert(class.id, class.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Class>, ClassRepositoryError> {
        Ok(self.lock().classes.get(&id).cloned())
    }

    async fn list_by_enrollment(&self) -> Result<Vec<Class>, ClassRepositoryError> {
        let mut classes: Vec<Class> = self.lock().classes.values().cloned().collect();
        classes.sort_by(|a, b| b.enrolled_count.cmp(&a.enrolled_count));
        Ok(classes)
    }

    async fn list_by_instructor(&self, email: &Email) -> Result<Vec<Class>, ClassRepositoryError> {
        let mut classes: Vec<Class> = self
            .lock()
            .classes
            .values()
            .filter(|class| class.instructor_email == *email)
            .cloned()
            .collect();
        classes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(classes)
    }

    async fn update_editable(
        &self,
        id: Uuid,
        instructor_email: &Email,
        update: ClassUpdate,
    ) -> Result<bool, ClassRepositoryError> {
        let mut state = self.lock();
        let Some(class) = state.classes.get_mut(&id) else {
            return Ok(false);
        };
        if class.instructor_email != *instructor_email {
            return Ok(false);
        }
        if let Some(title) = update.title {
            class.title = title;
        }
        if let Some(image_url) = update.image_url {
            class.image_url = Some(image_url);
        }
        if let Some(price_cents) = update.price_cents {
            class.price_cents = price_cents;
        }
        if let Some(total_seats) = update.total_seats {
            class.total_seats = total_seats;
        }
        if let Some(available_seats) = update.available_seats {
            class.available_seats = available_seats;
        }
        Ok(true)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ApprovalStatus,
    ) -> Result<bool, ClassRepositoryError> {
        let mut state = self.lock();
        match state.classes.get_mut(&id) {
            Some(class) => {
                class.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_feedback(
        &self,
        id: Uuid,
        feedback: &str,
    ) -> Result<bool, ClassRepositoryError> {
        let mut state = self.lock();
        match state.classes.get_mut(&id) {
            Some(class) => {
                class.feedback = Some(feedback.to_owned());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl IntentRepository for MemoryStore {
    async fn insert(&self, intent: &EnrollmentIntent) -> Result<(), IntentRepositoryError> {
        self.lock().intents.insert(intent.id, intent.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<EnrollmentIntent>, IntentRepositoryError> {
        Ok(self.lock().intents.get(&id).cloned())
    }

    async fn list_for_student(
        &self,
        email: &Email,
    ) -> Result<Vec<EnrollmentIntent>, IntentRepositoryError> {
        let mut intents: Vec<EnrollmentIntent> = self
            .lock()
            .intents
            .values()
            .filter(|intent| intent.student_email == *email)
            .cloned()
            .collect();
        intents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(intents)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, IntentRepositoryError> {
        Ok(self.lock().intents.remove(&id).is_some())
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn find_by_charge_ref(
        &self,
        charge_ref: &ChargeRef,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        Ok(self
            .lock()
            .payments
            .iter()
            .find(|payment| payment.charge_ref == *charge_ref)
            .cloned())
    }

    async fn list_for_student(
        &self,
        email: &Email,
    ) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let mut payments: Vec<Payment> = self
            .lock()
            .payments
            .iter()
            .filter(|payment| payment.student_email == *email)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }
}

#[async_trait]
impl SettlementUnit for MemoryStore {
    async fn commit(&self, payment: &Payment) -> Result<SettlementCommit, SettlementUnitError> {
        let mut state = self.lock();

        // Checks first, in rollback-free order; mutations only once every
        // precondition has passed.
        if state
            .payments
            .iter()
            .any(|existing| existing.charge_ref == payment.charge_ref)
        {
            return Err(SettlementUnitError::duplicate_charge(
                payment.charge_ref.as_ref(),
            ));
        }

        let class = state
            .classes
            .get(&payment.class_id)
            .filter(|class| class.has_available_seat());
        if class.is_none() {
            return Err(SettlementUnitError::seats_exhausted(payment.class_id));
        }

        let intent_present = state
            .intents
            .get(&payment.intent_id)
            .is_some_and(|intent| intent.student_email == payment.student_email);
        if !intent_present {
            return Err(SettlementUnitError::intent_missing(payment.intent_id));
        }

        let (available_seats, enrolled_count) = {
            let class = state
                .classes
                .get_mut(&payment.class_id)
                .ok_or_else(|| SettlementUnitError::seats_exhausted(payment.class_id))?;
            class.available_seats -= 1;
            class.enrolled_count += 1;
            (class.available_seats, class.enrolled_count)
        };
        state.intents.remove(&payment.intent_id);
        state.payments.push(payment.clone());

        Ok(SettlementCommit {
            payment: payment.clone(),
            available_seats,
            enrolled_count,
        })
    }
}
