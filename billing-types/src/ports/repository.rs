//! Repository port traits.
//!
//! Adapters (Postgres, SQLite, InMemory) implement these traits.
//! The services only ever see the traits.

use std::sync::Arc;

use crate::domain::{Customer, CustomerId, NewPayment, Payment, PaymentId};
use crate::error::RepoError;

/// Storage for customers, keyed by id and by phone number.
///
/// Implementations MUST enforce phone number uniqueness: a `save` whose
/// phone number belongs to another customer fails with
/// [`RepoError::Conflict`], even when two writers race.
#[async_trait::async_trait]
pub trait CustomerRepository: Send + Sync + 'static {
    /// Finds the customer registered under a phone number.
    async fn find_by_phone_number(&self, phone_number: &str)
    -> Result<Option<Customer>, RepoError>;

    /// Gets a customer by ID.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepoError>;

    /// Persists a new customer.
    async fn save(&self, customer: Customer) -> Result<(), RepoError>;
}

/// Storage for recorded payments.
#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
    /// Persists a payment, assigning its identity.
    async fn save(&self, payment: NewPayment) -> Result<Payment, RepoError>;

    /// Gets a payment by ID.
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError>;

    /// Lists payments for a customer, newest first.
    async fn list_for_customer(&self, customer_id: CustomerId)
    -> Result<Vec<Payment>, RepoError>;
}

/// A single store backing both customers and payments.
pub trait BillingRepository: CustomerRepository + PaymentRepository {}

impl<T: CustomerRepository + PaymentRepository> BillingRepository for T {}

// ─────────────────────────────────────────────────────────────────────────────
// Shared adapters: one instance can back both services
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl<T: CustomerRepository + ?Sized> CustomerRepository for Arc<T> {
    async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<Customer>, RepoError> {
        (**self).find_by_phone_number(phone_number).await
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepoError> {
        CustomerRepository::find_by_id(&**self, id).await
    }

    async fn save(&self, customer: Customer) -> Result<(), RepoError> {
        CustomerRepository::save(&**self, customer).await
    }
}

#[async_trait::async_trait]
impl<T: PaymentRepository + ?Sized> PaymentRepository for Arc<T> {
    async fn save(&self, payment: NewPayment) -> Result<Payment, RepoError> {
        PaymentRepository::save(&**self, payment).await
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        PaymentRepository::find_by_id(&**self, id).await
    }

    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Payment>, RepoError> {
        (**self).list_for_customer(customer_id).await
    }
}
