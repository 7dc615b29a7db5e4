//! In-memory repository adapter.
//!
//! Backs the `memory://` database URL. Nothing survives a restart, which
//! makes it the default for local runs and the HTTP integration tests.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use billing_types::{
    Customer, CustomerId, CustomerRepository, NewPayment, Payment, PaymentId, PaymentRepository,
    RepoError,
};

/// Concurrent in-memory store for customers and payments.
pub struct InMemoryRepo {
    customers: DashMap<CustomerId, Customer>,
    phone_index: DashMap<String, CustomerId>,
    payments: DashMap<PaymentId, Payment>,
    next_payment_id: AtomicI64,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            customers: DashMap::new(),
            phone_index: DashMap::new(),
            payments: DashMap::new(),
            next_payment_id: AtomicI64::new(1),
        }
    }

    /// Number of stored customers.
    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    /// Number of stored payments.
    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryRepo {
    async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<Customer>, RepoError> {
        let Some(id) = self.phone_index.get(phone_number).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.customers.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepoError> {
        Ok(self.customers.get(&id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, customer: Customer) -> Result<(), RepoError> {
        // Phone shard is locked before the id shard on every path.
        let phone_slot = match self.phone_index.entry(customer.phone_number.clone()) {
            Entry::Occupied(_) => {
                return Err(RepoError::Conflict(format!(
                    "phone number {} already exists",
                    customer.phone_number
                )));
            }
            Entry::Vacant(slot) => slot,
        };

        match self.customers.entry(customer.id) {
            Entry::Occupied(_) => Err(RepoError::Conflict(format!(
                "customer {} already exists",
                customer.id
            ))),
            Entry::Vacant(id_slot) => {
                let id = customer.id;
                id_slot.insert(customer);
                phone_slot.insert(id);
                tracing::debug!(customer_id = %id, "customer stored in memory");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl PaymentRepository for InMemoryRepo {
    async fn save(&self, payment: NewPayment) -> Result<Payment, RepoError> {
        let id = PaymentId::new(self.next_payment_id.fetch_add(1, Ordering::SeqCst));
        let stored = Payment::from_new(id, payment, chrono::Utc::now());
        self.payments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        Ok(self.payments.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Payment>, RepoError> {
        let mut payments: Vec<Payment> = self
            .payments
            .iter()
            .filter(|entry| entry.value().customer_id == customer_id)
            .map(|entry| entry.value().clone())
            .collect();
        payments.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use billing_types::{Currency, Money};
    use rust_decimal_macros::dec;

    use super::*;

    fn customer(name: &str, phone: &str) -> Customer {
        Customer::new(None, name.to_string(), phone.to_string()).unwrap()
    }

    fn payment(customer_id: CustomerId, amount: rust_decimal::Decimal) -> NewPayment {
        NewPayment::new(
            customer_id,
            Money::new(amount, Currency::GBP).unwrap(),
            "tok_visa".to_string(),
            "groceries".to_string(),
        )
    }

    #[tokio::test]
    async fn test_save_and_find_customer() {
        let repo = InMemoryRepo::new();
        let alice = customer("Alice", "+447700900001");

        CustomerRepository::save(&repo, alice.clone()).await.unwrap();

        let by_phone = repo.find_by_phone_number("+447700900001").await.unwrap();
        let by_id = CustomerRepository::find_by_id(&repo, alice.id).await.unwrap();
        assert_eq!(by_phone, Some(alice.clone()));
        assert_eq!(by_id, Some(alice));
    }

    #[tokio::test]
    async fn test_unknown_customer_is_none() {
        let repo = InMemoryRepo::new();

        assert!(repo.find_by_phone_number("+447700900001").await.unwrap().is_none());
        assert!(
            CustomerRepository::find_by_id(&repo, CustomerId::new())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_phone_is_conflict() {
        let repo = InMemoryRepo::new();
        CustomerRepository::save(&repo, customer("Alice", "+447700900001"))
            .await
            .unwrap();

        let result = CustomerRepository::save(&repo, customer("Bob", "+447700900001")).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
        assert_eq!(repo.customer_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_conflict_and_leaves_phone_free() {
        let repo = InMemoryRepo::new();
        let alice = customer("Alice", "+447700900001");
        CustomerRepository::save(&repo, alice.clone()).await.unwrap();

        let clash = Customer::from_parts(alice.id, "Bob".to_string(), "+447700900002".to_string());
        let result = CustomerRepository::save(&repo, clash).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
        assert!(repo.find_by_phone_number("+447700900002").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_saves_on_one_phone_store_exactly_one() {
        let repo = Arc::new(InMemoryRepo::new());

        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                CustomerRepository::save(&*repo, customer(&format!("c{i}"), "+447700900001")).await
            }));
        }

        let mut stored = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                stored += 1;
            }
        }

        assert_eq!(stored, 1);
        assert_eq!(repo.customer_count(), 1);
    }

    #[tokio::test]
    async fn test_payment_ids_are_assigned_in_order() {
        let repo = InMemoryRepo::new();
        let owner = CustomerId::new();

        let first = PaymentRepository::save(&repo, payment(owner, dec!(10.00)))
            .await
            .unwrap();
        let second = PaymentRepository::save(&repo, payment(owner, dec!(20.00)))
            .await
            .unwrap();

        assert!(second.id > first.id);
        let found = PaymentRepository::find_by_id(&repo, first.id).await.unwrap();
        assert_eq!(found, Some(first));
    }

    #[tokio::test]
    async fn test_list_for_customer_is_newest_first_and_filtered() {
        let repo = InMemoryRepo::new();
        let owner = CustomerId::new();
        let other = CustomerId::new();

        let older = PaymentRepository::save(&repo, payment(owner, dec!(1.00)))
            .await
            .unwrap();
        PaymentRepository::save(&repo, payment(other, dec!(2.00)))
            .await
            .unwrap();
        let newer = PaymentRepository::save(&repo, payment(owner, dec!(3.00)))
            .await
            .unwrap();

        let listed = repo.list_for_customer(owner).await.unwrap();

        let ids: Vec<PaymentId> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert_eq!(repo.payment_count(), 3);
    }
}
