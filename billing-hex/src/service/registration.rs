//! Customer registration keyed by phone number.

use billing_types::{
    AppError, Customer, CustomerId, CustomerRegistrationRequest, CustomerRepository,
    PhoneNumberValidator, RepoError,
};

/// How an incoming registration relates to what is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Registration {
    /// Nobody holds the phone number yet.
    New,
    /// Same phone number, same name: a repeat of an earlier registration.
    AlreadyRegistered,
    /// Same phone number, different name.
    PhoneNumberTaken,
}

fn reconcile(existing: Option<&Customer>, name: &str) -> Registration {
    match existing {
        None => Registration::New,
        Some(customer) if customer.is_same_customer(name) => Registration::AlreadyRegistered,
        Some(_) => Registration::PhoneNumberTaken,
    }
}

fn phone_number_taken(phone_number: &str) -> AppError {
    AppError::Conflict(format!("phone number [{}] is already taken", phone_number))
}

/// Application service for customer registration.
///
/// Generic over the repository and the phone number rules so each can be
/// swapped for a fake in tests.
pub struct CustomerRegistrationService<R: CustomerRepository, V: PhoneNumberValidator> {
    repo: R,
    phone_validator: V,
}

impl<R: CustomerRepository, V: PhoneNumberValidator> CustomerRegistrationService<R, V> {
    /// Creates a new registration service.
    pub fn new(repo: R, phone_validator: V) -> Self {
        Self {
            repo,
            phone_validator,
        }
    }

    /// Registers a customer.
    ///
    /// Registering the same name and phone number twice succeeds without a
    /// second write. A different name on a known phone number is a conflict.
    #[tracing::instrument(skip(self, req), fields(phone_number = %req.customer.phone_number))]
    pub async fn register(&self, req: CustomerRegistrationRequest) -> Result<(), AppError> {
        let details = req.customer;

        if !self.phone_validator.is_valid(&details.phone_number) {
            tracing::warn!("rejected registration with invalid phone number");
            return Err(AppError::Validation(format!(
                "phone number {} is not valid",
                details.phone_number
            )));
        }

        let existing = self
            .repo
            .find_by_phone_number(&details.phone_number)
            .await?;

        match reconcile(existing.as_ref(), &details.name) {
            Registration::New => {}
            Registration::AlreadyRegistered => {
                tracing::debug!("customer already registered, nothing to do");
                return Ok(());
            }
            Registration::PhoneNumberTaken => {
                tracing::warn!("phone number already belongs to another customer");
                return Err(phone_number_taken(&details.phone_number));
            }
        }

        let customer = Customer::new(details.id, details.name, details.phone_number)?;
        let customer_id = customer.id;
        let phone_number = customer.phone_number.clone();
        let name = customer.name.clone();

        match self.repo.save(customer).await {
            Ok(()) => {
                tracing::info!(customer_id = %customer_id, "customer registered");
                Ok(())
            }
            // Lost a race for the phone number (or the id) to another writer.
            Err(RepoError::Conflict(msg)) => {
                let winner = self.repo.find_by_phone_number(&phone_number).await?;
                match reconcile(winner.as_ref(), &name) {
                    Registration::AlreadyRegistered => Ok(()),
                    Registration::PhoneNumberTaken => Err(phone_number_taken(&phone_number)),
                    Registration::New => Err(AppError::Conflict(msg)),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Gets a customer by ID.
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("customer {}", id))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_is_exhaustive() {
        let alex = Customer::new(None, "Alex".into(), "+447000000000".into()).unwrap();

        assert_eq!(reconcile(None, "Alex"), Registration::New);
        assert_eq!(
            reconcile(Some(&alex), "Alex"),
            Registration::AlreadyRegistered
        );
        assert_eq!(
            reconcile(Some(&alex), "John"),
            Registration::PhoneNumberTaken
        );
    }

    #[test]
    fn test_name_comparison_is_exact() {
        let alex = Customer::new(None, "Alex".into(), "+447000000000".into()).unwrap();
        assert_eq!(
            reconcile(Some(&alex), "alex"),
            Registration::PhoneNumberTaken
        );
    }
}
