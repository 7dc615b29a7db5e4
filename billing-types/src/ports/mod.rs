//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod charger;
mod repository;

pub use charger::CardCharger;
pub use repository::{BillingRepository, CustomerRepository, PaymentRepository};

/// Decides whether a phone number is acceptable for registration.
pub trait PhoneNumberValidator: Send + Sync + 'static {
    fn is_valid(&self, phone_number: &str) -> bool;
}
