//! Application Services
//!
//! Orchestrate domain rules through the port traits.
//! Contain NO infrastructure logic - pure business orchestration.

mod charging;
mod registration;

pub use charging::PaymentService;
pub use registration::CustomerRegistrationService;
