//! # Billing Hex
//!
//! Application service layer and HTTP adapter for the billing service.
//!
//! ## Architecture
//!
//! - `service/` - Application services (customer registration, card payments)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The services are generic over the port traits, allowing different
//! repository and card-provider implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use service::{CustomerRegistrationService, PaymentService};
