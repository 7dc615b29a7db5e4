//! Card charging adapters.
//!
//! Implementations of the [`CardCharger`](billing_types::CardCharger) port:
//!
//! - [`StripeCardCharger`] talks to a Stripe-compatible charges API through
//!   the [`ChargeApi`] seam. [`HttpChargeApi`] is the reqwest-backed API.
//! - [`SimulatedCardCharger`] answers with a fixed outcome and does no IO.
//!
//! # Example
//! ```ignore
//! use card_gateway::{HttpChargeApi, StripeCardCharger};
//!
//! let api = HttpChargeApi::new("https://api.stripe.com");
//! let charger = StripeCardCharger::new(api, "sk_test_123");
//! ```

mod simulated;
mod stripe;

pub use simulated::SimulatedCardCharger;
pub use stripe::{
    ChargeApi, ChargeParams, HttpChargeApi, ProviderCharge, ProviderError, RequestOptions,
    StripeCardCharger,
};
