//! Domain models for the billing service.

pub mod charge;
pub mod customer;
pub mod money;
pub mod payment;
pub mod phone;

pub use charge::CardCharge;
pub use customer::{Customer, CustomerId};
pub use money::{AcceptedCurrencies, Currency, Money};
pub use payment::{NewPayment, Payment, PaymentId};
pub use phone::PhoneNumberRules;
