//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Currency, Customer, CustomerId, Payment};

// ─────────────────────────────────────────────────────────────────────────────
// Customer DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Customer fields supplied on registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerDetails {
    /// Optional client-chosen identifier; assigned when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    #[schema(example = "Alex")]
    pub name: String,
    #[schema(example = "+447000000000")]
    pub phone_number: String,
}

/// Request to register a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerRegistrationRequest {
    pub customer: CustomerDetails,
}

impl CustomerRegistrationRequest {
    pub fn new(id: Option<CustomerId>, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            customer: CustomerDetails {
                id,
                name: name.into(),
                phone_number: phone.into(),
            },
        }
    }
}

/// Customer as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: CustomerId,
    #[schema(example = "Alex")]
    pub name: String,
    #[schema(example = "+447000000000")]
    pub phone_number: String,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            name: c.name,
            phone_number: c.phone_number,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Payment fields supplied when charging a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentDetails {
    /// Must be absent: payment ids are assigned by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i64>)]
    pub id: Option<i64>,
    /// Ignored when the customer is given in the path; overwritten on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    /// Amount in major units, e.g. "10.50"
    #[schema(value_type = String, example = "10.00")]
    pub amount: Decimal,
    pub currency: Currency,
    /// Card or source token understood by the card provider
    #[schema(example = "tok_visa")]
    pub source: String,
    #[schema(example = "Shoes")]
    pub description: String,
}

/// Request to charge a customer's card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentRequest {
    pub payment: PaymentDetails,
}

impl PaymentRequest {
    pub fn new(
        amount: Decimal,
        currency: Currency,
        source: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            payment: PaymentDetails {
                id: None,
                customer_id: None,
                amount,
                currency,
                source: source.into(),
                description: description.into(),
            },
        }
    }

    /// Sets the customer embedded in the body.
    pub fn for_customer(mut self, customer_id: CustomerId) -> Self {
        self.payment.customer_id = Some(customer_id);
        self
    }
}

/// Payment as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    #[schema(example = 1)]
    pub id: i64,
    pub customer_id: CustomerId,
    #[schema(value_type = String, example = "10.00")]
    pub amount: Decimal,
    pub currency: Currency,
    pub source: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id.value(),
            customer_id: p.customer_id,
            amount: p.amount.amount(),
            currency: p.amount.currency(),
            source: p.source,
            description: p.description,
            created_at: p.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_registration_request_without_id() {
        let req: CustomerRegistrationRequest = serde_json::from_str(
            r#"{"customer": {"name": "James", "phone_number": "+447000000000"}}"#,
        )
        .unwrap();

        assert!(req.customer.id.is_none());
        assert_eq!(req.customer.name, "James");
    }

    #[test]
    fn test_payment_request_accepts_numeric_amount() {
        let req: PaymentRequest = serde_json::from_str(
            r#"{"payment": {"amount": 10, "currency": "USD", "source": "23123", "description": "Description"}}"#,
        )
        .unwrap();

        assert_eq!(req.payment.amount, dec!(10));
        assert_eq!(req.payment.currency, Currency::USD);
        assert!(req.payment.id.is_none());
    }

    #[test]
    fn test_payment_request_accepts_string_amount() {
        let req: PaymentRequest = serde_json::from_str(
            r#"{"payment": {"amount": "1000.00", "currency": "GBP", "source": "0x0x0x0", "description": "Shoes"}}"#,
        )
        .unwrap();

        assert_eq!(req.payment.amount, dec!(1000.00));
    }
}
