//! Payment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::customer::CustomerId;
use super::money::Money;

/// Identifier of a persisted Payment, assigned by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(i64);

impl PaymentId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PaymentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A payment that has been debited but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub customer_id: CustomerId,
    pub amount: Money,
    /// Opaque token for the charged instrument (card, source id)
    pub source: String,
    pub description: String,
}

impl NewPayment {
    pub fn new(customer_id: CustomerId, amount: Money, source: String, description: String) -> Self {
        Self {
            customer_id,
            amount,
            source,
            description,
        }
    }
}

/// A recorded payment.
///
/// Payments are immutable once created: each one is the record of a
/// single confirmed debit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Identifier assigned on persistence
    pub id: PaymentId,
    /// Customer the card belongs to
    pub customer_id: CustomerId,
    /// Amount and currency charged
    #[serde(flatten)]
    pub amount: Money,
    /// Charged instrument
    pub source: String,
    /// Human-readable description
    pub description: String,
    /// When the payment was recorded
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Stamps a pending payment with its persisted identity.
    pub fn from_new(id: PaymentId, new: NewPayment, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            customer_id: new.customer_id,
            amount: new.amount,
            source: new.source,
            description: new.description,
            created_at,
        }
    }
}
