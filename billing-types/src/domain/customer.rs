//! Customer domain model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for a Customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

impl CustomerId {
    /// Creates a new random CustomerId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a CustomerId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CustomerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A registered customer.
///
/// The phone number is the natural key: no two customers share one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    /// Unique identifier, immutable once assigned
    pub id: CustomerId,
    /// Display name
    #[schema(example = "Alex")]
    pub name: String,
    /// Phone number, unique across all customers
    #[schema(example = "+447000000000")]
    pub phone_number: String,
}

impl Customer {
    /// Creates a customer, assigning a fresh id when none is supplied.
    ///
    /// # Validation
    /// - Name cannot be blank
    /// - Phone number cannot be blank
    pub fn new(
        id: Option<CustomerId>,
        name: String,
        phone_number: String,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Customer name cannot be empty".into(),
            ));
        }
        if phone_number.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Phone number cannot be empty".into(),
            ));
        }

        Ok(Self {
            id: id.unwrap_or_default(),
            name,
            phone_number,
        })
    }

    /// Creates a customer with all fields specified (for database reconstruction).
    pub fn from_parts(id: CustomerId, name: String, phone_number: String) -> Self {
        Self {
            id,
            name,
            phone_number,
        }
    }

    /// Whether a registration under `name` is this same customer.
    ///
    /// Two registrations with one phone number are the same customer
    /// exactly when their names match.
    pub fn is_same_customer(&self, name: &str) -> bool {
        self.name == name
    }
}
