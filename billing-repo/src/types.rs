//! Database row types for the SQL adapters.
//!
//! SQLite stores ids, amounts and timestamps as TEXT; PostgreSQL uses native
//! UUID, NUMERIC and TIMESTAMPTZ columns. Each backend gets its own rows.

use sqlx::FromRow;

use billing_types::{Currency, Customer, CustomerId, Money, Payment, PaymentId, RepoError};

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_currency(s: &str) -> Result<Currency, RepoError> {
    match s {
        "USD" => Ok(Currency::USD),
        "GBP" => Ok(Currency::GBP),
        "EUR" => Ok(Currency::EUR),
        _ => Err(RepoError::Database(format!("Unknown currency: {}", s))),
    }
}

/// Maps a failed write, reporting constraint violations as conflicts.
pub fn write_error(e: sqlx::Error, what: &str) -> RepoError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepoError::Conflict(format!("{} already exists", what))
        }
        _ => RepoError::Database(e.to_string()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite rows
// ─────────────────────────────────────────────────────────────────────────────

/// Customer row from SQLite.
#[cfg(feature = "sqlite")]
#[derive(FromRow)]
pub struct SqliteCustomer {
    pub id: String,
    pub name: String,
    pub phone_number: String,
}

#[cfg(feature = "sqlite")]
impl SqliteCustomer {
    pub fn into_domain(self) -> Result<Customer, RepoError> {
        let uuid =
            uuid::Uuid::parse_str(&self.id).map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(Customer::from_parts(
            CustomerId::from_uuid(uuid),
            self.name,
            self.phone_number,
        ))
    }
}

/// Payment row from SQLite.
#[cfg(feature = "sqlite")]
#[derive(FromRow)]
pub struct SqlitePayment {
    pub id: i64,
    pub customer_id: String,
    pub amount: String,
    pub currency: String,
    pub source: String,
    pub description: String,
    pub created_at: String,
}

#[cfg(feature = "sqlite")]
impl SqlitePayment {
    pub fn into_domain(self) -> Result<Payment, RepoError> {
        let customer_id = uuid::Uuid::parse_str(&self.customer_id)
            .map_err(|e| RepoError::Database(e.to_string()))?;
        let amount = self
            .amount
            .parse::<rust_decimal::Decimal>()
            .map_err(|e| RepoError::Database(e.to_string()))?;
        let money = Money::new(amount, parse_currency(&self.currency)?)?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| RepoError::Database(e.to_string()))?
            .with_timezone(&chrono::Utc);

        Ok(Payment {
            id: PaymentId::new(self.id),
            customer_id: CustomerId::from_uuid(customer_id),
            amount: money,
            source: self.source,
            description: self.description,
            created_at,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL rows
// ─────────────────────────────────────────────────────────────────────────────

/// Customer row from PostgreSQL.
#[cfg(feature = "postgres")]
#[derive(FromRow)]
pub struct PgCustomer {
    pub id: uuid::Uuid,
    pub name: String,
    pub phone_number: String,
}

#[cfg(feature = "postgres")]
impl From<PgCustomer> for Customer {
    fn from(row: PgCustomer) -> Self {
        Customer::from_parts(CustomerId::from_uuid(row.id), row.name, row.phone_number)
    }
}

/// Payment row from PostgreSQL.
#[cfg(feature = "postgres")]
#[derive(FromRow)]
pub struct PgPayment {
    pub id: i64,
    pub customer_id: uuid::Uuid,
    pub amount: rust_decimal::Decimal,
    pub currency: String,
    pub source: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(feature = "postgres")]
impl PgPayment {
    pub fn into_domain(self) -> Result<Payment, RepoError> {
        let money = Money::new(self.amount, parse_currency(&self.currency)?)?;

        Ok(Payment {
            id: PaymentId::new(self.id),
            customer_id: CustomerId::from_uuid(self.customer_id),
            amount: money,
            source: self.source,
            description: self.description,
            created_at: self.created_at,
        })
    }
}
