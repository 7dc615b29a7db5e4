//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use billing_types::{
    Customer, CustomerId, CustomerRepository, NewPayment, Payment, PaymentId, PaymentRepository,
    RepoError,
};

use crate::types::{SqliteCustomer, SqlitePayment, write_error};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &SqlitePool, sql: &str, name: &str) -> anyhow::Result<()> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_customers.sql"),
        "0001",
    )
    .await?;
    execute_migration(
        pool,
        include_str!("../migrations/0002_create_payments.sql"),
        "0002",
    )
    .await
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // A single connection keeps `sqlite::memory:` databases from splitting per connection.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema.
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Customers
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CustomerRepository for SqliteRepo {
    async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<Customer>, RepoError> {
        let row: Option<SqliteCustomer> = sqlx::query_as(
            r#"SELECT id, name, phone_number FROM customers WHERE phone_number = ?"#,
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(SqliteCustomer::into_domain).transpose()
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepoError> {
        let row: Option<SqliteCustomer> =
            sqlx::query_as(r#"SELECT id, name, phone_number FROM customers WHERE id = ?"#)
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(SqliteCustomer::into_domain).transpose()
    }

    async fn save(&self, customer: Customer) -> Result<(), RepoError> {
        sqlx::query(r#"INSERT INTO customers (id, name, phone_number) VALUES (?, ?, ?)"#)
            .bind(customer.id.to_string())
            .bind(&customer.name)
            .bind(&customer.phone_number)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "customer"))?;

        tracing::debug!(customer_id = %customer.id, "customer row inserted");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payments
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentRepository for SqliteRepo {
    async fn save(&self, payment: NewPayment) -> Result<Payment, RepoError> {
        let now = chrono::Utc::now();

        let result = sqlx::query(
            r#"INSERT INTO payments (customer_id, amount, currency, source, description, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(payment.customer_id.to_string())
        .bind(payment.amount.amount().to_string())
        .bind(payment.amount.currency().to_string())
        .bind(&payment.source)
        .bind(&payment.description)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, "payment"))?;

        let id = PaymentId::new(result.last_insert_rowid());
        Ok(Payment::from_new(id, payment, now))
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        let row: Option<SqlitePayment> = sqlx::query_as(
            r#"SELECT id, customer_id, amount, currency, source, description, created_at
               FROM payments WHERE id = ?"#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(SqlitePayment::into_domain).transpose()
    }

    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Payment>, RepoError> {
        let rows: Vec<SqlitePayment> = sqlx::query_as(
            r#"SELECT id, customer_id, amount, currency, source, description, created_at
               FROM payments WHERE customer_id = ? ORDER BY id DESC"#,
        )
        .bind(customer_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(SqlitePayment::into_domain).collect()
    }
}
