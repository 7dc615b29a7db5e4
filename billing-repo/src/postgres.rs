//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::PgPool;

use billing_types::{
    Customer, CustomerId, CustomerRepository, NewPayment, Payment, PaymentId, PaymentRepository,
    RepoError,
};

use crate::types::{PgCustomer, PgPayment, write_error};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository. Phone uniqueness is enforced by the schema.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
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

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_customers_pg.sql"),
        "0001",
    )
    .await?;

    execute_migration(
        pool,
        include_str!("../migrations/0002_create_payments_pg.sql"),
        "0002",
    )
    .await?;

    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
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
impl CustomerRepository for PostgresRepo {
    async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<Customer>, RepoError> {
        let row: Option<PgCustomer> = sqlx::query_as(
            r#"SELECT id, name, phone_number FROM customers WHERE phone_number = $1"#,
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(row.map(Customer::from))
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepoError> {
        let row: Option<PgCustomer> =
            sqlx::query_as(r#"SELECT id, name, phone_number FROM customers WHERE id = $1"#)
                .bind(id.into_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(row.map(Customer::from))
    }

    async fn save(&self, customer: Customer) -> Result<(), RepoError> {
        sqlx::query(r#"INSERT INTO customers (id, name, phone_number) VALUES ($1, $2, $3)"#)
            .bind(customer.id.into_uuid())
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
impl PaymentRepository for PostgresRepo {
    async fn save(&self, payment: NewPayment) -> Result<Payment, RepoError> {
        let row: PgPayment = sqlx::query_as(
            r#"INSERT INTO payments (customer_id, amount, currency, source, description)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, customer_id, amount, currency, source, description, created_at"#,
        )
        .bind(payment.customer_id.into_uuid())
        .bind(payment.amount.amount())
        .bind(payment.amount.currency().to_string())
        .bind(&payment.source)
        .bind(&payment.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "payment"))?;

        row.into_domain()
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        let row: Option<PgPayment> = sqlx::query_as(
            r#"SELECT id, customer_id, amount, currency, source, description, created_at
               FROM payments WHERE id = $1"#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(PgPayment::into_domain).transpose()
    }

    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Payment>, RepoError> {
        let rows: Vec<PgPayment> = sqlx::query_as(
            r#"SELECT id, customer_id, amount, currency, source, description, created_at
               FROM payments WHERE customer_id = $1 ORDER BY id DESC"#,
        )
        .bind(customer_id.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(PgPayment::into_domain).collect()
    }
}
