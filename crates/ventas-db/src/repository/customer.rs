//! # Customer Repository
//!
//! Database operations for the customer registry. Customers are unique by
//! RUT; a second registration with the same RUT fails with
//! `DbError::UniqueViolation`.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use ventas_core::{Customer, NewCustomer};

const CUSTOMER_COLUMNS: &str = "id, rut, full_name, email, address, phone, created_at";

pub(crate) async fn fetch_by_id(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(customer)
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists all customers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY full_name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_id(&mut conn, id).await
    }

    /// Gets a customer by RUT.
    pub async fn get_by_rut(&self, rut: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE rut = ?1"
        ))
        .bind(rut.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Registers a new customer with a generated id.
    pub async fn insert(&self, input: &NewCustomer) -> DbResult<Customer> {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            rut: input.rut.trim().to_string(),
            full_name: input.full_name.trim().to_string(),
            email: input.email.clone(),
            address: input.address.clone(),
            phone: input.phone.clone(),
            created_at: Utc::now(),
        };

        debug!(id = %customer.id, rut = %customer.rut, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, rut, full_name, email, address, phone, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.rut)
        .bind(&customer.full_name)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&customer.phone)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Counts registered customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};

    fn juan() -> NewCustomer {
        NewCustomer {
            rut: "12345678-9".to_string(),
            full_name: "Juan Perez".to_string(),
            email: Some("juan@example.com".to_string()),
            address: None,
            phone: Some("+56 9 1234 5678".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let customer = repo.insert(&juan()).await.unwrap();
        let by_id = repo.get_by_id(&customer.id).await.unwrap().unwrap();
        let by_rut = repo.get_by_rut("12345678-9").await.unwrap().unwrap();

        assert_eq!(by_id.rut, customer.rut);
        assert_eq!(by_id.email.as_deref(), Some("juan@example.com"));
        assert!(by_id.address.is_none());
        assert_eq!(by_rut.id, customer.id);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_rut_is_unique_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&juan()).await.unwrap();
        let err = repo.insert(&juan()).await.unwrap_err();
        assert!(err.is_unique_violation_on("customers.rut"), "{err:?}");
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
