use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Customer {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateCustomer,
        id: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Customer>(
            r#"INSERT INTO customers (id, name, email, phone)
               VALUES ($1, $2, $3, $4)
               RETURNING id, name, email, phone, created_at"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, created_at FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, created_at FROM customers ORDER BY name ASC",
        )
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;

    #[tokio::test]
    async fn test_create_and_find_customer() {
        let db = DBService::new_in_memory().await.unwrap();
        let data = CreateCustomer {
            name: "Dana Ruiz".to_string(),
            email: Some("dana@example.com".to_string()),
            phone: None,
        };

        let created = Customer::create(&db.pool, &data, "cust-1").await.unwrap();
        assert_eq!(created.name, "Dana Ruiz");

        let found = Customer::find_by_id(&db.pool, "cust-1").await.unwrap().unwrap();
        assert_eq!(found.email.as_deref(), Some("dana@example.com"));
        assert!(found.phone.is_none());

        assert!(Customer::find_by_id(&db.pool, "missing").await.unwrap().is_none());
        assert_eq!(Customer::find_all(&db.pool).await.unwrap().len(), 1);
    }
}
