use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Vehicle {
    pub id: String,
    pub customer_id: Option<String>, // Owning customer, if known
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct CreateVehicle {
    pub customer_id: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
}

impl Vehicle {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateVehicle,
        id: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Vehicle>(
            r#"INSERT INTO vehicles (id, customer_id, make, model, year, license_plate, vin)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id, customer_id, make, model, year, license_plate, vin, created_at"#,
        )
            .bind(id)
            .bind(&data.customer_id)
            .bind(&data.make)
            .bind(&data.model)
            .bind(data.year)
            .bind(&data.license_plate)
            .bind(&data.vin)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Vehicle>(
            r#"SELECT id, customer_id, make, model, year, license_plate, vin, created_at
               FROM vehicles
               WHERE id = $1"#,
        )
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_customer_id(
        pool: &SqlitePool,
        customer_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Vehicle>(
            r#"SELECT id, customer_id, make, model, year, license_plate, vin, created_at
               FROM vehicles
               WHERE customer_id = $1
               ORDER BY created_at DESC"#,
        )
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DBService,
        models::customer::{CreateCustomer, Customer},
    };

    #[tokio::test]
    async fn test_vehicle_belongs_to_customer() {
        let db = DBService::new_in_memory().await.unwrap();
        Customer::create(
            &db.pool,
            &CreateCustomer {
                name: "Fleet Co".to_string(),
                email: None,
                phone: None,
            },
            "cust-1",
        )
        .await
        .unwrap();

        let data = CreateVehicle {
            customer_id: Some("cust-1".to_string()),
            make: Some("Ford".to_string()),
            model: Some("F-150".to_string()),
            year: Some(2019),
            ..Default::default()
        };
        Vehicle::create(&db.pool, &data, "veh-1").await.unwrap();

        let found = Vehicle::find_by_id(&db.pool, "veh-1").await.unwrap().unwrap();
        assert_eq!(found.year, Some(2019));
        assert!(found.vin.is_none());

        let owned = Vehicle::find_by_customer_id(&db.pool, "cust-1").await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, "veh-1");
    }
}
