use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use strum_macros::{Display, EnumString};
use tracing::warn;
use ts_rs::TS;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WorkOrderStatus {
    #[default]
    Pending,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WorkOrderPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Parse a stored enum value, falling back to the default for anything unknown.
/// Accepts `in-progress` and `in progress` as spellings of `in_progress`.
fn parse_or_default<T>(value: Option<&str>) -> T
where
    T: std::str::FromStr + Default,
{
    value
        .map(|v| v.trim().replace(['-', ' '], "_"))
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a stored timestamp: RFC 3339, SQLite's `datetime()` text (read as UTC),
/// or a bare date at midnight UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Unparseable values are dropped so one bad row never sinks the result set
fn timestamp_column(
    id: &str,
    column: &'static str,
    value: Option<String>,
) -> Option<DateTime<Utc>> {
    let value = value?;
    let parsed = parse_timestamp(&value);
    if parsed.is_none() {
        warn!(work_order_id = id, column, value = %value, "Ignoring unparseable timestamp");
    }
    parsed
}

pub const UNKNOWN_CUSTOMER_NAME: &str = "Unknown Customer";
pub const UNKNOWN_VEHICLE_MAKE: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct CustomerSummary {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Default for CustomerSummary {
    fn default() -> Self {
        Self {
            name: UNKNOWN_CUSTOMER_NAME.to_string(),
            email: String::new(),
            phone: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct VehicleSummary {
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub license_plate: String,
    pub vin: String,
}

impl Default for VehicleSummary {
    fn default() -> Self {
        Self {
            make: UNKNOWN_VEHICLE_MAKE.to_string(),
            model: String::new(),
            year: None,
            license_plate: String::new(),
            vin: String::new(),
        }
    }
}

/// Work order as handed to consumers. Every field carries a value; gaps in the
/// source row are filled in by `From<WorkOrderRow>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct WorkOrder {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: WorkOrderStatus,
    pub priority: WorkOrderPriority,
    pub customer_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub customer: CustomerSummary,
    pub vehicle: VehicleSummary,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape shared by every read query. The joined `customer_*` / `vehicle_*`
/// columns are only selected by the enhanced query and default to `None`
/// when absent from the result set. Timestamps and the vehicle year are read as
/// text and parsed in `From<WorkOrderRow>`, since SQLite does not enforce column types.
#[derive(Debug, Clone, Default, FromRow)]
pub struct WorkOrderRow {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub customer_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub due_date: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[sqlx(default)]
    pub customer_name: Option<String>,
    #[sqlx(default)]
    pub customer_email: Option<String>,
    #[sqlx(default)]
    pub customer_phone: Option<String>,
    #[sqlx(default)]
    pub vehicle_make: Option<String>,
    #[sqlx(default)]
    pub vehicle_model: Option<String>,
    #[sqlx(default)]
    pub vehicle_year: Option<String>,
    #[sqlx(default)]
    pub vehicle_license_plate: Option<String>,
    #[sqlx(default)]
    pub vehicle_vin: Option<String>,
}

impl From<WorkOrderRow> for WorkOrder {
    fn from(row: WorkOrderRow) -> Self {
        let customer_defaults = CustomerSummary::default();
        let vehicle_defaults = VehicleSummary::default();
        let due_date = timestamp_column(&row.id, "due_date", row.due_date);
        let created_at = timestamp_column(&row.id, "created_at", row.created_at)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let updated_at =
            timestamp_column(&row.id, "updated_at", row.updated_at).unwrap_or(created_at);
        let year = row
            .vehicle_year
            .and_then(|year| year.trim().parse::<i32>().ok());

        WorkOrder {
            title: row
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| format!("Work Order {}", row.id)),
            description: row.description.unwrap_or_default(),
            status: parse_or_default(row.status.as_deref()),
            priority: parse_or_default(row.priority.as_deref()),
            customer_id: row.customer_id,
            vehicle_id: row.vehicle_id,
            customer: CustomerSummary {
                name: row.customer_name.unwrap_or(customer_defaults.name),
                email: row.customer_email.unwrap_or(customer_defaults.email),
                phone: row.customer_phone.unwrap_or(customer_defaults.phone),
            },
            vehicle: VehicleSummary {
                make: row.vehicle_make.unwrap_or(vehicle_defaults.make),
                model: row.vehicle_model.unwrap_or(vehicle_defaults.model),
                year,
                license_plate: row
                    .vehicle_license_plate
                    .unwrap_or(vehicle_defaults.license_plate),
                vin: row.vehicle_vin.unwrap_or(vehicle_defaults.vin),
            },
            due_date,
            created_at,
            updated_at,
            id: row.id,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct CreateWorkOrder {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<WorkOrderStatus>,
    pub priority: Option<WorkOrderPriority>,
    pub customer_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

const ENHANCED_SQL: &str = r#"SELECT
  wo.id,
  wo.title,
  wo.description,
  wo.status,
  wo.priority,
  wo.customer_id,
  wo.vehicle_id,
  wo.due_date,
  wo.created_at,
  wo.updated_at,
  c.name          AS customer_name,
  c.email         AS customer_email,
  c.phone         AS customer_phone,
  v.make          AS vehicle_make,
  v.model         AS vehicle_model,
  CAST(v.year AS TEXT) AS vehicle_year,
  v.license_plate AS vehicle_license_plate,
  v.vin           AS vehicle_vin
FROM work_orders wo
LEFT JOIN customers c ON c.id = wo.customer_id
LEFT JOIN vehicles v ON v.id = wo.vehicle_id
ORDER BY wo.created_at DESC, wo.id ASC"#;

const BASIC_SQL: &str = r#"SELECT id, title, description, status, priority, customer_id, vehicle_id,
       due_date, created_at, updated_at
FROM work_orders
ORDER BY created_at DESC, id ASC"#;

impl WorkOrderRow {
    /// Work orders with their customer and vehicle joined in
    pub async fn fetch_enhanced(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, WorkOrderRow>(ENHANCED_SQL)
            .fetch_all(pool)
            .await
    }

    /// Flat work-order columns only
    pub async fn fetch_basic(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, WorkOrderRow>(BASIC_SQL)
            .fetch_all(pool)
            .await
    }

    /// Same shape as [`Self::fetch_basic`], sent as an unprepared statement.
    pub async fn fetch_raw(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::raw_sql(BASIC_SQL).fetch_all(pool).await?;
        rows.iter().map(WorkOrderRow::from_row).collect()
    }
}

impl WorkOrder {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateWorkOrder,
        id: &str,
    ) -> Result<Self, sqlx::Error> {
        let status = data.status.unwrap_or_default();
        let priority = data.priority.unwrap_or_default();
        let row = sqlx::query_as::<_, WorkOrderRow>(
            r#"INSERT INTO work_orders (id, title, description, status, priority, customer_id, vehicle_id, due_date)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING id, title, description, status, priority, customer_id, vehicle_id, due_date, created_at, updated_at"#,
        )
            .bind(id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(status.to_string())
            .bind(priority.to_string())
            .bind(&data.customer_id)
            .bind(&data.vehicle_id)
            .bind(data.due_date)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM work_orders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
