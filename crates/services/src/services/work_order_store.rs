//! Read seam between the work-order service and whatever backs it.

use std::sync::Arc;

use async_trait::async_trait;
use db::{DBService, models::work_order::WorkOrderRow};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use thiserror::Error;
use ts_rs::TS;

#[derive(Debug, Error)]
pub enum WorkOrderStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Query shapes tried against the store, richest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FetchStrategy {
    /// Work orders with customer and vehicle joined in
    Enhanced,
    /// Flat work-order columns
    Basic,
    /// Flat columns over the unprepared statement path
    Raw,
}

impl FetchStrategy {
    /// Order in which strategies are attempted
    pub const CHAIN: [FetchStrategy; 3] = [
        FetchStrategy::Enhanced,
        FetchStrategy::Basic,
        FetchStrategy::Raw,
    ];
}

#[async_trait]
pub trait WorkOrderStore: Send + Sync {
    async fn fetch_rows(
        &self,
        strategy: FetchStrategy,
    ) -> Result<Vec<WorkOrderRow>, WorkOrderStoreError>;
}

#[async_trait]
impl<T: WorkOrderStore + ?Sized> WorkOrderStore for Arc<T> {
    async fn fetch_rows(
        &self,
        strategy: FetchStrategy,
    ) -> Result<Vec<WorkOrderRow>, WorkOrderStoreError> {
        (**self).fetch_rows(strategy).await
    }
}

#[async_trait]
impl WorkOrderStore for DBService {
    async fn fetch_rows(
        &self,
        strategy: FetchStrategy,
    ) -> Result<Vec<WorkOrderRow>, WorkOrderStoreError> {
        let rows = match strategy {
            FetchStrategy::Enhanced => WorkOrderRow::fetch_enhanced(&self.pool).await?,
            FetchStrategy::Basic => WorkOrderRow::fetch_basic(&self.pool).await?,
            FetchStrategy::Raw => WorkOrderRow::fetch_raw(&self.pool).await?,
        };
        Ok(rows)
    }
}
