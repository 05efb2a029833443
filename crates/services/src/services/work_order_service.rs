//! Work-order reads that always produce something to show.
//!
//! A call walks a fixed sequence of stages and stops at the first that yields data:
//!
//! 1. fresh cache
//! 2. each [`FetchStrategy`] in [`FetchStrategy::CHAIN`] order; a strategy only counts
//!    when it succeeds with at least one row
//! 3. the last populated result set, however old
//! 4. the sentinel record (or [`WorkOrderFetch::Empty`] when that is disabled)
//!
//! Store errors never reach the caller. They are logged, and the outcome is tagged so
//! callers can tell live data from degraded data.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use chrono::{DateTime, Utc};
use db::models::work_order::WorkOrder;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};
use ts_rs::TS;

use super::{
    config::WorkOrderServiceConfig,
    fallback::sentinel_work_order,
    work_order_cache::WorkOrderCache,
    work_order_store::{FetchStrategy, WorkOrderStore},
};

/// Where a non-degraded result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Cache,
    Live { strategy: FetchStrategy },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegradedReason {
    /// Every strategy failed; serving the last populated result set
    StaleCache { last_updated: Option<DateTime<Utc>> },
    /// Every strategy failed and nothing was cached
    Sentinel,
}

#[derive(Debug, Clone)]
pub enum WorkOrderFetch {
    Fresh {
        items: Arc<[WorkOrder]>,
        source: DataSource,
    },
    Degraded {
        items: Arc<[WorkOrder]>,
        reason: DegradedReason,
    },
    /// Nothing live, nothing cached and the sentinel fallback is disabled
    Empty,
}

impl WorkOrderFetch {
    pub fn items(&self) -> &[WorkOrder] {
        match self {
            WorkOrderFetch::Fresh { items, .. } | WorkOrderFetch::Degraded { items, .. } => items,
            WorkOrderFetch::Empty => &[],
        }
    }

    pub fn into_items(self) -> Arc<[WorkOrder]> {
        match self {
            WorkOrderFetch::Fresh { items, .. } | WorkOrderFetch::Degraded { items, .. } => items,
            WorkOrderFetch::Empty => Arc::from(Vec::new()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !matches!(self, WorkOrderFetch::Fresh { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CacheHealth {
    /// Populated and inside the validity window
    Healthy,
    /// Populated but past the validity window
    Stale,
    /// The most recent fetch fell back to stale or placeholder data
    Degraded,
    /// Never populated, or cleared
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CacheStatus {
    pub size: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub health: CacheHealth,
    pub last_strategy: Option<FetchStrategy>,
    pub validity_window_secs: u64,
}

pub struct WorkOrderService<S> {
    store: S,
    config: WorkOrderServiceConfig,
    cache: RwLock<WorkOrderCache>,
    degraded: AtomicBool,
    refresh_gate: Mutex<()>,
}

impl<S: WorkOrderStore> WorkOrderService<S> {
    pub fn new(store: S, config: WorkOrderServiceConfig) -> Self {
        let cache = WorkOrderCache::new(config.validity_window);
        Self {
            store,
            config,
            cache: RwLock::new(cache),
            degraded: AtomicBool::new(false),
            refresh_gate: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &WorkOrderServiceConfig {
        &self.config
    }

    /// Every work order that can currently be shown. Never fails; see [`Self::fetch`]
    /// to find out whether the data is degraded.
    pub async fn get_all(&self) -> Arc<[WorkOrder]> {
        self.fetch().await.into_items()
    }

    pub async fn fetch(&self) -> WorkOrderFetch {
        if let Some(items) = self.cached_if_fresh().await {
            return items;
        }

        if self.config.coalesce_in_flight {
            let _gate = self.refresh_gate.lock().await;
            // A caller ahead of us may have refreshed while we waited
            if let Some(items) = self.cached_if_fresh().await {
                return items;
            }
            return self.refresh().await;
        }

        self.refresh().await
    }

    pub async fn get_cache_status(&self) -> CacheStatus {
        let cache = self.cache.read().await;
        let health = if self.degraded.load(Ordering::Acquire) {
            CacheHealth::Degraded
        } else if cache.is_fresh() {
            CacheHealth::Healthy
        } else if cache.entry().is_some() {
            CacheHealth::Stale
        } else {
            CacheHealth::Empty
        };

        CacheStatus {
            size: cache.len(),
            last_updated: cache.last_updated(),
            health,
            last_strategy: cache.entry().map(|entry| entry.strategy),
            validity_window_secs: cache.validity_window().as_secs(),
        }
    }

    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        let dropped = cache.len();
        cache.invalidate();
        self.degraded.store(false, Ordering::Release);
        info!(dropped, "Work order cache cleared");
    }

    async fn cached_if_fresh(&self) -> Option<WorkOrderFetch> {
        let items = self.cache.read().await.fresh_items()?;
        debug!(count = items.len(), "Serving work orders from fresh cache");
        Some(WorkOrderFetch::Fresh {
            items,
            source: DataSource::Cache,
        })
    }

    async fn refresh(&self) -> WorkOrderFetch {
        for strategy in FetchStrategy::CHAIN {
            let Some(items) = self.try_strategy(strategy).await else {
                continue;
            };

            self.cache.write().await.populate(items.clone(), strategy);
            self.degraded.store(false, Ordering::Release);
            info!(%strategy, count = items.len(), "Work orders loaded");
            return WorkOrderFetch::Fresh {
                items,
                source: DataSource::Live { strategy },
            };
        }

        self.fall_back().await
    }

    /// Failed and empty results both yield `None` so the chain moves on.
    async fn try_strategy(&self, strategy: FetchStrategy) -> Option<Arc<[WorkOrder]>> {
        debug!(%strategy, "Attempting work order fetch");
        match self.store.fetch_rows(strategy).await {
            Ok(rows) if rows.is_empty() => {
                warn!(%strategy, "Work order fetch returned no rows, trying next strategy");
                None
            }
            Ok(rows) => Some(rows.into_iter().map(WorkOrder::from).collect()),
            Err(e) => {
                warn!(%strategy, error = %e, "Work order fetch failed, trying next strategy");
                None
            }
        }
    }

    async fn fall_back(&self) -> WorkOrderFetch {
        {
            let cache = self.cache.read().await;
            // Another caller may have populated the cache while our chain was failing
            if let Some(items) = cache.fresh_items() {
                return WorkOrderFetch::Fresh {
                    items,
                    source: DataSource::Cache,
                };
            }

            if let Some(items) = cache.any_items() {
                let last_updated = cache.last_updated();
                self.degraded.store(true, Ordering::Release);
                warn!(
                    count = items.len(),
                    last_updated = ?last_updated,
                    "All work order strategies failed, serving stale cache"
                );
                return WorkOrderFetch::Degraded {
                    items,
                    reason: DegradedReason::StaleCache { last_updated },
                };
            }
        }

        self.degraded.store(true, Ordering::Release);
        if self.config.sentinel_fallback {
            error!("All work order strategies failed with nothing cached, serving sentinel record");
            WorkOrderFetch::Degraded {
                items: Arc::from(vec![sentinel_work_order()]),
                reason: DegradedReason::Sentinel,
            }
        } else {
            error!("All work order strategies failed with nothing cached");
            WorkOrderFetch::Empty
        }
    }
}
