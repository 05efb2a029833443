//! Last known-good work-order result set with a fixed freshness window.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use db::models::work_order::WorkOrder;
use tokio::time::Instant;

use super::work_order_store::FetchStrategy;

#[derive(Debug, Clone)]
pub struct CachedResultSet {
    pub items: Arc<[WorkOrder]>,
    pub fetched_at: Instant,
    pub fetched_at_utc: DateTime<Utc>,
    pub strategy: FetchStrategy,
}

/// The result set is only ever replaced wholesale by [`WorkOrderCache::populate`]
/// or dropped by [`WorkOrderCache::invalidate`].
#[derive(Debug)]
pub struct WorkOrderCache {
    validity_window: Duration,
    entry: Option<CachedResultSet>,
}

impl WorkOrderCache {
    pub fn new(validity_window: Duration) -> Self {
        Self {
            validity_window,
            entry: None,
        }
    }

    pub fn validity_window(&self) -> Duration {
        self.validity_window
    }

    pub fn is_fresh(&self) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| entry.fetched_at.elapsed() < self.validity_window)
    }

    pub fn fresh_items(&self) -> Option<Arc<[WorkOrder]>> {
        if self.is_fresh() {
            self.entry.as_ref().map(|entry| entry.items.clone())
        } else {
            None
        }
    }

    /// Whatever was last populated, regardless of age
    pub fn any_items(&self) -> Option<Arc<[WorkOrder]>> {
        self.entry.as_ref().map(|entry| entry.items.clone())
    }

    pub fn entry(&self) -> Option<&CachedResultSet> {
        self.entry.as_ref()
    }

    pub fn populate(&mut self, items: Arc<[WorkOrder]>, strategy: FetchStrategy) {
        self.entry = Some(CachedResultSet {
            items,
            fetched_at: Instant::now(),
            fetched_at_utc: Utc::now(),
            strategy,
        });
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn len(&self) -> usize {
        self.entry.as_ref().map_or(0, |entry| entry.items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|entry| entry.fetched_at_utc)
    }
}

#[cfg(test)]
mod tests {
    use db::models::work_order::WorkOrderRow;

    use super::*;

    fn orders(ids: &[&str]) -> Arc<[WorkOrder]> {
        ids.iter()
            .map(|id| {
                WorkOrder::from(WorkOrderRow {
                    id: id.to_string(),
                    ..Default::default()
                })
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_freshness_window() {
        let mut cache = WorkOrderCache::new(Duration::from_secs(60));
        assert!(!cache.is_fresh());
        assert!(cache.any_items().is_none());
        assert!(cache.last_updated().is_none());

        cache.populate(orders(&["a", "b"]), FetchStrategy::Basic);
        assert!(cache.is_fresh());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.entry().unwrap().strategy, FetchStrategy::Basic);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.fresh_items().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!cache.is_fresh());
        assert!(cache.fresh_items().is_none());
        assert_eq!(cache.any_items().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_populate_replaces_and_resets_timestamp() {
        let mut cache = WorkOrderCache::new(Duration::from_secs(60));
        cache.populate(orders(&["a"]), FetchStrategy::Enhanced);
        tokio::time::advance(Duration::from_secs(90)).await;
        assert!(!cache.is_fresh());

        cache.populate(orders(&["b", "c"]), FetchStrategy::Raw);
        assert!(cache.is_fresh());
        let items = cache.fresh_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "b");
    }

    #[test]
    fn test_invalidate_clears_everything() {
        let mut cache = WorkOrderCache::new(Duration::from_secs(60));
        cache.populate(orders(&["a"]), FetchStrategy::Enhanced);
        cache.invalidate();

        assert!(!cache.is_fresh());
        assert!(cache.is_empty());
        assert!(cache.any_items().is_none());
        assert!(cache.last_updated().is_none());
    }
}
