//! Placeholder record served when neither the store nor the cache has data.

use chrono::{DateTime, Utc};
use db::models::work_order::{
    CustomerSummary, VehicleSummary, WorkOrder, WorkOrderPriority, WorkOrderStatus,
};

pub const SENTINEL_WORK_ORDER_ID: &str = "fallback-1";
const SENTINEL_LABEL: &str = "System Fallback";

pub fn sentinel_work_order() -> WorkOrder {
    WorkOrder {
        id: SENTINEL_WORK_ORDER_ID.to_string(),
        title: "System Fallback Work Order".to_string(),
        description: "Work orders could not be loaded. This record is a placeholder.".to_string(),
        status: WorkOrderStatus::Pending,
        priority: WorkOrderPriority::Medium,
        customer_id: None,
        vehicle_id: None,
        customer: CustomerSummary {
            name: SENTINEL_LABEL.to_string(),
            ..Default::default()
        },
        vehicle: VehicleSummary {
            make: SENTINEL_LABEL.to_string(),
            ..Default::default()
        },
        due_date: None,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
        updated_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

pub fn is_sentinel(order: &WorkOrder) -> bool {
    order.id == SENTINEL_WORK_ORDER_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_stable() {
        let a = sentinel_work_order();
        assert_eq!(a, sentinel_work_order());
        assert!(is_sentinel(&a));
        assert_eq!(a.customer.name, "System Fallback");
        assert_eq!(a.vehicle.make, "System Fallback");
    }
}
