//! Print TypeScript declarations for the types the front end consumes.

use db::models::{
    customer::{CreateCustomer, Customer},
    vehicle::{CreateVehicle, Vehicle},
    work_order::{
        CreateWorkOrder, CustomerSummary, VehicleSummary, WorkOrder, WorkOrderPriority,
        WorkOrderStatus,
    },
};
use server::routes::work_orders::WorkOrderFetchResponse;
use services::services::{
    work_order_service::{CacheHealth, CacheStatus, DataSource, DegradedReason},
    work_order_store::FetchStrategy,
};
use ts_rs::TS;

fn main() {
    let decls = [
        WorkOrderStatus::decl(),
        WorkOrderPriority::decl(),
        CustomerSummary::decl(),
        VehicleSummary::decl(),
        WorkOrder::decl(),
        CreateWorkOrder::decl(),
        Customer::decl(),
        CreateCustomer::decl(),
        Vehicle::decl(),
        CreateVehicle::decl(),
        FetchStrategy::decl(),
        DataSource::decl(),
        DegradedReason::decl(),
        CacheHealth::decl(),
        CacheStatus::decl(),
        WorkOrderFetchResponse::decl(),
    ];

    println!("// This file was generated by `cargo run --bin generate_types`. Do not edit.\n");
    for decl in decls {
        println!("export {decl}\n");
    }
}
