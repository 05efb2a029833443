use std::sync::Arc;

use axum::Router;
use db::DBService;
use services::services::work_order_service::WorkOrderService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub work_orders: Arc<WorkOrderService<DBService>>,
}

impl AppState {
    pub fn new(db: DBService, work_orders: WorkOrderService<DBService>) -> Self {
        Self {
            db,
            work_orders: Arc::new(work_orders),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::router(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
