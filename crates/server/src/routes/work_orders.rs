//! Read-only work-order routes backed by the cached fallback service.

use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::work_order::WorkOrder;
use serde::{Deserialize, Serialize};
use services::services::work_order_service::{
    CacheStatus, DataSource, DegradedReason, WorkOrderFetch,
};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::AppState;

/// Tagged form of a work-order read, so the UI can flag degraded data
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkOrderFetchResponse {
    Fresh {
        source: DataSource,
        items: Vec<WorkOrder>,
    },
    Degraded {
        reason: DegradedReason,
        items: Vec<WorkOrder>,
    },
    Empty,
}

impl From<WorkOrderFetch> for WorkOrderFetchResponse {
    fn from(fetch: WorkOrderFetch) -> Self {
        match fetch {
            WorkOrderFetch::Fresh { items, source } => Self::Fresh {
                source,
                items: items.to_vec(),
            },
            WorkOrderFetch::Degraded { items, reason } => Self::Degraded {
                reason,
                items: items.to_vec(),
            },
            WorkOrderFetch::Empty => Self::Empty,
        }
    }
}

/// GET /api/work-orders
pub async fn get_work_orders(
    State(state): State<AppState>,
) -> ResponseJson<ApiResponse<Vec<WorkOrder>>> {
    let items = state.work_orders.get_all().await;
    ResponseJson(ApiResponse::success(items.to_vec()))
}

/// GET /api/work-orders/fetch
pub async fn fetch_work_orders(
    State(state): State<AppState>,
) -> ResponseJson<ApiResponse<WorkOrderFetchResponse>> {
    let fetch = state.work_orders.fetch().await;
    let response = if fetch.is_degraded() {
        ApiResponse::success_with_message(fetch.into(), "Work orders could not be loaded live")
    } else {
        ApiResponse::success(fetch.into())
    };
    ResponseJson(response)
}

/// GET /api/work-orders/cache
pub async fn get_cache_status(
    State(state): State<AppState>,
) -> ResponseJson<ApiResponse<CacheStatus>> {
    ResponseJson(ApiResponse::success(
        state.work_orders.get_cache_status().await,
    ))
}

/// DELETE /api/work-orders/cache
pub async fn clear_cache(State(state): State<AppState>) -> ResponseJson<ApiResponse<()>> {
    state.work_orders.clear_cache().await;
    ResponseJson(ApiResponse::success(()))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/work-orders",
        Router::new()
            .route("/", get(get_work_orders))
            .route("/fetch", get(fetch_work_orders))
            .route("/cache", get(get_cache_status).delete(clear_cache)),
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use db::{
        DBService,
        models::work_order::{CreateWorkOrder, WorkOrder},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use services::services::{
        config::WorkOrderServiceConfig, work_order_service::WorkOrderService,
    };
    use tower::ServiceExt;

    use crate::{AppState, router};

    async fn app() -> (axum::Router, DBService) {
        let db = DBService::new_in_memory().await.unwrap();
        let service = WorkOrderService::new(db.clone(), WorkOrderServiceConfig::default());
        (router(AppState::new(db.clone(), service)), db)
    }

    async fn call(app: &axum::Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_lists_work_orders_and_reports_cache() {
        let (app, db) = app().await;
        WorkOrder::create(
            &db.pool,
            &CreateWorkOrder {
                title: "Alignment".to_string(),
                ..Default::default()
            },
            "wo-1",
        )
        .await
        .unwrap();

        let (status, body) = call(&app, Method::GET, "/api/work-orders").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["id"], "wo-1");
        assert_eq!(body["data"][0]["customer"]["name"], "Unknown Customer");

        let (_, body) = call(&app, Method::GET, "/api/work-orders/cache").await;
        assert_eq!(body["data"]["health"], "healthy");
        assert_eq!(body["data"]["size"], 1);
        assert_eq!(body["data"]["last_strategy"], "enhanced");
    }

    #[tokio::test]
    async fn test_empty_store_is_reported_as_degraded() {
        let (app, _db) = app().await;

        let (status, body) = call(&app, Method::GET, "/api/work-orders/fetch").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "degraded");
        assert_eq!(body["data"]["reason"]["kind"], "sentinel");
        assert_eq!(body["data"]["items"][0]["id"], "fallback-1");
        assert!(body["message"].is_string());

        let (_, body) = call(&app, Method::DELETE, "/api/work-orders/cache").await;
        assert_eq!(body["success"], true);
        let (_, body) = call(&app, Method::GET, "/api/work-orders/cache").await;
        assert_eq!(body["data"]["health"], "empty");
    }
}
