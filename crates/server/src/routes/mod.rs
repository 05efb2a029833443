use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use tracing::error;
use utils::response::ApiResponse;

use crate::AppState;

pub mod work_orders;

/// GET /api/health
async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, ResponseJson<ApiResponse<String>>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            ResponseJson(ApiResponse::success("ok".to_string())),
        ),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ResponseJson(ApiResponse::error("database unavailable")),
            )
        }
    }
}

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .merge(work_orders::router(state))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::DBService;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use services::services::{
        config::WorkOrderServiceConfig, work_order_service::WorkOrderService,
    };
    use tower::ServiceExt;

    use crate::{AppState, router};

    async fn health(app: &axum::Router) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
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
    async fn test_health_reflects_database_reachability() {
        let db = DBService::new_in_memory().await.unwrap();
        let service = WorkOrderService::new(db.clone(), WorkOrderServiceConfig::default());
        let app = router(AppState::new(db.clone(), service));

        let (status, body) = health(&app).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "ok");

        db.pool.close().await;
        let (status, body) = health(&app).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "database unavailable");
    }
}
