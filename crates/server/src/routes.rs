pub mod counter;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::{metrics, openapi::ApiDoc};
pub use counter::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics_handler() -> (StatusCode, String) {
    metrics::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: counter API, probes, docs, and the
/// static page directory as fallback for everything else.
pub fn build_router(state: ServerState, static_dir: &str, cors: CorsLayer) -> Router {
    let index = format!("{}/index.html", static_dir.trim_end_matches('/'));
    let static_files = ServeDir::new(static_dir).fallback(ServeFile::new(index));

    let api = Router::new()
        .route("/click", post(counter::click))
        .route("/money", get(counter::money));

    let probes = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/api-docs/openapi.json", get(openapi_json));

    api.merge(probes)
        .fallback_service(static_files)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx 以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use service::counter::repository::mock::MockCounterStore;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(store: Arc<MockCounterStore>) -> Router {
        build_router(ServerState::new(store), "static", CorsLayer::very_permissive())
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn click_returns_new_value() {
        let store = Arc::new(MockCounterStore::with_value(0));
        let res = app(Arc::clone(&store))
            .oneshot(Request::post("/click").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, serde_json::json!({"money": 1}));
        assert_eq!(store.peek(), Some(1));
    }

    #[tokio::test]
    async fn click_during_outage_is_500_without_money() {
        let store = Arc::new(MockCounterStore::with_value(5));
        store.set_available(false);
        let res = app(Arc::clone(&store))
            .oneshot(Request::post("/click").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(res).await;
        assert!(body.get("money").is_none());
        assert_eq!(body["error"], "internal server error");
        assert_eq!(store.peek(), Some(5));
    }

    #[tokio::test]
    async fn money_reads_without_incrementing() {
        let store = Arc::new(MockCounterStore::with_value(9));
        let res = app(Arc::clone(&store))
            .oneshot(Request::get("/money").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, serde_json::json!({"money": 9}));
        assert_eq!(store.peek(), Some(9));
    }

    #[tokio::test]
    async fn get_on_click_is_method_not_allowed() {
        let store = Arc::new(MockCounterStore::with_value(0));
        let res = app(Arc::clone(&store))
            .oneshot(Request::get("/click").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(store.peek(), Some(0));
    }

    #[tokio::test]
    async fn openapi_lists_click() {
        let res = app(Arc::new(MockCounterStore::default()))
            .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let doc = body_json(res).await;
        assert!(doc["paths"]["/click"]["post"].is_object());
    }

    #[tokio::test]
    async fn metrics_exposes_click_counter() {
        metrics::register_all();
        let res = app(Arc::new(MockCounterStore::default()))
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("clicker_clicks_total"));
    }
}
