use crate::{handlers, state::AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// 创建 API 路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))

        // 状态
        .route("/api/v1/status", get(handlers::get_status))
        .route("/api/v1/targets", get(handlers::list_targets))

        // 运维命令
        .route(
            "/api/v1/targets/:site/maintenance",
            post(handlers::schedule_maintenance),
        )
        .route("/api/v1/targets/:site/problem", post(handlers::report_problem))
        .route(
            "/api/v1/targets/:site/observation",
            post(handlers::start_observation),
        )
        .route(
            "/api/v1/targets/:site/annotations",
            delete(handlers::clear_annotations),
        )

        // 对端心跳
        .route(
            "/api/v1/presence/:peer_id/heartbeat",
            post(handlers::heartbeat),
        )

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 健康检查
async fn health_check() -> &'static str {
    "OK"
}
