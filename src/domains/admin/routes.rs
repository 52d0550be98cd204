// Admin domain routes
// 관리자 도메인 라우터
use axum::{routing::post, Router};
use crate::domains::admin::handlers::role_handler;
use crate::shared::services::AppState;

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/roles/:role/approve", post(role_handler::approve_role))
}
