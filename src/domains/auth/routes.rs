// Auth domain routes
// 인증 도메인 라우터
use axum::{routing::{get, post}, Router};
use crate::domains::auth::handlers::{auth_handler, wallet_handler};
use crate::shared::services::AppState;

/// Create authentication router
/// 인증 라우터 생성
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/wallet-verify", post(wallet_handler::wallet_verify))
        .route("/wallet-history", get(wallet_handler::wallet_history))
        .route("/me", get(auth_handler::get_me))
        .route("/logout", post(auth_handler::logout))
        .route("/check-account", get(auth_handler::check_account))
        .route("/login", post(auth_handler::legacy_login))
}
