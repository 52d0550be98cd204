use std::sync::Arc;
use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use goodhive_server::routes::create_router;
use goodhive_server::shared::config::AppConfig;
use goodhive_server::shared::database::{Database, MemoryUserStore, PgUserStore, UserStore};
use goodhive_server::shared::services::AppState;
use goodhive_server::shared::telemetry;

// Import models for OpenAPI schema
use goodhive_server::domains::auth::models::*;
use goodhive_server::domains::admin::models::*;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        goodhive_server::domains::auth::handlers::wallet_handler::wallet_verify,
        goodhive_server::domains::auth::handlers::wallet_handler::wallet_history,
        goodhive_server::domains::auth::handlers::auth_handler::get_me,
        goodhive_server::domains::auth::handlers::auth_handler::logout,
        goodhive_server::domains::auth::handlers::auth_handler::check_account,
        goodhive_server::domains::auth::handlers::auth_handler::legacy_login,
        goodhive_server::domains::admin::handlers::role_handler::approve_role
    ),
    components(schemas(
        WalletVerifyRequest,
        WalletVerifyResponse,
        VerifiedUser,
        MigrationType,
        AuthMethod,
        RoleStatus,
        RoleTag,
        RoleGrant,
        UserResponse,
        WalletAction,
        WalletHistoryEntry,
        WalletHistoryResponse,
        LegacyLoginRequest,
        LegacyLoginResponse,
        CheckAccountResponse,
        ApproveRoleResponse
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Auth", description = "Wallet authentication and session endpoints"),
        (name = "Admin", description = "Role approval endpoints")
    ),
    info(
        title = "GoodHive Identity Server",
        description = "Wallet identity reconciliation and session issuance",
        version = "1.0.0"
    )
)]
struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env 로딩 (없어도 됨)
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    if config.jwt_secret.is_none() {
        warn!("JWT_SECRET is not set; wallet verification will fail to sign sessions");
    }

    // 저장소 열기: DATABASE_URL이 있으면 PostgreSQL, 없으면 인메모리
    let (store, db): (Arc<dyn UserStore>, Option<Database>) = match &config.database_url {
        Some(db_url) => {
            let db = Database::new(db_url).await?;
            db.initialize().await?;
            info!("User store: PostgreSQL");
            (Arc::new(PgUserStore::new(db.clone())), Some(db))
        }
        None => {
            warn!("DATABASE_URL is not set; using the in-memory user store (data is lost on exit)");
            (Arc::new(MemoryUserStore::new()), None)
        }
    };

    // CORS 설정 (쿠키 사용 → credentials 허용)
    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .context("CORS_ORIGIN is not a valid header value")?,
        )
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    let bind_addr = config.bind_addr;

    // AppState 생성 (모든 Service 초기화)
    let app_state = AppState::new(store, &config);

    // Router 생성
    let app = Router::new()
        .merge(create_router())
        .merge(
            SwaggerUi::new("/api")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    info!("Server running on http://{}", bind_addr);
    info!("Swagger UI available at http://{}/api", bind_addr);

    // 서버 실행 (Ctrl+C로 종료)
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // 저장소 닫기
    if let Some(db) = db {
        db.close().await;
    }
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
