// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 인메모리 저장소 위에 실제 라우터를 올리고 요청을 보내는 헬퍼 제공
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let app = setup_test();
//     let response = send(&app, post_json("/api/auth/wallet-verify", body)).await;
//     // 테스트 코드...
// }
// ```
// =====================================================
#![allow(dead_code)]

use std::sync::Arc;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;
use goodhive_server::domains::auth::models::{
    LegacyCredential, RoleGrant, RoleStatus, RoleTag, User,
};
use goodhive_server::routes::create_router;
use goodhive_server::shared::config::AppConfig;
use goodhive_server::shared::database::MemoryUserStore;
use goodhive_server::shared::services::AppState;

// 테스트용 상수
pub const TEST_JWT_SECRET: &str = "test-secret";
pub const WALLET_VERIFY: &str = "/api/auth/wallet-verify";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryUserStore>,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Set-Cookie 헤더에서 name=value 찾기 (삭제 쿠키 포함)
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookies()
            .into_iter()
            .find(|c| c.starts_with(&format!("{}=", name)))
    }

    pub fn cookie_value(&self, name: &str) -> Option<String> {
        self.cookie(name).map(|c| {
            let pair = c.split(';').next().unwrap_or_default();
            pair[name.len() + 1..].to_string()
        })
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: Some(TEST_JWT_SECRET.to_string()),
        cookie_secure: false,
        ..AppConfig::default()
    }
}

/// 인메모리 저장소 + 기본 설정으로 앱 생성
pub fn setup_test() -> TestApp {
    setup_test_with(test_config())
}

pub fn setup_test_with(config: AppConfig) -> TestApp {
    let store = Arc::new(MemoryUserStore::new());
    let state = AppState::new(store.clone(), &config);
    let router = create_router().with_state(state.clone());

    TestApp { router, store, state }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> TestResponse {
    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    TestResponse { status, headers, body }
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::USER_AGENT, "integration-test")
        .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// JSON이 아닐 수도 있는 원본 본문 요청 (content-type 생략 가능)
pub fn post_raw(uri: &str, content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::USER_AGENT, "integration-test");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(body.to_string())).expect("valid request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .expect("valid request")
}

pub fn with_cookie(method: &str, uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("valid request")
}

/// 지갑 연결 후 세션 토큰 반환
pub async fn connect(app: &TestApp, body: Value) -> (TestResponse, String) {
    let response = send(app, post_json(WALLET_VERIFY, body)).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    let token = response.body["token"].as_str().unwrap_or_default().to_string();
    (response, token)
}

/// 시드용 사용자 행
pub fn seed_user(created_at: DateTime<Utc>) -> User {
    User {
        id: Uuid::new_v4(),
        legacy_wallet_address: None,
        current_wallet_address: None,
        smart_account_address: None,
        email: None,
        auth_provider: None,
        last_auth_provider: None,
        auth_method: None,
        login_method: None,
        metadata: None,
        talent_status: RoleStatus::Pending,
        mentor_status: RoleStatus::Pending,
        recruiter_status: RoleStatus::Pending,
        roles: Vec::new(),
        created_at,
        updated_at: created_at,
    }
}

/// 레거시 시스템에서 넘어온 사용자 (현재 주소 없음)
pub fn legacy_user(legacy_address: &str, email: Option<&str>) -> User {
    User {
        legacy_wallet_address: Some(legacy_address.to_string()),
        email: email.map(str::to_string),
        login_method: Some("legacy".to_string()),
        ..seed_user(Utc::now() - Duration::days(365))
    }
}

/// admin 역할을 가진 사용자를 저장소에 넣고, 그 사용자의 세션 토큰 반환
pub async fn seed_admin(app: &TestApp, address: &str) -> (User, String) {
    let admin = User {
        current_wallet_address: Some(address.to_string()),
        roles: vec![RoleGrant { role: RoleTag::Admin, granted_at: Utc::now() }],
        ..seed_user(Utc::now())
    };
    app.store.insert_user(admin.clone());

    let session = app
        .state
        .auth_state
        .session_issuer
        .issue(&admin, "google")
        .expect("Failed to sign admin session");
    (admin, session.token)
}

/// 레거시 email/password 계정 시드 (Argon2 해시)
pub fn seed_legacy_credential(app: &TestApp, id: i64, email: &str, password: &str) {
    let salt = SaltString::from_b64("Z29vZGhpdmV0ZXN0c2FsdA").expect("valid salt");
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("Failed to hash password")
        .to_string();

    app.store.insert_legacy_credential(LegacyCredential {
        id,
        email: email.to_string(),
        password_hash,
    });
}

/// 기존 레거시 행 형식 (bcrypt `$2b$` 해시)
pub fn seed_legacy_bcrypt_credential(app: &TestApp, id: i64, email: &str, password: &str) {
    let password_hash = bcrypt::hash(password, 4).expect("Failed to hash password");

    app.store.insert_legacy_credential(LegacyCredential {
        id,
        email: email.to_string(),
        password_hash,
    });
}
