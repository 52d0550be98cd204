// =====================================================
// 지갑 연결 검증 통합 테스트
// =====================================================
// 목적: POST /api/auth/wallet-verify 의 신규 / 레거시 이전 / 재방문 판별,
//       세션 발급, 오류 응답을 실제 라우터로 검증
// =====================================================

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use goodhive_server::domains::auth::models::{
    HistoryEvent, UserMetadataEvent, WalletAction, METADATA_VERSION,
};
use goodhive_server::domains::auth::models::User;
use common::*;

#[tokio::test]
async fn test_new_address_creates_user() {
    let app = setup_test();

    // 1. 빈 저장소에 새 주소로 연결
    let response = send(
        &app,
        post_json(
            WALLET_VERIFY,
            json!({
                "address": "0xNEW",
                "authProvider": "google",
                "authMethod": "in-app",
                "walletType": "in-app"
            }),
        ),
    )
    .await;

    // 2. 응답 확인
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["isNewUser"], true);
    assert_eq!(response.body["isMigration"], false);
    assert!(response.body["migrationType"].is_null());
    assert_eq!(response.body["user"]["address"], "0xNEW");
    assert_eq!(response.body["user"]["authMethod"], "in-app");
    assert!(response.body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(response.body["processingTime"].is_u64());

    // 3. 쿠키: user_id, user_address 설정 / user_email 없음
    let users = app.store.users();
    assert_eq!(users.len(), 1);
    let user = &users[0];
    assert_eq!(response.cookie_value("user_id"), Some(user.id.to_string()));
    assert_eq!(response.cookie_value("user_address").as_deref(), Some("0xNEW"));
    assert!(response.cookie("user_email").is_none());
    assert!(response.cookie("smart_account").is_none());
    let session_cookie = response.cookie("session_token").unwrap();
    assert!(session_cookie.contains("HttpOnly"));
    assert!(session_cookie.contains("SameSite=Lax"));
    assert!(session_cookie.contains("Max-Age=604800"));

    // 4. 저장된 행 확인
    assert_eq!(user.current_wallet_address.as_deref(), Some("0xNEW"));
    assert_eq!(user.legacy_wallet_address, None);
    assert_eq!(user.login_method.as_deref(), Some("new-system"));
    let metadata = user.metadata.as_ref().unwrap();
    assert_eq!(metadata.version, METADATA_VERSION);
    assert!(matches!(
        &metadata.event,
        UserMetadataEvent::Created { wallet_type, ip_address, user_agent, .. }
            if wallet_type == "in-app" && ip_address == "203.0.113.7" && user_agent == "integration-test"
    ));

    // 5. 이력 한 건
    let history = app.store.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_id, user.id);
    assert_eq!(history[0].action, WalletAction::Connected);
    assert_eq!(history[0].wallet_type, "primary-chain");
    assert!(history[0].metadata.is_new_user());
}

#[tokio::test]
async fn test_legacy_address_is_migrated() {
    let app = setup_test();
    let legacy = legacy_user("0xOLD", Some("a@b.com"));
    app.store.insert_user(legacy.clone());

    let response = send(
        &app,
        post_json(
            WALLET_VERIFY,
            json!({
                "address": "0xOLD",
                "authProvider": "metamask",
                "authMethod": "external",
                "walletType": "metamask"
            }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["isMigration"], true);
    assert_eq!(response.body["isNewUser"], false);
    assert_eq!(response.body["migrationType"], "legacy");
    assert_eq!(response.body["user"]["user_id"], legacy.id.to_string());
    assert_eq!(response.body["user"]["email"], "a@b.com");
    // 이메일 쿠키는 행의 이메일 사용
    assert_eq!(response.cookie_value("user_email").as_deref(), Some("a@b.com"));

    let users = app.store.users();
    assert_eq!(users.len(), 1);
    let migrated = &users[0];
    assert_eq!(migrated.id, legacy.id);
    assert_eq!(migrated.current_wallet_address.as_deref(), Some("0xOLD"));
    assert_eq!(migrated.legacy_wallet_address.as_deref(), Some("0xOLD"));
    assert_eq!(migrated.login_method.as_deref(), Some("new-system"));
    assert!(matches!(
        migrated.metadata.as_ref().map(|m| &m.event),
        Some(UserMetadataEvent::Migrated { original_wallet, .. }) if original_wallet == "0xOLD"
    ));

    let history = app.store.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, WalletAction::LegacyMigration);
    assert!(history[0].metadata.is_migration());
    assert!(matches!(
        &history[0].metadata.event,
        HistoryEvent::LegacyMigration { original_wallet } if original_wallet == "0xOLD"
    ));
}

#[tokio::test]
async fn test_returning_user_keeps_smart_account() {
    let app = setup_test();
    let existing = User {
        current_wallet_address: Some("0xRET".to_string()),
        smart_account_address: Some("0xSA1".to_string()),
        ..seed_user(Utc::now() - Duration::days(3))
    };
    app.store.insert_user(existing.clone());

    let response = send(
        &app,
        post_json(
            WALLET_VERIFY,
            json!({
                "address": "0xRET",
                "smartAccount": null,
                "authProvider": "google",
                "authMethod": "in-app"
            }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["isNewUser"], false);
    assert_eq!(response.body["isMigration"], false);
    assert_eq!(response.body["user"]["user_id"], existing.id.to_string());

    let users = app.store.users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, existing.id);
    assert_eq!(users[0].smart_account_address.as_deref(), Some("0xSA1"));
    assert_eq!(users[0].last_auth_provider.as_deref(), Some("google"));
    assert!(matches!(
        users[0].metadata.as_ref().map(|m| &m.event),
        Some(UserMetadataEvent::LastLogin { .. })
    ));
}

#[tokio::test]
async fn test_returning_user_smart_account_is_updated_when_sent() {
    let app = setup_test();
    let existing = User {
        current_wallet_address: Some("0xRET".to_string()),
        smart_account_address: Some("0xSA1".to_string()),
        ..seed_user(Utc::now())
    };
    app.store.insert_user(existing);

    let response = send(
        &app,
        post_json(
            WALLET_VERIFY,
            json!({
                "address": "0xRET",
                "smartAccount": "0xSA2",
                "authProvider": "google",
                "authMethod": "in-app"
            }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["smartAccount"], "0xSA2");
    assert_eq!(response.cookie_value("smart_account").as_deref(), Some("0xSA2"));
    assert_eq!(app.store.users()[0].smart_account_address.as_deref(), Some("0xSA2"));
}

#[tokio::test]
async fn test_second_identical_call_is_returning() {
    let app = setup_test();
    let body = json!({
        "address": "0xTWICE",
        "authProvider": "google",
        "authMethod": "in-app"
    });

    let (first, _) = connect(&app, body.clone()).await;
    let (second, _) = connect(&app, body).await;

    assert_eq!(first.body["isNewUser"], true);
    assert_eq!(second.body["isNewUser"], false);
    assert_eq!(second.body["isMigration"], false);
    assert_eq!(first.body["user"]["user_id"], second.body["user"]["user_id"]);
    assert_eq!(app.store.users().len(), 1);
    assert_eq!(app.store.history().len(), 2);
}

#[tokio::test]
async fn test_email_match_is_returning() {
    // 이메일만 일치 → 기존 행으로 재방문 처리 (새 행 없음)
    let app = setup_test();
    let existing = User {
        current_wallet_address: Some("0xFIRST".to_string()),
        email: Some("same@goodhive.io".to_string()),
        ..seed_user(Utc::now())
    };
    app.store.insert_user(existing.clone());

    let (response, _) = connect(
        &app,
        json!({
            "address": "0xSECOND",
            "email": "same@goodhive.io",
            "authProvider": "google",
            "authMethod": "in-app"
        }),
    )
    .await;

    assert_eq!(response.body["isNewUser"], false);
    assert_eq!(response.body["user"]["user_id"], existing.id.to_string());
    assert_eq!(response.body["user"]["address"], "0xSECOND");
    assert_eq!(app.store.users().len(), 1);
}

#[tokio::test]
async fn test_missing_address_is_rejected() {
    let app = setup_test();

    let response = send(
        &app,
        post_json(WALLET_VERIFY, json!({ "authProvider": "google", "authMethod": "in-app" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({ "error": "Wallet address is required" }));
    assert!(app.store.users().is_empty());
}

#[tokio::test]
async fn test_missing_provider_or_method_is_rejected() {
    let app = setup_test();

    for body in [
        json!({ "address": "0xA", "authMethod": "in-app" }),
        json!({ "address": "0xA", "authProvider": "google" }),
        json!({ "address": "0xA", "authProvider": "", "authMethod": "in-app" }),
    ] {
        let response = send(&app, post_json(WALLET_VERIFY, body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body,
            json!({ "error": "Authentication provider and method are required" })
        );
    }
    assert!(app.store.users().is_empty());
}

#[tokio::test]
async fn test_unsupported_method_is_rejected() {
    let app = setup_test();

    let response = send(
        &app,
        post_json(
            WALLET_VERIFY,
            json!({ "address": "0xA", "authProvider": "google", "authMethod": "carrier-pigeon" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({ "error": "Unsupported authentication method: carrier-pigeon" })
    );
}

#[tokio::test]
async fn test_store_failure_is_generic_500() {
    let app = setup_test();
    app.store.set_unavailable(true);

    let response = send(
        &app,
        post_json(
            WALLET_VERIFY,
            json!({ "address": "0xA", "authProvider": "google", "authMethod": "in-app" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Verification failed");
    assert!(response.body["details"].as_str().unwrap().contains("connection refused"));
    assert!(response.body["timestamp"].is_string());
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_slow_store_times_out_without_writing() {
    // 커밋이 마감 시간보다 느림 → 500, 사용자/이력 모두 없음
    let app = setup_test_with(goodhive_server::shared::config::AppConfig {
        reconcile_timeout: std::time::Duration::from_millis(50),
        ..test_config()
    });
    app.store.set_commit_delay(std::time::Duration::from_millis(500));

    let response = send(
        &app,
        post_json(
            WALLET_VERIFY,
            json!({ "address": "0xSLOW", "authProvider": "google", "authMethod": "in-app" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Verification failed");
    assert_eq!(response.body["details"], "Wallet verification timed out");
    assert!(response.body["timestamp"].is_string());
    assert!(response.set_cookies().is_empty());
    assert!(app.store.users().is_empty());
    assert!(app.store.history().is_empty());
}

#[tokio::test]
async fn test_unparseable_body_uses_error_shape() {
    let app = setup_test();

    // 1. 깨진 JSON → 400
    let response = send(&app, post_raw(WALLET_VERIFY, Some("application/json"), "{not json")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Verification failed");
    assert!(response.body["details"].is_string());
    assert!(response.body["timestamp"].is_string());

    // 2. content-type 없음 → 415
    let response = send(
        &app,
        post_raw(WALLET_VERIFY, None, r#"{"address":"0xA","authProvider":"google","authMethod":"in-app"}"#),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(response.body["error"], "Verification failed");

    // 3. 타입 불일치 (address가 숫자) → 422
    let response = send(
        &app,
        post_raw(
            WALLET_VERIFY,
            Some("application/json"),
            r#"{"address":123,"authProvider":"google","authMethod":"in-app"}"#,
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "Verification failed");
    assert!(response.body["details"].is_string());

    // 4. 아무것도 쓰지 않음
    assert!(response.set_cookies().is_empty());
    assert!(app.store.users().is_empty());
    assert!(app.store.history().is_empty());
}

#[tokio::test]
async fn test_failed_history_append_leaves_no_user() {
    // 사용자 쓰기 + 이력 추가는 한 트랜잭션
    let app = setup_test();
    app.store.set_fail_history_appends(true);

    let response = send(
        &app,
        post_json(
            WALLET_VERIFY,
            json!({ "address": "0xA", "authProvider": "google", "authMethod": "in-app" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.store.users().is_empty());
    assert!(app.store.history().is_empty());
}

#[tokio::test]
async fn test_missing_secret_fails_after_write() {
    // 서명 키 없음: 500, 저장소는 이미 변경됨 → 재시도 시 재방문
    let app = setup_test_with(goodhive_server::shared::config::AppConfig {
        jwt_secret: None,
        ..test_config()
    });
    let body = json!({ "address": "0xA", "authProvider": "google", "authMethod": "in-app" });

    let response = send(&app, post_json(WALLET_VERIFY, body)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Verification failed");
    assert!(response.cookie("session_token").is_none());
    assert_eq!(app.store.users().len(), 1);
}

#[tokio::test]
async fn test_concurrent_first_connects_create_one_user() {
    let app = setup_test();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let router = app.router.clone();
        handles.push(tokio::spawn(async move {
            use tower::ServiceExt;
            router
                .oneshot(post_json(
                    WALLET_VERIFY,
                    json!({ "address": "0xRACE", "authProvider": "google", "authMethod": "in-app" }),
                ))
                .await
                .unwrap()
                .status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }
    assert_eq!(app.store.users().len(), 1);
    assert_eq!(app.store.history().len(), 8);
}
