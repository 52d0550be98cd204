use std::time::Instant;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use crate::domains::auth::models::{
    ClientContext, WalletHistoryResponse, WalletVerifyRequest, WalletVerifyResponse,
};
use crate::shared::errors::AuthError;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;

/// 지갑 연결 검증 핸들러
/// Wallet verification handler
///
/// 신규 / 레거시 이전 / 재방문을 판별하고 세션 토큰 + 쿠키를 발급합니다.
#[utoipa::path(
    post,
    path = "/api/auth/wallet-verify",
    request_body = WalletVerifyRequest,
    responses(
        (status = 200, description = "Wallet verified, session issued", body = WalletVerifyResponse),
        (status = 400, description = "Missing address, provider or method, or malformed JSON"),
        (status = 415, description = "Body is not application/json"),
        (status = 422, description = "Body does not match the request shape"),
        (status = 500, description = "Verification failed")
    ),
    tag = "Auth"
)]
pub async fn wallet_verify(
    State(app_state): State<AppState>,
    client: ClientContext,
    jar: CookieJar,
    payload: Result<Json<WalletVerifyRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<WalletVerifyResponse>), (StatusCode, Json<serde_json::Value>)> {
    let started = Instant::now();
    let auth_state = &app_state.auth_state;

    // 본문 파싱 실패도 같은 JSON 오류 형식 (상태 코드는 axum 그대로)
    let Json(request) = payload.map_err(|rejection| {
        failure_response(rejection.status(), rejection.body_text(), &client, started)
    })?;

    // Service 호출 (판별 → 쓰기 → 서명)
    let verification = auth_state
        .wallet_auth_service
        .verify(request, &client, started)
        .await
        .map_err(|e| verification_failed(e, &client, started))?;

    // 세션 쿠키 설정
    let jar = auth_state.session_issuer.set_cookies(
        jar,
        &verification.session,
        &verification.user,
        &verification.payload.address,
        verification.payload.smart_account.as_deref(),
    );

    Ok((jar, Json(verification.response())))
}

// 400은 메시지 그대로, 나머지는 일반 500 응답 (details만 노출)
fn verification_failed(
    err: AuthError,
    client: &ClientContext,
    started: Instant,
) -> (StatusCode, Json<serde_json::Value>) {
    if let AuthError::Validation(_) = err {
        return err.into();
    }

    failure_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), client, started)
}

fn failure_response(
    status: StatusCode,
    details: String,
    client: &ClientContext,
    started: Instant,
) -> (StatusCode, Json<serde_json::Value>) {
    let timestamp = Utc::now().to_rfc3339();
    tracing::error!(
        status = status.as_u16(),
        error = %details,
        %timestamp,
        elapsed_ms = started.elapsed().as_millis() as u64,
        ip_address = %client.ip_address,
        user_agent = %client.user_agent,
        "Wallet verification failed"
    );

    (
        status,
        Json(serde_json::json!({
            "error": "Verification failed",
            "details": details,
            "timestamp": timestamp,
        })),
    )
}

/// 지갑 연결 이력 조회 (오래된 순)
#[utoipa::path(
    get,
    path = "/api/auth/wallet-history",
    responses(
        (status = 200, description = "Wallet history", body = WalletHistoryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("BearerAuth" = [])),
    tag = "Auth"
)]
pub async fn wallet_history(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<WalletHistoryResponse>, (StatusCode, Json<serde_json::Value>)> {
    let entries = app_state
        .auth_state
        .account_service
        .wallet_history(authenticated_user.user_id)
        .await
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(WalletHistoryResponse { entries }))
}
