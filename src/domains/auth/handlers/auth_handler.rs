use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use crate::domains::auth::models::{
    CheckAccountQuery, CheckAccountResponse, LegacyLoginRequest, LegacyLoginResponse,
    UserResponse,
};
use crate::domains::auth::services::SESSION_COOKIE;
use crate::shared::errors::AuthError;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;

/// 현재 사용자 조회
/// Get current user from the session
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "User info retrieved successfully", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("BearerAuth" = [])),
    tag = "Auth"
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<UserResponse>, (StatusCode, Json<serde_json::Value>)> {
    let user = app_state
        .auth_state
        .account_service
        .get_user(authenticated_user.user_id)
        .await
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(user.into()))
}

/// 로그아웃 핸들러
/// Logout handler: clears the session cookies
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "Not signed in")
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<serde_json::Value>), (StatusCode, Json<serde_json::Value>)> {
    if jar.get(SESSION_COOKIE).is_none() {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Not signed in" })),
        ));
    }

    let jar = app_state.auth_state.session_issuer.clear_cookies(jar);

    Ok((
        jar,
        Json(serde_json::json!({
            "message": "Logout successful"
        })),
    ))
}

/// 이메일로 가입된 계정의 로그인 방식 조회
#[utoipa::path(
    get,
    path = "/api/auth/check-account",
    params(
        ("email" = String, Query, description = "Email to look up")
    ),
    responses(
        (status = 200, description = "Login method (null when no account)", body = CheckAccountResponse),
        (status = 400, description = "Email is required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn check_account(
    State(app_state): State<AppState>,
    Query(query): Query<CheckAccountQuery>,
) -> Result<Json<CheckAccountResponse>, (StatusCode, Json<serde_json::Value>)> {
    let email = query
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| -> (StatusCode, Json<serde_json::Value>) {
            AuthError::Validation("Email is required".to_string()).into()
        })?;

    let login_method = app_state
        .auth_state
        .account_service
        .login_method_for(&email)
        .await
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(CheckAccountResponse { login_method }))
}

// 레거시 로그인 핸들러 (email/password)
// 응답 본문은 "message" 키를 사용
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LegacyLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LegacyLoginResponse),
        (status = 400, description = "Email and Password are required"),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "There was an error logging in")
    ),
    tag = "Auth"
)]
pub async fn legacy_login(
    State(app_state): State<AppState>,
    Json(request): Json<LegacyLoginRequest>,
) -> Result<Json<LegacyLoginResponse>, (StatusCode, Json<serde_json::Value>)> {
    let message = |status: StatusCode, message: &str| {
        (status, Json(serde_json::json!({ "message": message })))
    };

    let (Some(email), Some(password)) = (
        request.email.filter(|e| !e.is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(message(StatusCode::BAD_REQUEST, "Email and Password are required"));
    };

    let credential = app_state
        .auth_state
        .legacy_auth_service
        .login(&email, &password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => {
                message(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            other => {
                tracing::error!(error = %other, "Legacy login failed");
                message(StatusCode::INTERNAL_SERVER_ERROR, "There was an error logging in")
            }
        })?;

    Ok(Json(LegacyLoginResponse {
        message: "Login Successful".to_string(),
        email: credential.email,
        user_id: credential.id,
    }))
}
