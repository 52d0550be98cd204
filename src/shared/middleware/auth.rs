use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;
use crate::domains::auth::models::SessionClaims;
use crate::domains::auth::services::SESSION_COOKIE;
use crate::shared::services::AppState;
use crate::shared::errors::AuthError;

/// 인증된 사용자 정보 (세션 토큰에서 추출)
/// Authenticated user information (extracted from the session token)
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub claims: SessionClaims,
}

/// AuthenticatedUser를 Axum Extractor로 구현
///
/// 토큰 위치 (순서대로):
/// 1. `Authorization: Bearer <token>`
/// 2. `session_token` 쿠키
///
/// 사용법:
/// ```rust,ignore
/// pub async fn get_me(
///     State(app_state): State<AppState>,
///     authenticated_user: AuthenticatedUser,
/// ) -> Result<...> {
///     let user_id = authenticated_user.user_id;
/// }
/// ```
#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .or_else(|| {
                CookieJar::from_headers(&parts.headers)
                    .get(SESSION_COOKIE)
                    .map(|cookie| cookie.value().to_string())
            })
            .ok_or_else(|| <Self::Rejection>::from(AuthError::MissingToken))?;

        let claims = state
            .auth_state
            .session_issuer
            .verify(&token)
            .map_err(<Self::Rejection>::from)?;

        Ok(AuthenticatedUser {
            user_id: claims.user_id,
            claims,
        })
    }
}

// Authorization 헤더가 있으면 "Bearer <token>" 형식이어야 함
fn bearer_token(parts: &Parts) -> Result<Option<String>, (StatusCode, Json<serde_json::Value>)> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Invalid authorization header" })),
        )
    })?;

    value
        .strip_prefix("Bearer ")
        .map(|token| Some(token.trim().to_string()))
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": "Invalid authorization format. Expected: 'Bearer <token>'"
                })),
            )
        })
}
