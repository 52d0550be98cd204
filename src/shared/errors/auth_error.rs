use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;
use uuid::Uuid;
use crate::shared::errors::StoreError;

/// 인증 관련 에러
/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// 필수 요청 필드 누락 / 잘못된 값
    /// Missing or malformed request field
    #[error("{0}")]
    Validation(String),

    /// 저장소 에러 (그대로 전파)
    /// Store failure, propagated unchanged
    #[error(transparent)]
    Store(#[from] StoreError),

    /// 매칭된 행을 사용할 수 없음 (식별자 없음, 업데이트 대상 소실)
    /// Matched row is unusable
    #[error("Invalid account state: {0}")]
    InvalidState(String),

    /// 세션 토큰 서명 실패
    /// Session token could not be signed
    #[error("Failed to sign session token: {0}")]
    Signing(String),

    /// 전체 처리 시간 초과
    /// Reconciliation exceeded the configured deadline
    #[error("Wallet verification timed out")]
    Timeout,

    /// 잘못된 이메일 또는 비밀번호
    /// Invalid email or password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// 비밀번호 검증 실패 (해시 포맷 오류 등)
    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    PasswordVerificationFailed(String),

    /// 사용자를 찾을 수 없음
    /// User not found
    #[error("User not found: id={id}")]
    UserNotFound { id: Uuid },

    /// 관리자 권한 없음
    /// Caller lacks the admin role
    #[error("Admin role required")]
    Forbidden,

    /// 잘못된 또는 만료된 토큰
    /// Invalid or expired token
    #[error("Invalid or expired token")]
    InvalidToken,

    /// 토큰이 제공되지 않음
    /// Token not provided
    #[error("Token not provided")]
    MissingToken,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::UserNotFound { .. } => StatusCode::NOT_FOUND,
            AuthError::Store(_)
            | AuthError::InvalidState(_)
            | AuthError::Signing(_)
            | AuthError::Timeout
            | AuthError::PasswordVerificationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// AuthError를 HTTP 응답으로 변환
impl From<AuthError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: AuthError) -> Self {
        (err.status_code(), Json(json!({ "error": err.to_string() })))
    }
}
