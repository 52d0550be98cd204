use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 레거시 email/password 계정 (auth_users 테이블)
/// Legacy credential row
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyCredential {
    pub id: i64,
    pub email: String,
    /// bcrypt (`$2a$`/`$2b$`/`$2y$`, 기존 행) 또는 Argon2 PHC 문자열
    pub password_hash: String,
}

// 레거시 로그인 요청 모델
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[schema(as = LegacyLoginRequest)]
pub struct LegacyLoginRequest {
    /// Email address
    /// 이메일 주소
    #[schema(example = "user@example.com")]
    pub email: Option<String>,

    /// Password
    /// 비밀번호
    #[schema(example = "password123")]
    pub password: Option<String>,
}

// 레거시 로그인 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = LegacyLoginResponse)]
pub struct LegacyLoginResponse {
    #[schema(example = "Login Successful")]
    pub message: String,
    pub email: String,
    pub user_id: i64,
}

/// 계정 조회 쿼리
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckAccountQuery {
    pub email: Option<String>,
}

/// 계정 조회 응답: 가입 시 사용한 로그인 방식
/// Login method registered for an email, if any
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = CheckAccountResponse)]
pub struct CheckAccountResponse {
    #[schema(example = "new-system")]
    pub login_method: Option<String>,
}
