use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use crate::domains::auth::models::AuthMethod;
use crate::shared::errors::AuthError;

pub const ADDRESS_REQUIRED: &str = "Wallet address is required";
pub const PROVIDER_AND_METHOD_REQUIRED: &str = "Authentication provider and method are required";

/// 지갑 연결 검증 요청 (지갑 SDK가 보낸 값 그대로)
/// Wallet verification request, as reported by the wallet SDK.
///
/// 필수 필드도 Option으로 받아서 400 메시지를 직접 만듭니다.
#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = WalletVerifyRequest)]
pub struct WalletVerifyRequest {
    /// Wallet address (required)
    /// 지갑 주소 (필수)
    #[schema(example = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F")]
    pub address: Option<String>,

    /// Smart-account address (optional)
    pub smart_account: Option<String>,

    /// Email from an in-app wallet (optional)
    #[schema(example = "user@example.com")]
    pub email: Option<String>,

    /// Authentication provider (required)
    /// 인증 제공자 (필수)
    #[schema(example = "google")]
    pub auth_provider: Option<String>,

    /// "in-app" | "external" (required)
    #[schema(example = "in-app")]
    pub auth_method: Option<String>,

    #[schema(example = "in-app")]
    pub wallet_type: Option<String>,

    pub message: Option<String>,
    pub signature: Option<String>,
}

/// 검증된 연결 요청
/// Validated connect payload
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectPayload {
    pub address: String,
    pub smart_account: Option<String>,
    pub email: Option<String>,
    pub auth_provider: String,
    pub auth_method: AuthMethod,
    pub wallet_type: String,
    pub signed_message: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<WalletVerifyRequest> for ConnectPayload {
    type Error = AuthError;

    fn try_from(request: WalletVerifyRequest) -> Result<Self, Self::Error> {
        let address = non_empty(request.address)
            .ok_or_else(|| AuthError::Validation(ADDRESS_REQUIRED.to_string()))?;

        let (auth_provider, auth_method) =
            match (non_empty(request.auth_provider), non_empty(request.auth_method)) {
                (Some(provider), Some(method)) => (provider, method),
                _ => return Err(AuthError::Validation(PROVIDER_AND_METHOD_REQUIRED.to_string())),
            };
        let auth_method = auth_method.parse::<AuthMethod>().map_err(AuthError::Validation)?;

        Ok(Self {
            address,
            smart_account: non_empty(request.smart_account),
            email: non_empty(request.email),
            auth_provider,
            auth_method,
            wallet_type: non_empty(request.wallet_type).unwrap_or_else(|| "unknown".to_string()),
            signed_message: request.message.is_some() && request.signature.is_some(),
        })
    }
}

/// 응답에 포함되는 사용자 요약
/// User summary in the verification response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = VerifiedUser)]
pub struct VerifiedUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub address: String,
    #[serde(rename = "smartAccount")]
    pub smart_account: Option<String>,
    #[serde(rename = "authProvider")]
    pub auth_provider: String,
    #[serde(rename = "authMethod")]
    pub auth_method: AuthMethod,
}

/// 레거시 이전 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MigrationType {
    Legacy,
}

/// 지갑 연결 검증 응답
/// Wallet verification response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = WalletVerifyResponse)]
pub struct WalletVerifyResponse {
    pub success: bool,
    pub user: VerifiedUser,
    /// Signed session token (also set as the `session_token` cookie)
    pub token: String,
    pub is_new_user: bool,
    pub is_migration: bool,
    pub migration_type: Option<MigrationType>,
    /// Milliseconds spent handling the request
    pub processing_time: u64,
}
