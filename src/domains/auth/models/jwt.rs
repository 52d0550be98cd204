use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 세션 토큰의 지갑 종류 태그
/// Wallet-type tag carried by every session token and history entry
pub const WALLET_TYPE_TAG: &str = "primary-chain";

/// 세션 유효 기간 (7일)
/// Session lifetime in seconds
pub const SESSION_TTL_SECONDS: i64 = 7 * 24 * 3600;

/// JWT Claims (세션 토큰에 포함될 데이터)
/// Session token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub wallet_address: Option<String>,
    pub smart_account: Option<String>,
    pub email: Option<String>,
    pub auth_provider: String,
    pub wallet_type: String,

    /// 발급 시간 (Unix timestamp)
    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// 만료 시간 (Unix timestamp)
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}
