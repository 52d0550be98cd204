use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use crate::domains::auth::models::HistoryMetadata;

/// 지갑 이력 액션
/// Wallet history action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WalletAction {
    Connected,
    LegacyMigration,
}

impl WalletAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletAction::Connected => "connected",
            WalletAction::LegacyMigration => "legacy_migration",
        }
    }
}

impl FromStr for WalletAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "connected" => Ok(WalletAction::Connected),
            "legacy_migration" => Ok(WalletAction::LegacyMigration),
            other => Err(format!("Unknown wallet action: {}", other)),
        }
    }
}

/// 지갑 연결 / 이전 감사 기록 (append-only)
/// Append-only audit record of a connect or migrate event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = WalletHistoryEntry)]
pub struct WalletHistoryEntry {
    pub id: u64,
    pub user_id: Uuid,
    pub wallet_address: String,
    #[schema(example = "primary-chain")]
    pub wallet_type: String,
    pub action: WalletAction,
    pub auth_provider: String,
    pub ip_address: String,
    pub user_agent: String,
    #[schema(value_type = Object)]
    pub metadata: HistoryMetadata,
    pub created_at: DateTime<Utc>,
}

/// 지갑 이력 조회 응답
/// Wallet history response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = WalletHistoryResponse)]
pub struct WalletHistoryResponse {
    /// 오래된 순
    /// Oldest first
    pub entries: Vec<WalletHistoryEntry>,
}
