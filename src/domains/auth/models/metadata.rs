// 사용자 / 지갑 이력 메타데이터
// 쓰기 경로(new / migration / returning)마다 닫힌 variant 하나.
// JSONB로 저장되며 `version` 필드로 스키마 변경을 구분합니다.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domains::auth::models::AuthMethod;

pub const METADATA_VERSION: u16 = 1;

/// 요청 클라이언트 정보 (IP, User-Agent)
/// Client context captured from request headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContext {
    pub ip_address: String,
    pub user_agent: String,
}

impl ClientContext {
    pub const UNKNOWN: &'static str = "unknown";
    pub const MAX_USER_AGENT_LEN: usize = 255;

    pub fn new(ip_address: Option<&str>, user_agent: Option<&str>) -> Self {
        let ip_address = ip_address
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .unwrap_or(Self::UNKNOWN)
            .to_string();
        let user_agent: String = user_agent
            .filter(|ua| !ua.is_empty())
            .unwrap_or(Self::UNKNOWN)
            .chars()
            .take(Self::MAX_USER_AGENT_LEN)
            .collect();

        Self { ip_address, user_agent }
    }
}

/// users.metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    pub version: u16,
    #[serde(flatten)]
    pub event: UserMetadataEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UserMetadataEvent {
    /// 최초 생성
    Created {
        wallet_type: String,
        first_auth: String,
        created_at: DateTime<Utc>,
        ip_address: String,
        user_agent: String,
    },
    /// 레거시 시스템에서 이전
    Migrated {
        wallet_type: String,
        migrated_from: String,
        migration_date: DateTime<Utc>,
        original_wallet: String,
        ip_address: String,
        user_agent: String,
    },
    /// 재방문 로그인
    LastLogin {
        last_login: DateTime<Utc>,
        last_auth_provider: String,
        ip_address: String,
        user_agent: String,
    },
}

impl UserMetadata {
    pub fn new(event: UserMetadataEvent) -> Self {
        Self { version: METADATA_VERSION, event }
    }
}

/// wallet_history.metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMetadata {
    pub version: u16,
    #[serde(flatten)]
    pub event: HistoryEvent,
    pub auth_method: AuthMethod,
    /// 클라이언트가 보고한 지갑 종류
    pub wallet_type: String,
    pub smart_account: bool,
    pub signed_message: bool,
    /// 요청 수신부터 이 기록 작성까지 걸린 시간
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryEvent {
    NewUser,
    ReturningUser,
    LegacyMigration { original_wallet: String },
}

impl HistoryMetadata {
    pub fn is_new_user(&self) -> bool {
        matches!(self.event, HistoryEvent::NewUser)
    }

    pub fn is_migration(&self) -> bool {
        matches!(self.event, HistoryEvent::LegacyMigration { .. })
    }
}
