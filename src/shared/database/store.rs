// =====================================================
// UserStore trait (저장소 인터페이스)
// =====================================================
// 서비스 계층은 이 trait만 참조합니다.
//
// 구현체:
// - PgUserStore: PostgreSQL (운영)
// - MemoryUserStore: 메모리 기반 (테스트 / 로컬 개발)
// =====================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::domains::auth::models::{
    AuthMethod, HistoryMetadata, LegacyCredential, RoleTag, User, UserMetadata,
    WalletAction, WalletHistoryEntry,
};
use crate::shared::errors::StoreError;

/// 신규 사용자 행
/// Row inserted for a first-time wallet connect
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub id: Uuid,
    pub current_wallet_address: String,
    pub smart_account_address: Option<String>,
    pub email: Option<String>,
    pub auth_provider: String,
    pub auth_method: AuthMethod,
    pub login_method: String,
    pub metadata: UserMetadata,
    pub created_at: DateTime<Utc>,
}

/// 사용자 행 쓰기 (분류 결과별로 정확히 하나)
/// Exactly one user-row write per reconciliation
#[derive(Debug, Clone, PartialEq)]
pub enum AccountWrite {
    /// INSERT
    Create(NewUser),
    /// 레거시 행에 현재 지갑 주소 연결
    Migrate {
        user_id: Uuid,
        current_wallet_address: String,
        smart_account_address: Option<String>,
        auth_provider: String,
        auth_method: AuthMethod,
        login_method: String,
        metadata: UserMetadata,
    },
    /// 재방문: smart account는 COALESCE(새 값, 기존 값)
    Refresh {
        user_id: Uuid,
        last_auth_provider: String,
        smart_account_address: Option<String>,
        login_method: String,
        metadata: UserMetadata,
    },
}

impl AccountWrite {
    pub fn user_id(&self) -> Uuid {
        match self {
            AccountWrite::Create(new_user) => new_user.id,
            AccountWrite::Migrate { user_id, .. } | AccountWrite::Refresh { user_id, .. } => *user_id,
        }
    }
}

/// 지갑 이력 초안 (user_id는 커밋 시 채움)
/// History entry awaiting its owning user id
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryDraft {
    pub wallet_address: String,
    pub wallet_type: String,
    pub action: WalletAction,
    pub auth_provider: String,
    pub ip_address: String,
    pub user_agent: String,
    pub metadata: HistoryMetadata,
}

/// 사용자 저장소 인터페이스
/// User store interface
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 주소(현재/레거시) 또는 이메일이 일치하는 모든 행
    /// Every row matching the address (current or legacy) or the non-null email.
    /// Order is not significant; the resolver applies the tie-break.
    async fn find_candidates(
        &self,
        address: &str,
        email: Option<&str>,
    ) -> Result<Vec<User>, StoreError>;

    /// 사용자 쓰기 + 지갑 이력 추가를 하나의 트랜잭션으로 커밋
    /// Commit the user write and the history append atomically.
    ///
    /// Returns `Ok(None)` (and writes nothing) when an update targets a row
    /// that no longer exists.
    async fn commit_reconciliation(
        &self,
        write: AccountWrite,
        history: HistoryDraft,
    ) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// 오래된 순
    async fn wallet_history(&self, user_id: Uuid) -> Result<Vec<WalletHistoryEntry>, StoreError>;

    /// 역할 승인 (상태 = approved, 아직 없으면 RoleGrant 추가)
    /// Approve a professional role; idempotent. `Ok(None)` for unknown users.
    async fn approve_role(&self, user_id: Uuid, role: RoleTag) -> Result<Option<User>, StoreError>;

    /// 레거시 email/password 계정 조회
    async fn find_legacy_credential(&self, email: &str) -> Result<Option<LegacyCredential>, StoreError>;
}
