// 메모리 기반 UserStore
// 테스트와 DATABASE_URL 없는 로컬 개발용. Postgres 스키마의 유니크 제약과
// 트랜잭션(사용자 쓰기 + 이력 추가 원자성)을 같은 의미로 흉내냅니다.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;
use crate::domains::auth::models::{
    LegacyCredential, RoleGrant, RoleStatus, RoleTag, User, WalletHistoryEntry,
};
use crate::shared::database::{AccountWrite, HistoryDraft, UserStore};
use crate::shared::errors::StoreError;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    history: Vec<WalletHistoryEntry>,
    legacy_credentials: Vec<LegacyCredential>,
    next_history_id: u64,
}

impl Tables {
    fn conflict_on_address(&self, address: &str, except: Option<Uuid>) -> Result<(), StoreError> {
        let taken = self.users.iter().any(|u| {
            Some(u.id) != except && u.current_wallet_address.as_deref() == Some(address)
        });
        if taken {
            return Err(StoreError::Conflict(format!(
                "current_wallet_address already registered: {}",
                address
            )));
        }
        Ok(())
    }

    fn conflict_on_email(&self, email: Option<&str>) -> Result<(), StoreError> {
        if let Some(email) = email {
            if self.users.iter().any(|u| u.email.as_deref() == Some(email)) {
                return Err(StoreError::Conflict(format!("email already registered: {}", email)));
            }
        }
        Ok(())
    }
}

/// In-memory user store
#[derive(Default)]
pub struct MemoryUserStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
    fail_history_appends: AtomicBool,
    commit_delay: Mutex<Option<Duration>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 모든 연산을 실패시킴 (DB 장애 시뮬레이션)
    /// Make every operation fail as if the backend were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 이력 추가만 실패시킴 (트랜잭션 롤백 확인용)
    /// Fail only the history append of a reconciliation commit
    pub fn set_fail_history_appends(&self, fail: bool) {
        self.fail_history_appends.store(fail, Ordering::SeqCst);
    }

    /// 쓰기 트랜잭션 시작 전 지연 (느린 DB 시뮬레이션)
    /// Delay every reconciliation commit before it touches the tables
    pub fn set_commit_delay(&self, delay: Duration) {
        *self.commit_delay.lock() = Some(delay);
    }

    /// 시드 데이터: 사용자 행 그대로 삽입
    pub fn insert_user(&self, user: User) {
        self.tables.lock().users.push(user);
    }

    /// 시드 데이터: 레거시 email/password 계정
    pub fn insert_legacy_credential(&self, credential: LegacyCredential) {
        self.tables.lock().legacy_credentials.push(credential);
    }

    pub fn users(&self) -> Vec<User> {
        self.tables.lock().users.clone()
    }

    pub fn history(&self) -> Vec<WalletHistoryEntry> {
        self.tables.lock().history.clone()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Query("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_candidates(
        &self,
        address: &str,
        email: Option<&str>,
    ) -> Result<Vec<User>, StoreError> {
        self.check_available()?;
        let tables = self.tables.lock();

        Ok(tables
            .users
            .iter()
            .filter(|u| {
                u.current_wallet_address.as_deref() == Some(address)
                    || u.legacy_wallet_address.as_deref() == Some(address)
                    || (email.is_some() && u.email.as_deref() == email)
            })
            .cloned()
            .collect())
    }

    async fn commit_reconciliation(
        &self,
        write: AccountWrite,
        history: HistoryDraft,
    ) -> Result<Option<User>, StoreError> {
        self.check_available()?;
        let delay = *self.commit_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut tables = self.tables.lock();
        let now = Utc::now();

        // 1. 변경 후 행을 먼저 계산 (아직 반영하지 않음)
        let (updated, index) = match write {
            AccountWrite::Create(new_user) => {
                tables.conflict_on_address(&new_user.current_wallet_address, None)?;
                tables.conflict_on_email(new_user.email.as_deref())?;
                let user = User {
                    id: new_user.id,
                    legacy_wallet_address: None,
                    current_wallet_address: Some(new_user.current_wallet_address),
                    smart_account_address: new_user.smart_account_address,
                    email: new_user.email,
                    auth_provider: Some(new_user.auth_provider),
                    last_auth_provider: None,
                    auth_method: Some(new_user.auth_method),
                    login_method: Some(new_user.login_method),
                    metadata: Some(new_user.metadata),
                    talent_status: RoleStatus::Pending,
                    mentor_status: RoleStatus::Pending,
                    recruiter_status: RoleStatus::Pending,
                    roles: Vec::new(),
                    created_at: new_user.created_at,
                    updated_at: new_user.created_at,
                };
                (user, None)
            }
            AccountWrite::Migrate {
                user_id,
                current_wallet_address,
                smart_account_address,
                auth_provider,
                auth_method,
                login_method,
                metadata,
            } => {
                let Some(index) = tables.users.iter().position(|u| u.id == user_id) else {
                    return Ok(None);
                };
                tables.conflict_on_address(&current_wallet_address, Some(user_id))?;
                let mut user = tables.users[index].clone();
                user.current_wallet_address = Some(current_wallet_address);
                user.smart_account_address = smart_account_address;
                user.auth_provider = Some(auth_provider);
                user.auth_method = Some(auth_method);
                user.login_method = Some(login_method);
                user.metadata = Some(metadata);
                user.updated_at = now;
                (user, Some(index))
            }
            AccountWrite::Refresh {
                user_id,
                last_auth_provider,
                smart_account_address,
                login_method,
                metadata,
            } => {
                let Some(index) = tables.users.iter().position(|u| u.id == user_id) else {
                    return Ok(None);
                };
                let mut user = tables.users[index].clone();
                user.last_auth_provider = Some(last_auth_provider);
                user.smart_account_address = smart_account_address.or(user.smart_account_address);
                user.login_method = Some(login_method);
                user.metadata = Some(metadata);
                user.updated_at = now;
                (user, Some(index))
            }
        };

        // 2. 이력 추가 실패 시 아무것도 반영하지 않음 (롤백)
        if self.fail_history_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Query("Failed to append wallet history".to_string()));
        }

        // 3. 둘 다 반영 (커밋)
        tables.next_history_id += 1;
        let entry = WalletHistoryEntry {
            id: tables.next_history_id,
            user_id: updated.id,
            wallet_address: history.wallet_address,
            wallet_type: history.wallet_type,
            action: history.action,
            auth_provider: history.auth_provider,
            ip_address: history.ip_address,
            user_agent: history.user_agent,
            metadata: history.metadata,
            created_at: now,
        };
        match index {
            Some(index) => tables.users[index] = updated.clone(),
            None => tables.users.push(updated.clone()),
        }
        tables.history.push(entry);

        Ok(Some(updated))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.check_available()?;
        Ok(self.tables.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.check_available()?;
        Ok(self
            .tables
            .lock()
            .users
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn wallet_history(&self, user_id: Uuid) -> Result<Vec<WalletHistoryEntry>, StoreError> {
        self.check_available()?;
        Ok(self
            .tables
            .lock()
            .history
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn approve_role(&self, user_id: Uuid, role: RoleTag) -> Result<Option<User>, StoreError> {
        self.check_available()?;
        let mut tables = self.tables.lock();
        let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };

        match role {
            RoleTag::Talent => user.talent_status = RoleStatus::Approved,
            RoleTag::Mentor => user.mentor_status = RoleStatus::Approved,
            RoleTag::Recruiter => user.recruiter_status = RoleStatus::Approved,
            RoleTag::Admin => {
                return Err(StoreError::Query("admin role has no approval status".to_string()));
            }
        }
        if !user.has_role(role) {
            user.roles.push(RoleGrant { role, granted_at: Utc::now() });
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn find_legacy_credential(&self, email: &str) -> Result<Option<LegacyCredential>, StoreError> {
        self.check_available()?;
        Ok(self
            .tables
            .lock()
            .legacy_credentials
            .iter()
            .find(|c| c.email == email)
            .cloned())
    }
}
