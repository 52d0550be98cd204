// 계정 쓰기 (Account Writer)
// 분류 결과마다 정확히 한 번의 사용자 쓰기 + 한 번의 지갑 이력 추가.
use std::sync::Arc;
use std::time::Instant;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::domains::auth::models::{
    ClientContext, ConnectPayload, HistoryEvent, HistoryMetadata, UserMetadata,
    UserMetadataEvent, User, WalletAction, METADATA_VERSION, WALLET_TYPE_TAG,
};
use crate::domains::auth::services::Resolution;
use crate::shared::database::{AccountWrite, HistoryDraft, NewUser, UserStore};
use crate::shared::errors::AuthError;

/// 지갑 흐름으로 로그인한 사용자의 login_method
pub const NEW_SYSTEM_LOGIN_METHOD: &str = "new-system";

/// 레거시 이전 출처 태그
pub const LEGACY_SYSTEM_TAG: &str = "legacy";

#[derive(Clone)]
pub struct AccountWriter {
    store: Arc<dyn UserStore>,
}

impl AccountWriter {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// 쓰기 계획 생성 (저장소 접근 없음)
    /// Build the user write and history draft for a resolution
    pub fn plan(
        resolution: &Resolution,
        payload: &ConnectPayload,
        client: &ClientContext,
        now: DateTime<Utc>,
        elapsed_ms: u64,
    ) -> Result<(AccountWrite, HistoryDraft), AuthError> {
        if let Some(user) = resolution.matched_user() {
            if user.id.is_nil() {
                return Err(AuthError::InvalidState(
                    "Matched user is missing an identifier".to_string(),
                ));
            }
        }

        let (write, action, event) = match resolution {
            Resolution::New => {
                let write = AccountWrite::Create(NewUser {
                    id: Uuid::new_v4(),
                    current_wallet_address: payload.address.clone(),
                    smart_account_address: payload.smart_account.clone(),
                    email: payload.email.clone(),
                    auth_provider: payload.auth_provider.clone(),
                    auth_method: payload.auth_method,
                    login_method: NEW_SYSTEM_LOGIN_METHOD.to_string(),
                    metadata: UserMetadata::new(UserMetadataEvent::Created {
                        wallet_type: payload.wallet_type.clone(),
                        first_auth: payload.auth_provider.clone(),
                        created_at: now,
                        ip_address: client.ip_address.clone(),
                        user_agent: client.user_agent.clone(),
                    }),
                    created_at: now,
                });
                (write, WalletAction::Connected, HistoryEvent::NewUser)
            }
            Resolution::Migration(user) => {
                let original_wallet = legacy_address(user);
                let write = AccountWrite::Migrate {
                    user_id: user.id,
                    current_wallet_address: payload.address.clone(),
                    smart_account_address: payload.smart_account.clone(),
                    auth_provider: payload.auth_provider.clone(),
                    auth_method: payload.auth_method,
                    login_method: NEW_SYSTEM_LOGIN_METHOD.to_string(),
                    metadata: UserMetadata::new(UserMetadataEvent::Migrated {
                        wallet_type: payload.wallet_type.clone(),
                        migrated_from: LEGACY_SYSTEM_TAG.to_string(),
                        migration_date: now,
                        original_wallet: original_wallet.clone(),
                        ip_address: client.ip_address.clone(),
                        user_agent: client.user_agent.clone(),
                    }),
                };
                (
                    write,
                    WalletAction::LegacyMigration,
                    HistoryEvent::LegacyMigration { original_wallet },
                )
            }
            Resolution::Returning(user) => {
                let write = AccountWrite::Refresh {
                    user_id: user.id,
                    last_auth_provider: payload.auth_provider.clone(),
                    // 저장소에서 COALESCE: None이면 기존 값 유지
                    smart_account_address: payload.smart_account.clone(),
                    login_method: NEW_SYSTEM_LOGIN_METHOD.to_string(),
                    metadata: UserMetadata::new(UserMetadataEvent::LastLogin {
                        last_login: now,
                        last_auth_provider: payload.auth_provider.clone(),
                        ip_address: client.ip_address.clone(),
                        user_agent: client.user_agent.clone(),
                    }),
                };
                (write, WalletAction::Connected, HistoryEvent::ReturningUser)
            }
        };

        let history = HistoryDraft {
            wallet_address: payload.address.clone(),
            wallet_type: WALLET_TYPE_TAG.to_string(),
            action,
            auth_provider: payload.auth_provider.clone(),
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
            metadata: HistoryMetadata {
                version: METADATA_VERSION,
                event,
                auth_method: payload.auth_method,
                wallet_type: payload.wallet_type.clone(),
                smart_account: payload.smart_account.is_some(),
                signed_message: payload.signed_message,
                elapsed_ms,
            },
        };

        Ok((write, history))
    }

    /// 사용자 쓰기 + 이력 추가 (한 트랜잭션)
    /// Persist the resolution outcome; returns the written row
    pub async fn write(
        &self,
        resolution: &Resolution,
        payload: &ConnectPayload,
        client: &ClientContext,
        started: Instant,
    ) -> Result<User, AuthError> {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let (write, history) = Self::plan(resolution, payload, client, Utc::now(), elapsed_ms)?;
        let user_id = write.user_id();

        self.store
            .commit_reconciliation(write, history)
            .await?
            .ok_or_else(|| {
                AuthError::InvalidState(format!("User {} disappeared before update", user_id))
            })
    }
}

fn legacy_address(user: &User) -> String {
    user.legacy_wallet_address
        .clone()
        .unwrap_or_else(|| ClientContext::UNKNOWN.to_string())
}
