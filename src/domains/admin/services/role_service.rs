use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use crate::domains::auth::models::{RoleTag, User};
use crate::shared::database::UserStore;
use crate::shared::errors::AuthError;

// 전문가 역할 승인 서비스
// Approves professional roles (talent / mentor / recruiter)
#[derive(Clone)]
pub struct RoleService {
    store: Arc<dyn UserStore>,
}

impl RoleService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// 역할 승인
    ///
    /// 1. 호출자가 admin 역할을 가져야 함 (403)
    /// 2. role은 talent / mentor / recruiter 중 하나 (400)
    /// 3. 상태를 approved로, 역할 기록이 없으면 추가 (멱등)
    pub async fn approve(&self, caller_id: Uuid, user_id: Uuid, role: &str) -> Result<User, AuthError> {
        let caller = self.store.find_user_by_id(caller_id).await?;
        if !caller.is_some_and(|caller| caller.has_role(RoleTag::Admin)) {
            return Err(AuthError::Forbidden);
        }

        let role = role
            .parse::<RoleTag>()
            .ok()
            .filter(RoleTag::is_professional)
            .ok_or_else(|| AuthError::Validation(format!("Invalid role: {}", role)))?;

        let user = self
            .store
            .approve_role(user_id, role)
            .await?
            .ok_or(AuthError::UserNotFound { id: user_id })?;

        info!(%caller_id, %user_id, role = %role, "Role approved");
        Ok(user)
    }
}
