use std::sync::Arc;
use uuid::Uuid;
use crate::domains::auth::models::{User, WalletHistoryEntry};
use crate::shared::database::UserStore;
use crate::shared::errors::AuthError;

// 계정 조회 서비스 (me / check-account / wallet-history)
// Account lookups behind the session endpoints
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, AuthError> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound { id: user_id })
    }

    /// 이메일로 가입된 계정의 로그인 방식 (없으면 None)
    /// Login method registered for an email
    pub async fn login_method_for(&self, email: &str) -> Result<Option<String>, AuthError> {
        Ok(self
            .store
            .find_user_by_email(email)
            .await?
            .and_then(|user| user.login_method))
    }

    pub async fn wallet_history(&self, user_id: Uuid) -> Result<Vec<WalletHistoryEntry>, AuthError> {
        Ok(self.store.wallet_history(user_id).await?)
    }
}
