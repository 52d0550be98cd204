// Auth domain state
// 인증 도메인 상태
use std::sync::Arc;
use crate::domains::auth::services::{
    AccountService, LegacyAuthService, SessionIssuer, WalletAuthService,
};
use crate::shared::config::AppConfig;
use crate::shared::database::UserStore;

/// Auth domain state
/// 인증 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct AuthState {
    pub wallet_auth_service: WalletAuthService,
    pub legacy_auth_service: LegacyAuthService,
    pub account_service: AccountService,
    pub session_issuer: SessionIssuer,
}

impl AuthState {
    /// Create AuthState with the injected store and configuration
    pub fn new(store: Arc<dyn UserStore>, config: &AppConfig) -> Self {
        let session_issuer = SessionIssuer::new(config.jwt_secret.clone(), config.cookie_secure);

        Self {
            wallet_auth_service: WalletAuthService::new(
                store.clone(),
                session_issuer.clone(),
                config.reconcile_timeout,
            ),
            legacy_auth_service: LegacyAuthService::new(store.clone()),
            account_service: AccountService::new(store),
            session_issuer,
        }
    }
}
