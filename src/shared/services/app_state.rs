use std::sync::Arc;
use crate::shared::config::AppConfig;
use crate::shared::database::UserStore;
use crate::domains::auth::services::state::AuthState;
use crate::domains::admin::services::state::AdminState;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 저장소 핸들은 main에서 열어서 주입합니다 (Postgres 또는 인메모리).
/// 각 도메인 State가 필요한 저장소/설정 값을 직접 보관합니다.
#[derive(Clone)]
pub struct AppState {
    pub auth_state: AuthState,
    pub admin_state: AdminState,
}

impl AppState {
    /// Create AppState with the injected store
    /// 모든 도메인 State를 초기화하고 조합
    pub fn new(store: Arc<dyn UserStore>, config: &AppConfig) -> Self {
        let auth_state = AuthState::new(store.clone(), config);
        let admin_state = AdminState::new(store);

        Self {
            auth_state,
            admin_state,
        }
    }
}
