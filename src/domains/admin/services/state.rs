// Admin domain state
use std::sync::Arc;
use crate::domains::admin::services::RoleService;
use crate::shared::database::UserStore;

#[derive(Clone)]
pub struct AdminState {
    pub role_service: RoleService,
}

impl AdminState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            role_service: RoleService::new(store),
        }
    }
}
