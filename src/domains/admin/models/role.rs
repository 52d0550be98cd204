use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::auth::models::UserResponse;

/// 역할 승인 응답
/// Role approval response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = ApproveRoleResponse)]
pub struct ApproveRoleResponse {
    #[schema(example = "Approved talent successfully")]
    pub message: String,
    pub user: UserResponse,
}
