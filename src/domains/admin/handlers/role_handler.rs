use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use crate::domains::admin::models::ApproveRoleResponse;
use crate::shared::errors::AuthError;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;

/// 역할 승인 핸들러 (admin 전용)
/// Approve a professional role for a user
#[utoipa::path(
    post,
    path = "/api/admin/users/{user_id}/roles/{role}/approve",
    params(
        ("user_id" = Uuid, Path, description = "User to approve"),
        ("role" = String, Path, description = "talent | mentor | recruiter")
    ),
    responses(
        (status = 200, description = "Role approved", body = ApproveRoleResponse),
        (status = 400, description = "Invalid role"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("BearerAuth" = [])),
    tag = "Admin"
)]
pub async fn approve_role(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path((user_id, role)): Path<(Uuid, String)>,
) -> Result<Json<ApproveRoleResponse>, (StatusCode, Json<serde_json::Value>)> {
    let user = app_state
        .admin_state
        .role_service
        .approve(authenticated_user.user_id, user_id, &role)
        .await
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(ApproveRoleResponse {
        message: format!("Approved {} successfully", role),
        user: user.into(),
    }))
}
