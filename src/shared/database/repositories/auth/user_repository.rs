use std::collections::HashMap;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Executor, Postgres, Row};
use tracing::debug;
use uuid::Uuid;
use crate::domains::auth::models::{
    AuthMethod, HistoryMetadata, LegacyCredential, RoleGrant, RoleStatus, RoleTag, User,
    UserMetadata, WalletAction, WalletHistoryEntry,
};
use crate::shared::database::{AccountWrite, Database, HistoryDraft, UserStore};
use crate::shared::errors::StoreError;

const USER_COLUMNS: &str = r#"
    id, legacy_wallet_address, current_wallet_address, smart_account_address, email,
    auth_provider, last_auth_provider, auth_method, login_method, metadata,
    talent_status, mentor_status, recruiter_status, created_at, updated_at
"#;

/// PostgreSQL UserStore
/// 사용자 쓰기와 지갑 이력 추가는 같은 트랜잭션에서 실행됩니다.
#[derive(Clone)]
pub struct PgUserStore {
    db: Database,
}

impl PgUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn corrupt(column: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt(format!("{}: {}", column, err))
}

fn map_user_row(row: &PgRow, roles: Vec<RoleGrant>) -> Result<User, StoreError> {
    let auth_method = row
        .try_get::<Option<String>, _>("auth_method")
        .map_err(|e| corrupt("auth_method", e))?
        .map(|m| m.parse::<AuthMethod>())
        .transpose()
        .map_err(|e| corrupt("auth_method", e))?;

    let status = |column: &str| -> Result<RoleStatus, StoreError> {
        row.try_get::<String, _>(column)
            .map_err(|e| corrupt(column, e))?
            .parse::<RoleStatus>()
            .map_err(|e| corrupt(column, e))
    };

    // 레거시 행의 metadata는 형식이 제각각이라 해석 못 하면 None
    let metadata = row
        .try_get::<Option<serde_json::Value>, _>("metadata")
        .map_err(|e| corrupt("metadata", e))?
        .and_then(|value| match serde_json::from_value::<UserMetadata>(value) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                debug!(error = %e, "Ignoring unversioned user metadata");
                None
            }
        });

    let text = |column: &str| -> Result<Option<String>, StoreError> {
        row.try_get::<Option<String>, _>(column).map_err(|e| corrupt(column, e))
    };

    Ok(User {
        id: row.try_get("id").map_err(|e| corrupt("id", e))?,
        legacy_wallet_address: text("legacy_wallet_address")?,
        current_wallet_address: text("current_wallet_address")?,
        smart_account_address: text("smart_account_address")?,
        email: text("email")?,
        auth_provider: text("auth_provider")?,
        last_auth_provider: text("last_auth_provider")?,
        auth_method,
        login_method: text("login_method")?,
        metadata,
        talent_status: status("talent_status")?,
        mentor_status: status("mentor_status")?,
        recruiter_status: status("recruiter_status")?,
        roles,
        created_at: row.try_get("created_at").map_err(|e| corrupt("created_at", e))?,
        updated_at: row.try_get("updated_at").map_err(|e| corrupt("updated_at", e))?,
    })
}

fn map_history_row(row: &PgRow) -> Result<WalletHistoryEntry, StoreError> {
    let field = |column: &str, e: sqlx::Error| StoreError::Corrupt(format!("wallet_history.{}: {}", column, e));

    let action = row
        .try_get::<String, _>("action")
        .map_err(|e| field("action", e))?
        .parse::<WalletAction>()
        .map_err(StoreError::Corrupt)?;
    let Json(metadata) = row
        .try_get::<Json<HistoryMetadata>, _>("metadata")
        .map_err(|e| field("metadata", e))?;

    Ok(WalletHistoryEntry {
        id: row.try_get::<i64, _>("id").map_err(|e| field("id", e))? as u64,
        user_id: row.try_get("user_id").map_err(|e| field("user_id", e))?,
        wallet_address: row.try_get("wallet_address").map_err(|e| field("wallet_address", e))?,
        wallet_type: row.try_get("wallet_type").map_err(|e| field("wallet_type", e))?,
        action,
        auth_provider: row.try_get("auth_provider").map_err(|e| field("auth_provider", e))?,
        ip_address: row.try_get("ip_address").map_err(|e| field("ip_address", e))?,
        user_agent: row.try_get("user_agent").map_err(|e| field("user_agent", e))?,
        metadata,
        created_at: row.try_get("created_at").map_err(|e| field("created_at", e))?,
    })
}

// 여러 사용자의 역할 목록 조회 (부여 시각 순)
// Load role grants for a set of users
async fn load_roles<'e, E>(
    executor: E,
    user_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<RoleGrant>>, StoreError>
where
    E: Executor<'e, Database = Postgres>,
{
    let mut grants: HashMap<Uuid, Vec<RoleGrant>> = HashMap::new();
    if user_ids.is_empty() {
        return Ok(grants);
    }

    let rows = sqlx::query(
        r#"
        SELECT user_id, role, granted_at
        FROM user_roles
        WHERE user_id = ANY($1)
        ORDER BY granted_at, id
        "#,
    )
    .bind(user_ids.to_vec())
    .fetch_all(executor)
    .await
    .map_err(|e| StoreError::from_sqlx(e, "Failed to load user roles"))?;

    for row in rows {
        let user_id: Uuid = row.try_get("user_id").map_err(|e| corrupt("user_roles.user_id", e))?;
        let role = row
            .try_get::<String, _>("role")
            .map_err(|e| corrupt("user_roles.role", e))?
            .parse::<RoleTag>()
            .map_err(|e| corrupt("user_roles.role", e))?;
        let granted_at: DateTime<Utc> = row
            .try_get("granted_at")
            .map_err(|e| corrupt("user_roles.granted_at", e))?;
        grants.entry(user_id).or_default().push(RoleGrant { role, granted_at });
    }

    Ok(grants)
}

fn status_column(role: RoleTag) -> Option<&'static str> {
    match role {
        RoleTag::Talent => Some("talent_status"),
        RoleTag::Mentor => Some("mentor_status"),
        RoleTag::Recruiter => Some("recruiter_status"),
        RoleTag::Admin => None,
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_candidates(
        &self,
        address: &str,
        email: Option<&str>,
    ) -> Result<Vec<User>, StoreError> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE current_wallet_address = $1
               OR legacy_wallet_address = $1
               OR ($2::TEXT IS NOT NULL AND email = $2)
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(address)
            .bind(email)
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| StoreError::from_sqlx(e, "Failed to look up wallet candidates"))?;

        let ids: Vec<Uuid> = rows
            .iter()
            .map(|row| row.try_get::<Uuid, _>("id"))
            .collect::<Result<_, _>>()
            .map_err(|e| corrupt("id", e))?;
        let mut roles = load_roles(self.db.pool(), &ids).await?;

        rows.iter()
            .zip(ids.iter())
            .map(|(row, id)| map_user_row(row, roles.remove(id).unwrap_or_default()))
            .collect()
    }

    async fn commit_reconciliation(
        &self,
        write: AccountWrite,
        history: HistoryDraft,
    ) -> Result<Option<User>, StoreError> {
        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| StoreError::from_sqlx(e, "Failed to begin transaction"))?;

        // 1. 사용자 행 쓰기
        let row = match &write {
            AccountWrite::Create(new_user) => {
                let sql = format!(
                    r#"
                    INSERT INTO users (
                        id, legacy_wallet_address, current_wallet_address, smart_account_address,
                        email, auth_provider, auth_method, login_method, metadata,
                        talent_status, mentor_status, recruiter_status, created_at, updated_at
                    )
                    VALUES ($1, NULL, $2, $3, $4, $5, $6, $7, $8, 'pending', 'pending', 'pending', $9, $9)
                    RETURNING {USER_COLUMNS}
                    "#
                );
                sqlx::query(&sql)
                    .bind(new_user.id)
                    .bind(&new_user.current_wallet_address)
                    .bind(&new_user.smart_account_address)
                    .bind(&new_user.email)
                    .bind(&new_user.auth_provider)
                    .bind(new_user.auth_method.as_str())
                    .bind(&new_user.login_method)
                    .bind(Json(&new_user.metadata))
                    .bind(new_user.created_at)
                    .fetch_one(&mut *tx)
                    .await
                    .map(Some)
                    .map_err(|e| StoreError::from_sqlx(e, "Failed to create user"))?
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
                let sql = format!(
                    r#"
                    UPDATE users
                    SET current_wallet_address = $2,
                        smart_account_address = $3,
                        auth_provider = $4,
                        auth_method = $5,
                        login_method = $6,
                        metadata = $7,
                        updated_at = NOW()
                    WHERE id = $1
                    RETURNING {USER_COLUMNS}
                    "#
                );
                sqlx::query(&sql)
                    .bind(user_id)
                    .bind(current_wallet_address)
                    .bind(smart_account_address)
                    .bind(auth_provider)
                    .bind(auth_method.as_str())
                    .bind(login_method)
                    .bind(Json(metadata))
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| StoreError::from_sqlx(e, "Failed to migrate legacy user"))?
            }
            AccountWrite::Refresh {
                user_id,
                last_auth_provider,
                smart_account_address,
                login_method,
                metadata,
            } => {
                let sql = format!(
                    r#"
                    UPDATE users
                    SET last_auth_provider = $2,
                        smart_account_address = COALESCE($3, smart_account_address),
                        login_method = $4,
                        metadata = $5,
                        updated_at = NOW()
                    WHERE id = $1
                    RETURNING {USER_COLUMNS}
                    "#
                );
                sqlx::query(&sql)
                    .bind(user_id)
                    .bind(last_auth_provider)
                    .bind(smart_account_address)
                    .bind(login_method)
                    .bind(Json(metadata))
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| StoreError::from_sqlx(e, "Failed to update returning user"))?
            }
        };

        let Some(row) = row else {
            tx.rollback()
                .await
                .map_err(|e| StoreError::from_sqlx(e, "Failed to roll back transaction"))?;
            return Ok(None);
        };

        let user_id = write.user_id();
        let mut roles = load_roles(&mut *tx, &[user_id]).await?;
        let user = map_user_row(&row, roles.remove(&user_id).unwrap_or_default())?;

        // 2. 지갑 이력 추가
        sqlx::query(
            r#"
            INSERT INTO wallet_history (
                user_id, wallet_address, wallet_type, action, auth_provider,
                ip_address, user_agent, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&history.wallet_address)
        .bind(&history.wallet_type)
        .bind(history.action.as_str())
        .bind(&history.auth_provider)
        .bind(&history.ip_address)
        .bind(&history.user_agent)
        .bind(Json(&history.metadata))
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "Failed to append wallet history"))?;

        // 3. 커밋
        tx.commit()
            .await
            .map_err(|e| StoreError::from_sqlx(e, "Failed to commit reconciliation"))?;

        Ok(Some(user))
    }

    // ID로 사용자 조회
    // Get user by ID
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| StoreError::from_sqlx(e, "Failed to fetch user by id"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut roles = load_roles(self.db.pool(), &[id]).await?;
        map_user_row(&row, roles.remove(&id).unwrap_or_default()).map(Some)
    }

    // 이메일로 사용자 조회
    // Get user by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| StoreError::from_sqlx(e, "Failed to fetch user by email"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let id: Uuid = row.try_get("id").map_err(|e| corrupt("id", e))?;
        let mut roles = load_roles(self.db.pool(), &[id]).await?;
        map_user_row(&row, roles.remove(&id).unwrap_or_default()).map(Some)
    }

    async fn wallet_history(&self, user_id: Uuid) -> Result<Vec<WalletHistoryEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, wallet_address, wallet_type, action, auth_provider,
                   ip_address, user_agent, metadata, created_at
            FROM wallet_history
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| StoreError::from_sqlx(e, "Failed to fetch wallet history"))?;

        rows.iter().map(map_history_row).collect()
    }

    async fn approve_role(&self, user_id: Uuid, role: RoleTag) -> Result<Option<User>, StoreError> {
        let column = status_column(role)
            .ok_or_else(|| StoreError::Query(format!("{} role has no approval status", role)))?;

        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| StoreError::from_sqlx(e, "Failed to begin transaction"))?;

        let sql = format!(
            "UPDATE users SET {column} = 'approved', updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "Failed to approve role"))?;

        let Some(row) = row else {
            tx.rollback()
                .await
                .map_err(|e| StoreError::from_sqlx(e, "Failed to roll back transaction"))?;
            return Ok(None);
        };

        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role, granted_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, role) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "Failed to record role grant"))?;

        let mut roles = load_roles(&mut *tx, &[user_id]).await?;
        let user = map_user_row(&row, roles.remove(&user_id).unwrap_or_default())?;

        tx.commit()
            .await
            .map_err(|e| StoreError::from_sqlx(e, "Failed to commit role approval"))?;

        Ok(Some(user))
    }

    async fn find_legacy_credential(&self, email: &str) -> Result<Option<LegacyCredential>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash
            FROM auth_users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| StoreError::from_sqlx(e, "Failed to fetch legacy credential"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(LegacyCredential {
            id: row.try_get("id").map_err(|e| corrupt("auth_users.id", e))?,
            email: row.try_get("email").map_err(|e| corrupt("auth_users.email", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| corrupt("auth_users.password_hash", e))?,
        }))
    }
}
