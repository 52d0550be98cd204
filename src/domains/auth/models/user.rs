use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use crate::domains::auth::models::UserMetadata;

/// 인증 방식 (in-app 지갑 / 외부 확장 지갑)
/// Authentication method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethod {
    InApp,
    External,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::InApp => "in-app",
            AuthMethod::External => "external",
        }
    }
}

impl FromStr for AuthMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-app" => Ok(AuthMethod::InApp),
            "external" => Ok(AuthMethod::External),
            other => Err(format!("Unsupported authentication method: {}", other)),
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 역할 승인 상태
/// Approval status of a professional role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleStatus {
    #[default]
    Pending,
    Approved,
}

impl RoleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleStatus::Pending => "pending",
            RoleStatus::Approved => "approved",
        }
    }
}

impl FromStr for RoleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RoleStatus::Pending),
            "approved" => Ok(RoleStatus::Approved),
            other => Err(format!("Unknown role status: {}", other)),
        }
    }
}

/// 역할 태그
/// Role tag. `Admin` is granted out of band and never has a status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleTag {
    Talent,
    Mentor,
    Recruiter,
    Admin,
}

impl RoleTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleTag::Talent => "talent",
            RoleTag::Mentor => "mentor",
            RoleTag::Recruiter => "recruiter",
            RoleTag::Admin => "admin",
        }
    }

    pub fn is_professional(&self) -> bool {
        !matches!(self, RoleTag::Admin)
    }
}

impl FromStr for RoleTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "talent" => Ok(RoleTag::Talent),
            "mentor" => Ok(RoleTag::Mentor),
            "recruiter" => Ok(RoleTag::Recruiter),
            "admin" => Ok(RoleTag::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 부여된 역할 기록
/// Granted role record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoleGrant {
    pub role: RoleTag,
    pub granted_at: DateTime<Utc>,
}

/// 사용자 (플랫폼 신원 하나)
/// One platform identity
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub legacy_wallet_address: Option<String>,
    pub current_wallet_address: Option<String>,
    pub smart_account_address: Option<String>,
    pub email: Option<String>,
    pub auth_provider: Option<String>,
    pub last_auth_provider: Option<String>,
    pub auth_method: Option<AuthMethod>,
    pub login_method: Option<String>,
    pub metadata: Option<UserMetadata>,
    pub talent_status: RoleStatus,
    pub mentor_status: RoleStatus,
    pub recruiter_status: RoleStatus,
    /// 부여 시각 순서
    pub roles: Vec<RoleGrant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, role: RoleTag) -> bool {
        self.roles.iter().any(|grant| grant.role == role)
    }
}

/// 사용자 응답 모델 (API 노출용)
/// User response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = UserResponse)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F")]
    pub wallet_address: Option<String>,
    pub legacy_wallet_address: Option<String>,
    pub smart_account_address: Option<String>,
    #[schema(example = "user@example.com")]
    pub email: Option<String>,
    #[schema(example = "google")]
    pub auth_provider: Option<String>,
    pub last_auth_provider: Option<String>,
    pub auth_method: Option<AuthMethod>,
    #[schema(example = "new-system")]
    pub login_method: Option<String>,
    pub talent_status: RoleStatus,
    pub mentor_status: RoleStatus,
    pub recruiter_status: RoleStatus,
    pub roles: Vec<RoleGrant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            wallet_address: user.current_wallet_address,
            legacy_wallet_address: user.legacy_wallet_address,
            smart_account_address: user.smart_account_address,
            email: user.email,
            auth_provider: user.auth_provider,
            last_auth_provider: user.last_auth_provider,
            auth_method: user.auth_method,
            login_method: user.login_method,
            talent_status: user.talent_status,
            mentor_status: user.mentor_status,
            recruiter_status: user.recruiter_status,
            roles: user.roles,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
