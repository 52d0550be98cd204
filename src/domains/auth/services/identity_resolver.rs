// 신원 판별 (Identity Resolver)
// 주소 / 이메일로 후보 행을 찾고 new / migration / returning 중 하나로 분류합니다.
use std::sync::Arc;
use crate::domains::auth::models::{User, ADDRESS_REQUIRED};
use crate::shared::database::UserStore;
use crate::shared::errors::AuthError;

/// 분류 결과
/// Outcome of identity resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// 일치하는 행 없음
    New,
    /// 레거시 주소 일치 + 현재 주소 없음
    Migration(User),
    /// 그 외 일치
    Returning(User),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    New,
    Migration,
    Returning,
}

impl Resolution {
    pub fn kind(&self) -> ResolutionKind {
        match self {
            Resolution::New => ResolutionKind::New,
            Resolution::Migration(_) => ResolutionKind::Migration,
            Resolution::Returning(_) => ResolutionKind::Returning,
        }
    }

    pub fn matched_user(&self) -> Option<&User> {
        match self {
            Resolution::New => None,
            Resolution::Migration(user) | Resolution::Returning(user) => Some(user),
        }
    }
}

// 일치 우선순위: 현재 주소(0) > 레거시 주소(1) > 이메일(2)
fn match_rank(user: &User, address: &str, email: Option<&str>) -> Option<u8> {
    if user.current_wallet_address.as_deref() == Some(address) {
        Some(0)
    } else if user.legacy_wallet_address.as_deref() == Some(address) {
        Some(1)
    } else if email.is_some() && user.email.as_deref() == email {
        Some(2)
    } else {
        None
    }
}

/// 후보 행 중 하나를 고르고 분류
/// Pick one candidate with an explicit tie-break and classify it.
///
/// Ties within a rank go to the oldest row (`created_at`, then `id`).
pub fn classify(address: &str, email: Option<&str>, candidates: Vec<User>) -> Resolution {
    let chosen = candidates
        .into_iter()
        .filter_map(|user| match_rank(&user, address, email).map(|rank| (rank, user)))
        .min_by(|(rank_a, a), (rank_b, b)| {
            rank_a
                .cmp(rank_b)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });

    match chosen {
        None => Resolution::New,
        Some((_, user))
            if user.legacy_wallet_address.as_deref() == Some(address)
                && user.current_wallet_address.is_none() =>
        {
            Resolution::Migration(user)
        }
        Some((_, user)) => Resolution::Returning(user),
    }
}

#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn UserStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, address: &str, email: Option<&str>) -> Result<Resolution, AuthError> {
        if address.trim().is_empty() {
            return Err(AuthError::Validation(ADDRESS_REQUIRED.to_string()));
        }

        let candidates = self.store.find_candidates(address, email).await?;
        Ok(classify(address, email, candidates))
    }
}
