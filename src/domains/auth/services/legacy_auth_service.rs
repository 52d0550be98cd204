use std::sync::Arc;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use crate::domains::auth::models::LegacyCredential;
use crate::shared::database::UserStore;
use crate::shared::errors::AuthError;

// 레거시 email/password 인증 서비스
// Legacy email/password authentication (auth_users 테이블)
#[derive(Clone)]
pub struct LegacyAuthService {
    store: Arc<dyn UserStore>,
}

impl LegacyAuthService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    // 로그인 (비즈니스 로직)
    pub async fn login(&self, email: &str, password: &str) -> Result<LegacyCredential, AuthError> {
        // 1. 이메일로 계정 조회
        let credential = self
            .store
            .find_legacy_credential(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // 2. 비밀번호 검증
        Self::verify_password(password, &credential.password_hash)?;

        Ok(credential)
    }

    // 비밀번호 검증
    // - $2a$ / $2b$ / $2y$: bcrypt (기존 auth_users 행)
    // - 그 외: Argon2 PHC 문자열
    fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
        if is_bcrypt_hash(password_hash) {
            let matched = bcrypt::verify(password, password_hash)
                .map_err(|e| AuthError::PasswordVerificationFailed(format!("Invalid bcrypt hash: {}", e)))?;
            return if matched { Ok(()) } else { Err(AuthError::InvalidCredentials) };
        }

        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::PasswordVerificationFailed(format!("Invalid password hash: {}", e)))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        Ok(())
    }
}

fn is_bcrypt_hash(password_hash: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| password_hash.starts_with(prefix))
}
