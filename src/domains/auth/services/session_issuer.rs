// src/domains/auth/services/session_issuer.rs
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use crate::domains::auth::models::{SessionClaims, User, SESSION_TTL_SECONDS, WALLET_TYPE_TAG};
use crate::shared::errors::AuthError;

pub const SESSION_COOKIE: &str = "session_token";
pub const USER_ID_COOKIE: &str = "user_id";
pub const USER_EMAIL_COOKIE: &str = "user_email";
pub const USER_ADDRESS_COOKIE: &str = "user_address";
pub const SMART_ACCOUNT_COOKIE: &str = "smart_account";

const ALL_COOKIES: [&str; 5] = [
    SESSION_COOKIE,
    USER_ID_COOKIE,
    USER_EMAIL_COOKIE,
    USER_ADDRESS_COOKIE,
    SMART_ACCOUNT_COOKIE,
];

/// 발급된 세션
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub claims: SessionClaims,
}

/// 세션 발급기
/// Session Issuer: signs session tokens and writes session cookies
#[derive(Clone)]
pub struct SessionIssuer {
    keys: Option<(EncodingKey, DecodingKey)>,
    cookie_secure: bool,
}

impl SessionIssuer {
    /// secret이 없거나 비어 있으면 서명 시 SigningError
    /// Create issuer; an absent or empty secret makes signing fail
    pub fn new(secret: Option<String>, cookie_secure: bool) -> Self {
        let keys = secret.filter(|s| !s.is_empty()).map(|secret| {
            (
                EncodingKey::from_secret(secret.as_ref()),
                DecodingKey::from_secret(secret.as_ref()),
            )
        });

        Self { keys, cookie_secure }
    }

    /// 세션 토큰 발급 (7일)
    /// Issue a session token for a freshly written user row
    pub fn issue(&self, user: &User, auth_provider: &str) -> Result<IssuedSession, AuthError> {
        let (encoding_key, _) = self
            .keys
            .as_ref()
            .ok_or_else(|| AuthError::Signing("signing secret is not configured".to_string()))?;

        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            user_id: user.id,
            wallet_address: user.current_wallet_address.clone(),
            smart_account: user.smart_account_address.clone(),
            email: user.email.clone(),
            auth_provider: auth_provider.to_string(),
            wallet_type: WALLET_TYPE_TAG.to_string(),
            iat: now,
            exp: now + SESSION_TTL_SECONDS,
        };

        let token = encode(&Header::default(), &claims, encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        Ok(IssuedSession { token, claims })
    }

    /// 세션 토큰 검증 (서명 + 만료)
    /// Verify a session token
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let (_, decoding_key) = self
            .keys
            .as_ref()
            .ok_or_else(|| AuthError::Signing("signing secret is not configured".to_string()))?;

        decode::<SessionClaims>(token, decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    fn cookie(&self, name: &'static str, value: String, http_only: bool) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(http_only)
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(SESSION_TTL_SECONDS))
            .build()
    }

    /// 세션 쿠키 설정
    /// session_token (HttpOnly) + 클라이언트에서 읽는 user_id / user_email / user_address / smart_account
    pub fn set_cookies(
        &self,
        jar: CookieJar,
        session: &IssuedSession,
        user: &User,
        address: &str,
        smart_account: Option<&str>,
    ) -> CookieJar {
        let mut jar = jar
            .add(self.cookie(SESSION_COOKIE, session.token.clone(), true))
            .add(self.cookie(USER_ID_COOKIE, user.id.to_string(), false))
            .add(self.cookie(USER_ADDRESS_COOKIE, address.to_string(), false));

        if let Some(email) = &user.email {
            jar = jar.add(self.cookie(USER_EMAIL_COOKIE, email.clone(), false));
        }
        if let Some(smart_account) = smart_account {
            jar = jar.add(self.cookie(SMART_ACCOUNT_COOKIE, smart_account.to_string(), false));
        }

        jar
    }

    /// 세션 쿠키 전부 제거 (로그아웃)
    /// 요청에 없던 쿠키도 만료 쿠키로 내려보냄
    pub fn clear_cookies(&self, jar: CookieJar) -> CookieJar {
        ALL_COOKIES.iter().fold(jar, |jar, name| {
            let mut cookie = Cookie::build((*name, ""))
                .path("/")
                .same_site(SameSite::Lax)
                .build();
            cookie.make_removal();
            jar.add(cookie)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use crate::domains::auth::models::RoleStatus;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            legacy_wallet_address: None,
            current_wallet_address: Some("0xNEW".to_string()),
            smart_account_address: None,
            email: None,
            auth_provider: Some("google".to_string()),
            last_auth_provider: None,
            auth_method: None,
            login_method: None,
            metadata: None,
            talent_status: RoleStatus::Pending,
            mentor_status: RoleStatus::Pending,
            recruiter_status: RoleStatus::Pending,
            roles: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = SessionIssuer::new(Some("test-secret".to_string()), false);
        let user = user();

        let session = issuer.issue(&user, "google").unwrap();
        assert_eq!(session.claims.exp - session.claims.iat, 7 * 24 * 3600);
        assert_eq!(session.claims.wallet_type, "primary-chain");

        let claims = issuer.verify(&session.token).unwrap();
        assert_eq!(claims, session.claims);
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.wallet_address.as_deref(), Some("0xNEW"));
    }

    #[test]
    fn test_missing_secret_is_signing_error() {
        let issuer = SessionIssuer::new(None, false);
        let err = issuer.issue(&user(), "google").unwrap_err();
        assert!(matches!(err, AuthError::Signing(_)));

        let issuer = SessionIssuer::new(Some(String::new()), false);
        assert!(matches!(issuer.issue(&user(), "google"), Err(AuthError::Signing(_))));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let issuer = SessionIssuer::new(Some("secret-a".to_string()), false);
        let other = SessionIssuer::new(Some("secret-b".to_string()), false);
        let session = other.issue(&user(), "google").unwrap();

        assert!(matches!(issuer.verify(&session.token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_cookies_skip_absent_email_and_smart_account() {
        let issuer = SessionIssuer::new(Some("test-secret".to_string()), true);
        let user = user();
        let session = issuer.issue(&user, "google").unwrap();

        let jar = issuer.set_cookies(CookieJar::new(), &session, &user, "0xNEW", None);

        let token_cookie = jar.get(SESSION_COOKIE).unwrap();
        assert_eq!(token_cookie.value(), session.token);
        assert_eq!(token_cookie.http_only(), Some(true));
        assert_eq!(token_cookie.secure(), Some(true));
        assert_eq!(jar.get(USER_ADDRESS_COOKIE).unwrap().value(), "0xNEW");
        assert_eq!(jar.get(USER_ID_COOKIE).unwrap().value(), user.id.to_string());
        assert!(jar.get(USER_EMAIL_COOKIE).is_none());
        assert!(jar.get(SMART_ACCOUNT_COOKIE).is_none());
    }

    #[test]
    fn test_clear_cookies_expires_all_five() {
        let issuer = SessionIssuer::new(Some("test-secret".to_string()), false);
        let jar = issuer.clear_cookies(CookieJar::new());

        for name in ALL_COOKIES {
            let cookie = jar.get(name).unwrap();
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        }
    }
}
