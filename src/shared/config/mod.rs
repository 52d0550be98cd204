// 서버 설정 (환경 변수)
// Server configuration loaded from the environment
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use anyhow::{Context, Result};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3002";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_RECONCILE_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 없으면 인메모리 저장소 사용
    pub database_url: Option<String>,
    /// 세션 서명 키 (없으면 wallet-verify가 500)
    pub jwt_secret: Option<String>,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    pub cookie_secure: bool,
    pub reconcile_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            jwt_secret: None,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3002)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            cookie_secure: !cfg!(debug_assertions),
            reconcile_timeout: Duration::from_millis(DEFAULT_RECONCILE_TIMEOUT_MS),
        }
    }
}

impl AppConfig {
    /// Create configuration from environment variables
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` - Postgres URL (optional, in-memory store when absent)
    /// - `JWT_SECRET` - Session signing secret
    /// - `BIND_ADDR` - Listen address (default: 0.0.0.0:3002)
    /// - `CORS_ORIGIN` - Allowed browser origin (default: http://localhost:3000)
    /// - `COOKIE_SECURE` - Secure cookie flag (default: true in release builds)
    /// - `RECONCILE_TIMEOUT_MS` - wallet-verify timeout (default: 10000)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        // 빈 문자열은 미설정으로 취급
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address (e.g. 0.0.0.0:3002)")?;

        let cookie_secure = match get("COOKIE_SECURE") {
            Some(value) => parse_bool(&value)
                .with_context(|| format!("COOKIE_SECURE must be true/false, got {:?}", value))?,
            None => defaults.cookie_secure,
        };

        let reconcile_timeout = match get("RECONCILE_TIMEOUT_MS") {
            Some(value) => Duration::from_millis(
                value
                    .parse::<u64>()
                    .with_context(|| format!("RECONCILE_TIMEOUT_MS must be milliseconds, got {:?}", value))?,
            ),
            None => defaults.reconcile_timeout,
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            jwt_secret: get("JWT_SECRET"),
            bind_addr,
            cors_origin: get("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            cookie_secure,
            reconcile_timeout,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
