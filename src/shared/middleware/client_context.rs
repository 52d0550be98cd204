use std::convert::Infallible;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::USER_AGENT, request::Parts, HeaderMap},
};
use crate::domains::auth::models::ClientContext;

/// 요청 헤더에서 클라이언트 정보 추출
/// IP: x-forwarded-for 첫 항목 → x-real-ip → "unknown"
#[async_trait]
impl<S> FromRequestParts<S> for ClientContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(client_context(&parts.headers))
    }
}

pub fn client_context(headers: &HeaderMap) -> ClientContext {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    let ip_address = header("x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or_else(|| header("x-real-ip"));
    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());

    ClientContext::new(ip_address, user_agent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_first_entry_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));

        let client = client_context(&headers);
        assert_eq!(client.ip_address, "203.0.113.7");
        assert_eq!(client.user_agent, ClientContext::UNKNOWN);
    }

    #[test]
    fn test_real_ip_fallback_and_user_agent() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));

        let client = client_context(&headers);
        assert_eq!(client.ip_address, "10.0.0.2");
        assert_eq!(client.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn test_no_headers_is_unknown() {
        let client = client_context(&HeaderMap::new());
        assert_eq!(client.ip_address, ClientContext::UNKNOWN);
        assert_eq!(client.user_agent, ClientContext::UNKNOWN);
    }
}
