// 지갑 인증 서비스 (오케스트레이션)
// Received → Validated → Resolved → Written → Signed
//
// - 같은 주소의 동시 요청은 AddressLocks로 조회~쓰기 구간을 직렬화
// - 전체 처리 시간은 timeout으로 제한
// - 재시도 없음
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use crate::domains::auth::models::{
    ClientContext, ConnectPayload, MigrationType, User, VerifiedUser, WalletVerifyRequest,
    WalletVerifyResponse,
};
use crate::domains::auth::services::{
    AccountWriter, IdentityResolver, IssuedSession, ResolutionKind, SessionIssuer,
};
use crate::shared::database::UserStore;
use crate::shared::errors::AuthError;
use crate::shared::utils::AddressLocks;

/// 검증 완료 결과
#[derive(Debug, Clone)]
pub struct WalletVerification {
    pub user: User,
    pub session: IssuedSession,
    pub kind: ResolutionKind,
    pub payload: ConnectPayload,
    pub processing_time_ms: u64,
}

impl WalletVerification {
    pub fn response(&self) -> WalletVerifyResponse {
        let is_migration = self.kind == ResolutionKind::Migration;

        WalletVerifyResponse {
            success: true,
            user: VerifiedUser {
                user_id: self.user.id,
                email: self.user.email.clone(),
                address: self.payload.address.clone(),
                smart_account: self.payload.smart_account.clone(),
                auth_provider: self.payload.auth_provider.clone(),
                auth_method: self.payload.auth_method,
            },
            token: self.session.token.clone(),
            is_new_user: self.kind == ResolutionKind::New,
            is_migration,
            migration_type: is_migration.then_some(MigrationType::Legacy),
            processing_time: self.processing_time_ms,
        }
    }
}

#[derive(Clone)]
pub struct WalletAuthService {
    resolver: IdentityResolver,
    writer: AccountWriter,
    issuer: SessionIssuer,
    locks: Arc<AddressLocks>,
    timeout: Duration,
}

impl WalletAuthService {
    pub fn new(store: Arc<dyn UserStore>, issuer: SessionIssuer, timeout: Duration) -> Self {
        Self {
            resolver: IdentityResolver::new(store.clone()),
            writer: AccountWriter::new(store),
            issuer,
            locks: Arc::new(AddressLocks::new()),
            timeout,
        }
    }

    /// 지갑 연결 이벤트 처리
    /// Reconcile a wallet-connect event and issue a session
    pub async fn verify(
        &self,
        request: WalletVerifyRequest,
        client: &ClientContext,
        started: Instant,
    ) -> Result<WalletVerification, AuthError> {
        // 1. 필수 필드 검증 (400)
        let payload = ConnectPayload::try_from(request)?;

        // 2~4. 판별 → 쓰기 → 서명 (전체 타임아웃)
        tokio::time::timeout(self.timeout, self.reconcile(payload, client, started))
            .await
            .map_err(|_| AuthError::Timeout)?
    }

    async fn reconcile(
        &self,
        payload: ConnectPayload,
        client: &ClientContext,
        started: Instant,
    ) -> Result<WalletVerification, AuthError> {
        let (user, kind) = {
            let _guard = self.locks.acquire(&payload.address).await;

            let resolution = self
                .resolver
                .resolve(&payload.address, payload.email.as_deref())
                .await?;
            let kind = resolution.kind();
            debug!(address = %payload.address, ?kind, "Resolved wallet identity");

            let user = self.writer.write(&resolution, &payload, client, started).await?;
            (user, kind)
        };

        let session = self.issuer.issue(&user, &payload.auth_provider)?;
        let processing_time_ms = started.elapsed().as_millis() as u64;

        info!(
            user_id = %user.id,
            ?kind,
            auth_provider = %payload.auth_provider,
            processing_time_ms,
            "Wallet verification completed"
        );

        Ok(WalletVerification {
            user,
            session,
            kind,
            payload,
            processing_time_ms,
        })
    }
}
