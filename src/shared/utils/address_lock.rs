/// 지갑 주소별 락 테이블
/// Per-address lock table
///
/// 같은 주소로 동시에 들어온 연결 요청은 조회 → 쓰기 구간을 순서대로 실행합니다.
/// 다른 주소끼리는 서로 막지 않습니다.
///
/// 마지막 보유자가 락을 놓으면 테이블 항목도 제거되므로
/// 테이블 크기는 "현재 처리 중인 주소 수"를 넘지 않습니다.
///
/// 사용 방법:
/// ```rust,ignore
/// let _guard = locks.acquire("0xABC").await;
/// // 조회 + 쓰기
/// ```

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub struct AddressLocks {
    table: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl AddressLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 주소 락 획득 (같은 주소의 이전 보유자가 끝날 때까지 대기)
    /// Acquire the lock for `address`
    pub async fn acquire(&self, address: &str) -> AddressGuard<'_> {
        let lock = {
            let mut table = self.table.lock();
            table
                .entry(address.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        let guard = lock.clone().lock_owned().await;

        AddressGuard {
            locks: self,
            address: address.to_string(),
            lock,
            guard: Some(guard),
        }
    }

    /// 현재 테이블에 있는 주소 수 (디버깅용)
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct AddressGuard<'a> {
    locks: &'a AddressLocks,
    address: String,
    lock: Arc<AsyncMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for AddressGuard<'_> {
    fn drop(&mut self) {
        // 락을 먼저 풀고, 테이블 외에 참조가 없으면 항목 제거
        // (테이블 1 + self.lock 1 = 2: 대기자 없음)
        drop(self.guard.take());
        let mut table = self.locks.table.lock();
        if Arc::strong_count(&self.lock) == 2 {
            table.remove(&self.address);
        }
    }
}
