/// 공유 유틸리티 모듈
/// Shared Utilities Module
///
/// 역할:
/// - 지갑 주소별 비동기 락 (동일 주소 동시 연결 직렬화)
pub mod address_lock;

pub use address_lock::*;
