use thiserror::Error;

/// 저장소(UserStore) 에러
/// User store errors
///
/// Postgres 구현과 in-memory 구현이 같은 에러 타입을 반환합니다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// 유니크 제약 위반 (같은 지갑 주소 / 이메일이 이미 존재)
    /// Unique constraint violation
    #[error("Conflicting record: {0}")]
    Conflict(String),

    /// 쿼리 실패 (연결 끊김, 문법 오류 등)
    /// Any other backend failure
    #[error("Store query failed: {0}")]
    Query(String),

    /// 디코딩할 수 없는 행
    /// Row could not be decoded into a domain type
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// sqlx 에러 변환 (23505 = unique_violation)
    /// Map a sqlx error, keeping unique violations distinguishable
    pub fn from_sqlx(err: sqlx::Error, context: &str) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.code().as_deref() == Some("23505") {
                return StoreError::Conflict(format!("{}: {}", context, db_err.message()));
            }
        }
        StoreError::Query(format!("{}: {}", context, err))
    }
}
