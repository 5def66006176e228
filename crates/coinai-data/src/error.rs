//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 외부 시세 제공자 조회 오류.
///
/// 항목 단위로 복구되며, 해당 항목만 배치에서 제외됩니다.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 네트워크/타임아웃 오류
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP 상태 오류
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// 제공자 API 오류
    #[error("API error: {0}")]
    Api(String),

    /// 응답 형식 오류
    #[error("Malformed response: {0}")]
    Parse(String),

    /// 응답에 요청한 항목이 없음
    #[error("Not found in response: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ProviderError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            ProviderError::Parse(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// 저장소(sink) 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터베이스 연결 오류
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// 쿼리 실행 오류
    #[error("Query error: {0}")]
    QueryError(String),

    /// 데이터 삽입 오류
    #[error("Insert error: {0}")]
    InsertError(String),

    /// 허용되지 않는 식별자 (데이터베이스명 등)
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 리포트 생성 오류
    #[error("Report error: {0}")]
    ReportError(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut => {
                DataError::ConnectionError(err.to_string())
            }
            sqlx::Error::Database(db_err) => DataError::QueryError(db_err.message().to_string()),
            _ => DataError::QueryError(err.to_string()),
        }
    }
}

impl From<polars::prelude::PolarsError> for DataError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for DataError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        DataError::ReportError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
