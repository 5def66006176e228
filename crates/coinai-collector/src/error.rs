//! 에러 타입 정의.

use coinai_core::CoreError;
use coinai_data::DataError;
use thiserror::Error;

/// Collector 에러 타입
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 데이터베이스 연결/생성 실패 (데이터베이스 모드에 치명적)
    #[error("Connection error: {0}")]
    Connection(String),

    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),

    /// 저장소 에러
    #[error("Storage error: {0}")]
    Data(DataError),

    /// 코어 에러 (감시 목록, 로깅)
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<DataError> for CollectorError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::ConnectionError(msg) => Self::Connection(msg),
            other => Self::Data(other),
        }
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_is_lifted() {
        let err: CollectorError = DataError::ConnectionError("refused".to_string()).into();
        assert!(matches!(err, CollectorError::Connection(ref m) if m == "refused"));

        let err: CollectorError = DataError::QueryError("syntax".to_string()).into();
        assert!(matches!(err, CollectorError::Data(_)));
    }
}
