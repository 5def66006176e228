//! 핵심 에러 타입.
//!
//! 정규화 실패와 설정/로깅 초기화 실패를 구분합니다.

use thiserror::Error;

/// 코어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 로깅 초기화 에러
    #[error("로깅 에러: {0}")]
    Logging(String),

    /// 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(#[from] std::io::Error),
}

/// 코어 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}

/// 가격 시계열을 레코드로 정규화하지 못한 이유.
///
/// 어느 경우든 해당 항목은 이번 수집 배치에서 제외됩니다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizationError {
    /// 관측치가 2개 미만
    #[error("관측치 부족: {observations}개 (최소 2개 필요)")]
    InsufficientHistory { observations: usize },

    /// 이전 관측치가 0
    #[error("이전 가격이 0이므로 변동률을 계산할 수 없음")]
    ZeroPrevious,

    /// 현재 가격이 유한한 양수가 아님
    #[error("잘못된 현재 가격: {0}")]
    InvalidPrice(f64),
}
