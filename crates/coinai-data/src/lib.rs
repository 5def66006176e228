//! 시세 데이터 조회 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - 가격 시계열 Provider (Yahoo Finance 주식/ETF, AwesomeAPI 환율)
//! - Parquet 스냅샷 저장/로드
//! - MySQL 저장소 (스키마 보장 + 배치 삽입)
//! - XLSX 리포트 (추세 조건부 서식)

pub mod error;
pub mod provider;
pub mod storage;

pub use error::{DataError, ProviderError, Result};

// Provider 재내보내기
pub use provider::{AwesomeApiRateSource, PriceSource, YahooQuoteSource};

// 저장소 타입 재내보내기
pub use storage::{report_file_name, snapshot_file_name, FILE_STAMP_FORMAT};
pub use storage::mysql::{DatabaseState, InsertOutcome, MysqlSettings, MysqlStore};
pub use storage::report::ReportWriter;
pub use storage::snapshot::{SnapshotRecord, SnapshotWriter};
