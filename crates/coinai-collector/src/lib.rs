//! Scheduled market-quote collector for the CoinAI pipeline.
//!
//! 이 crate는 수집 파이프라인과 바이너리를 제공합니다:
//! - 주식/ETF, 환율 항목별 수집 (실패 격리)
//! - Parquet 스냅샷, MySQL, XLSX 리포트 sink로의 배치 전달
//! - 실행 시간/주기 기반 스케줄러

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::{CollectorConfig, RunConfig, RunMode};
pub use error::{CollectorError, Result};
pub use modules::{RunState, Scheduler};
pub use stats::CollectionStats;
