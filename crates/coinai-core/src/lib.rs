//! # CoinAI Core
//!
//! 시세 수집기의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 수집 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 주식/ETF 시세 레코드와 환율 레코드
//! - 가격 시계열 정규화 (변동률, 추세 계산)
//! - 감시 목록(watchlist) 설정
//! - 내보내기/로그 경로
//! - 로깅 인프라

pub mod domain;
pub mod error;
pub mod logging;
pub mod paths;
pub mod watchlist;

pub use domain::*;
pub use error::*;
pub use logging::*;
pub use paths::*;
pub use watchlist::*;
