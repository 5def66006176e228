//! 가격 시계열 Provider 모듈.
//!
//! 수집기는 항목(심볼 또는 통화 코드) 하나당 `fetch`를 한 번 호출합니다.
//!
//! ## Yahoo Finance
//! - `YahooQuoteSource`: 주식/ETF 최근 일봉 종가
//!
//! ## AwesomeAPI
//! - `AwesomeApiRateSource`: BRL 대비 통화 bid/ask

pub mod awesome;
pub mod yahoo;

use async_trait::async_trait;
use coinai_core::PriceSeries;

use crate::error::ProviderError;

pub use awesome::AwesomeApiRateSource;
pub use yahoo::YahooQuoteSource;

/// 항목 하나의 가격 시계열을 조회하는 외부 데이터 소스.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// 소스 이름 (로그용).
    fn name(&self) -> &str;

    /// 심볼 또는 통화 코드의 가격 시계열 조회 (오래된 관측치부터).
    async fn fetch(&self, id: &str) -> Result<PriceSeries, ProviderError>;
}
