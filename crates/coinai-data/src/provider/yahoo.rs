//! Yahoo Finance 주식/ETF 시세 제공자.
//!
//! 최근 거래일의 일봉 종가를 조회합니다. 장중에는 마지막 일봉이
//! 당일 진행 중인 봉이므로 현재가로 사용됩니다.
//!
//! # 심볼 형식
//!
//! 모든 심볼은 Yahoo Finance 형식으로 전달되어야 합니다:
//! - 브라질 주식: "PETR4.SA"
//! - 미국 주식: "AAPL", "GOOGL"
//! - ETF: "SPY", "QQQ"

use async_trait::async_trait;
use coinai_core::PriceSeries;
use tracing::debug;
use yahoo_finance_api as yahoo;

use super::PriceSource;
use crate::error::ProviderError;

/// 일봉 간격.
const DAILY_INTERVAL: &str = "1d";

/// 조회 기간. 휴장일을 감안해 최근 2거래일이 포함되도록 5일을 조회합니다.
const LOOKBACK_RANGE: &str = "5d";

/// Yahoo Finance 시세 제공자.
pub struct YahooQuoteSource {
    connector: yahoo::YahooConnector,
}

impl YahooQuoteSource {
    /// 새로운 Yahoo Finance 제공자 생성.
    pub fn new() -> Result<Self, ProviderError> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| ProviderError::Network(format!("Yahoo Finance 연결 실패: {}", e)))?;

        Ok(Self { connector })
    }
}

/// 종가 목록을 시계열로 변환.
///
/// 값이 비어 있는 봉(NaN)은 건너뜁니다.
pub(crate) fn series_from_closes(closes: impl IntoIterator<Item = f64>) -> PriceSeries {
    PriceSeries::new(closes.into_iter().filter(|c| !c.is_nan()).collect())
}

#[async_trait]
impl PriceSource for YahooQuoteSource {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch(&self, symbol: &str) -> Result<PriceSeries, ProviderError> {
        let response = self
            .connector
            .get_quote_range(symbol, DAILY_INTERVAL, LOOKBACK_RANGE)
            .await
            .map_err(|e| ProviderError::Api(format!("Yahoo Finance API 오류 ({}): {}", symbol, e)))?;

        let quotes = response
            .quotes()
            .map_err(|e| ProviderError::Parse(format!("Quote 파싱 오류: {}", e)))?;

        debug!(symbol, quotes = quotes.len(), "Yahoo Finance 일봉 수신");

        Ok(series_from_closes(quotes.iter().map(|q| q.close)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_from_closes_skips_missing() {
        let series = series_from_closes(vec![10.0, f64::NAN, 11.0, 12.5]);
        assert_eq!(series.observations(), &[10.0, 11.0, 12.5]);
        assert_eq!(series.last_two(), Some((11.0, 12.5)));
    }

    #[test]
    fn test_series_from_closes_keeps_zero() {
        // 0은 정규화 단계에서 걸러진다
        let series = series_from_closes(vec![0.0, 5.0]);
        assert_eq!(series.last_two(), Some((0.0, 5.0)));
    }
}
