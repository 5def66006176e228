//! AwesomeAPI 환율 제공자.
//!
//! `GET {base}/json/last/{CODE}-BRL` 응답의 bid/ask를 사용합니다.
//! 시계열은 `[ask, bid]` 순서로 구성되어 정규화 시 ask가 이전 값,
//! bid가 현재 값이 됩니다.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use coinai_core::PriceSeries;
use serde::Deserialize;
use tracing::debug;

use super::PriceSource;
use crate::error::ProviderError;

/// 기본 API 주소.
pub const DEFAULT_BASE_URL: &str = "https://economia.awesomeapi.com.br";

/// 기준 통화.
pub const REFERENCE_CURRENCY: &str = "BRL";

/// `/json/last` 응답의 통화쌍 항목.
///
/// 숫자 필드는 문자열로 전달됩니다.
#[derive(Debug, Deserialize)]
struct AwesomeQuote {
    bid: String,
    ask: String,
}

/// AwesomeAPI 환율 제공자.
pub struct AwesomeApiRateSource {
    client: reqwest::Client,
    base_url: String,
}

impl AwesomeApiRateSource {
    /// 기본 주소로 생성.
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// 주소를 지정하여 생성.
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn quote_url(&self, code: &str) -> String {
        format!("{}/json/last/{}-{}", self.base_url, code, REFERENCE_CURRENCY)
    }
}

fn parse_price(field: &str, value: &str) -> Result<f64, ProviderError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| ProviderError::Parse(format!("{} 값 '{}' 파싱 실패: {}", field, value, e)))
}

/// 응답 본문에서 `{CODE}BRL` 항목을 찾아 `[ask, bid]` 시계열로 변환.
fn parse_body(code: &str, mut body: HashMap<String, AwesomeQuote>) -> Result<PriceSeries, ProviderError> {
    let key = format!("{}{}", code, REFERENCE_CURRENCY);
    let quote = body
        .remove(&key)
        .ok_or_else(|| ProviderError::NotFound(key.clone()))?;

    let bid = parse_price("bid", &quote.bid)?;
    let ask = parse_price("ask", &quote.ask)?;

    Ok(PriceSeries::from_pair(ask, bid))
}

#[async_trait]
impl PriceSource for AwesomeApiRateSource {
    fn name(&self) -> &str {
        "awesomeapi"
    }

    async fn fetch(&self, code: &str) -> Result<PriceSeries, ProviderError> {
        let url = self.quote_url(code);
        debug!(code, url = %url, "AwesomeAPI 환율 조회");

        let body: HashMap<String, AwesomeQuote> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_body(code, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(bid: &str, ask: &str) -> AwesomeQuote {
        AwesomeQuote {
            bid: bid.to_string(),
            ask: ask.to_string(),
        }
    }

    #[test]
    fn test_parse_body_orders_ask_then_bid() {
        let body = HashMap::from([("USDBRL".to_string(), quote("5.00", "5.10"))]);
        let series = parse_body("USD", body).unwrap();
        assert_eq!(series.last_two(), Some((5.10, 5.00)));
    }

    #[test]
    fn test_parse_body_missing_pair() {
        let body = HashMap::from([("EURBRL".to_string(), quote("6.0", "6.1"))]);
        let err = parse_body("USD", body).unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(ref k) if k == "USDBRL"));
    }

    #[test]
    fn test_parse_body_bad_number() {
        let body = HashMap::from([("USDBRL".to_string(), quote("abc", "5.10"))]);
        let err = parse_body("USD", body).unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn test_quote_url_trims_trailing_slash() {
        let source =
            AwesomeApiRateSource::with_base_url("http://localhost:1234/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(source.quote_url("BTC"), "http://localhost:1234/json/last/BTC-BRL");
    }
}
