//! 시세 레코드 타입.
//!
//! 한 수집 주기에서 항목당 최대 한 개의 레코드가 생성되며,
//! 생성 이후에는 변경되지 않습니다.

use chrono::{NaiveDateTime, ParseResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 캡처 시각 텍스트 형식 (로컬 시각, 초 단위).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 캡처 시각을 정렬 가능한 텍스트로 변환.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// `TIMESTAMP_FORMAT` 텍스트를 캡처 시각으로 파싱.
pub fn parse_timestamp(s: &str) -> ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
}

/// 심볼의 Yahoo Finance 조회 링크.
pub fn reference_url(symbol: &str) -> String {
    format!("https://finance.yahoo.com/quote/{}", symbol)
}

/// 가격 추세.
///
/// 변동률이 0보다 클 때만 `Up`이며, 정확히 0이면 `Down`입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// 반올림하지 않은 변동률로부터 추세 결정.
    pub fn from_change(percent_change: f64) -> Self {
        if percent_change > 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }

    /// 저장/리포트에 쓰이는 리터럴 텍스트.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Up" => Ok(Self::Up),
            "Down" => Ok(Self::Down),
            _ => Err(format!("Unknown trend: {}", s)),
        }
    }
}

/// 배치 종류.
///
/// 스냅샷 파일명과 테이블명에 쓰이는 태그를 결정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// 주식/ETF
    Stock,
    /// 통화
    Currency,
}

impl RecordKind {
    /// 배치 종류 태그 (테이블명과 동일).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Stock => "acoes",
            Self::Currency => "moedas",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 주식/ETF 시세 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// 발행사/표시 이름
    pub label: String,
    /// 제공자 티커 (예: "PETR4.SA", "AAPL")
    pub symbol: String,
    /// 현재 종가
    pub price: f64,
    /// 직전 종가 대비 변동률 (%)
    pub percent_change: f64,
    /// 추세
    pub trend: Trend,
    /// 캡처 시각 (로컬, 초 단위)
    pub captured_at: NaiveDateTime,
    /// 조회 링크
    pub reference_url: String,
}

/// 환율 레코드 (기준 통화: BRL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateRecord {
    /// 통화 이름
    pub label: String,
    /// 통화 코드 (예: "USD", "BTC")
    pub code: String,
    /// 매수호가(bid)
    pub rate: f64,
    /// 매도호가(ask) 대비 변동률 (%)
    pub percent_change: f64,
    /// 추세
    pub trend: Trend,
    /// 캡처 시각 (로컬, 초 단위)
    pub captured_at: NaiveDateTime,
}
