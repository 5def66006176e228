//! 가격 시계열 정규화.
//!
//! 두 점 시계열과 메타데이터(이름, 심볼)로부터 레코드 하나를 만들거나,
//! 해당 항목을 건너뛰어야 하는 이유를 반환합니다.
//!
//! 변동률은 반올림하지 않은 `f64` 그대로 유지되며 추세 판정에도
//! 반올림 전 값이 사용됩니다. 반올림은 표시 단계의 관심사입니다.

use chrono::{Local, NaiveDateTime, SubsecRound};

use super::record::{reference_url, ExchangeRateRecord, QuoteRecord, RecordKind, Trend};
use super::series::PriceSeries;
use crate::error::NormalizationError;
use crate::watchlist::WatchItem;

/// `(current - previous) / previous * 100`.
pub fn percent_change(previous: f64, current: f64) -> Result<f64, NormalizationError> {
    if previous == 0.0 {
        return Err(NormalizationError::ZeroPrevious);
    }
    Ok((current - previous) / previous * 100.0)
}

/// 가격 시계열에서 만들어지는 레코드.
pub trait FromSeries: Sized {
    /// 배치 종류
    const KIND: RecordKind;

    /// 시계열과 캡처 시각으로 레코드 생성.
    fn from_series(
        item: &WatchItem,
        series: &PriceSeries,
        captured_at: NaiveDateTime,
    ) -> Result<Self, NormalizationError>;

    /// 현재 값 (주가 또는 환율)
    fn value(&self) -> f64;

    /// 직전 관측치 대비 변동률 (%)
    fn change(&self) -> f64;

    /// 추세
    fn trend(&self) -> Trend;
}

/// 마지막 두 관측치를 검증하고 `(current, percent_change, trend)`를 계산.
fn derive(series: &PriceSeries) -> Result<(f64, f64, Trend), NormalizationError> {
    let (previous, current) =
        series
            .last_two()
            .ok_or(NormalizationError::InsufficientHistory {
                observations: series.len(),
            })?;

    let change = percent_change(previous, current)?;

    if !current.is_finite() || current <= 0.0 {
        return Err(NormalizationError::InvalidPrice(current));
    }
    if !change.is_finite() {
        return Err(NormalizationError::InvalidPrice(previous));
    }

    Ok((current, change, Trend::from_change(change)))
}

impl FromSeries for QuoteRecord {
    const KIND: RecordKind = RecordKind::Stock;

    fn from_series(
        item: &WatchItem,
        series: &PriceSeries,
        captured_at: NaiveDateTime,
    ) -> Result<Self, NormalizationError> {
        let (price, percent_change, trend) = derive(series)?;
        Ok(Self {
            label: item.label.clone(),
            symbol: item.id.clone(),
            price,
            percent_change,
            trend,
            captured_at,
            reference_url: reference_url(&item.id),
        })
    }

    fn value(&self) -> f64 {
        self.price
    }

    fn change(&self) -> f64 {
        self.percent_change
    }

    fn trend(&self) -> Trend {
        self.trend
    }
}

impl FromSeries for ExchangeRateRecord {
    const KIND: RecordKind = RecordKind::Currency;

    fn from_series(
        item: &WatchItem,
        series: &PriceSeries,
        captured_at: NaiveDateTime,
    ) -> Result<Self, NormalizationError> {
        let (rate, percent_change, trend) = derive(series)?;
        Ok(Self {
            label: item.label.clone(),
            code: item.id.clone(),
            rate,
            percent_change,
            trend,
            captured_at,
        })
    }

    fn value(&self) -> f64 {
        self.rate
    }

    fn change(&self) -> f64 {
        self.percent_change
    }

    fn trend(&self) -> Trend {
        self.trend
    }
}

/// 현재 로컬 시각(초 단위)으로 레코드 정규화.
///
/// 캡처 시각은 항목마다 정규화 시점에 한 번 기록됩니다.
pub fn normalize<R: FromSeries>(
    item: &WatchItem,
    series: &PriceSeries,
) -> Result<R, NormalizationError> {
    let captured_at = Local::now().naive_local().trunc_subsecs(0);
    R::from_series(item, series, captured_at)
}
