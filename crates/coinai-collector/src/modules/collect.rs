//! 항목별 시세 수집 모듈.
//!
//! 항목마다 `fetch → normalize`를 독립적으로 수행합니다. 한 항목의
//! 실패는 로그만 남기고 배치에서 제외되며 나머지 항목 수집은 계속됩니다.

use std::fmt;
use std::time::Instant;

use chrono::{Local, NaiveDateTime, SubsecRound};
use coinai_core::{
    normalize, ExchangeRateRecord, FromSeries, NormalizationError, QuoteRecord, RecordKind,
    WatchItem, Watchlist,
};
use coinai_data::{PriceSource, ProviderError};

use crate::CollectionStats;

/// 항목 하나의 수집 실패 원인.
#[derive(Debug)]
enum ItemError {
    Provider(ProviderError),
    Normalization(NormalizationError),
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(e) => write!(f, "{}", e),
            Self::Normalization(e) => write!(f, "{}", e),
        }
    }
}

async fn collect_item<R: FromSeries>(
    source: &dyn PriceSource,
    item: &WatchItem,
) -> Result<R, ItemError> {
    let series = source.fetch(&item.id).await.map_err(ItemError::Provider)?;
    normalize(item, &series).map_err(ItemError::Normalization)
}

/// 감시 항목을 순서대로 수집하여 레코드 배치와 통계를 반환.
///
/// 출력 순서는 입력 순서를 따르며 실패한 항목만 빠집니다.
pub async fn collect<R: FromSeries>(
    source: &dyn PriceSource,
    items: &[WatchItem],
) -> (Vec<R>, CollectionStats) {
    let start = Instant::now();
    let mut records = Vec::with_capacity(items.len());
    let mut stats = CollectionStats::new();

    tracing::info!(kind = %R::KIND, source = source.name(), items = items.len(), "수집 시작");

    for item in items {
        stats.total += 1;

        match collect_item::<R>(source, item).await {
            Ok(record) => {
                stats.success += 1;
                tracing::info!(
                    kind = %R::KIND,
                    symbol = %item.id,
                    label = %item.label,
                    price = record.value(),
                    percent_change = record.change(),
                    trend = %record.trend(),
                    "수집 성공"
                );
                records.push(record);
            }
            Err(e) => {
                match e {
                    ItemError::Provider(_) => stats.provider_errors += 1,
                    ItemError::Normalization(_) => stats.dropped += 1,
                }
                tracing::error!(
                    kind = %R::KIND,
                    symbol = %item.id,
                    error = %e,
                    "수집 실패, 항목 제외"
                );
            }
        }
    }

    stats.elapsed = start.elapsed();
    (records, stats)
}

/// 한 수집 주기의 결과. sink에 전달된 뒤에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleBatch {
    /// 주식/ETF 레코드
    pub stocks: Vec<QuoteRecord>,
    /// 환율 레코드
    pub currencies: Vec<ExchangeRateRecord>,
    /// 주기 시작 시각 (파일명에 사용)
    pub started_at: NaiveDateTime,
}

impl CycleBatch {
    /// 두 배치 모두 비어 있는지
    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty() && self.currencies.is_empty()
    }
}

/// 주식 소스와 환율 소스를 묶은 수집 파이프라인.
pub struct Pipeline {
    stock_source: Box<dyn PriceSource>,
    rate_source: Box<dyn PriceSource>,
    watchlist: Watchlist,
}

impl Pipeline {
    /// 파이프라인 생성
    pub fn new(
        stock_source: Box<dyn PriceSource>,
        rate_source: Box<dyn PriceSource>,
        watchlist: Watchlist,
    ) -> Self {
        Self {
            stock_source,
            rate_source,
            watchlist,
        }
    }

    /// 주식과 환율을 차례로 수집.
    pub async fn collect_cycle(&self) -> CycleBatch {
        let started_at = Local::now().naive_local().trunc_subsecs(0);

        let (stocks, stock_stats) =
            collect::<QuoteRecord>(self.stock_source.as_ref(), self.watchlist.stocks()).await;
        stock_stats.log_summary(RecordKind::Stock.tag());

        let (currencies, rate_stats) =
            collect::<ExchangeRateRecord>(self.rate_source.as_ref(), self.watchlist.currencies())
                .await;
        rate_stats.log_summary(RecordKind::Currency.tag());

        CycleBatch {
            stocks,
            currencies,
            started_at,
        }
    }
}
