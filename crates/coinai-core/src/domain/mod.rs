//! 도메인 모델.
//!
//! - `record`: 시세/환율 레코드와 추세
//! - `series`: 제공자에서 받은 가격 시계열
//! - `normalize`: 시계열 → 레코드 변환

pub mod normalize;
pub mod record;
pub mod series;

pub use normalize::{normalize, percent_change, FromSeries};
pub use record::{
    format_timestamp, parse_timestamp, reference_url, ExchangeRateRecord, QuoteRecord,
    RecordKind, Trend, TIMESTAMP_FORMAT,
};
pub use series::PriceSeries;
