//! Parquet 스냅샷 저장소.
//!
//! 수집 주기마다 배치 종류별로 새 파일을 하나씩 생성합니다.
//! 기존 스냅샷에 추가하거나 병합하지 않습니다.
//!
//! 파일은 `.tmp`로 먼저 기록한 뒤 최종 이름으로 rename 하므로
//! 실패 시 불완전한 스냅샷이 남지 않습니다.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use coinai_core::{
    format_timestamp, parse_timestamp, ExchangeRateRecord, FromSeries, QuoteRecord, Trend,
};
use polars::prelude::*;
use tracing::info;

use super::unique_path;
use crate::error::{DataError, Result};

/// Parquet 스냅샷으로 저장 가능한 레코드.
pub trait SnapshotRecord: FromSeries {
    /// 배치를 DataFrame으로 변환.
    fn to_dataframe(batch: &[Self]) -> Result<DataFrame>;

    /// DataFrame을 레코드로 복원.
    fn from_dataframe(df: &DataFrame) -> Result<Vec<Self>>;
}

fn str_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    Ok(df.column(name)?.str()?)
}

fn f64_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Float64Chunked> {
    Ok(df.column(name)?.f64()?)
}

fn null_at(name: &str, row: usize) -> DataError {
    DataError::InvalidData(format!("null '{}' at row {}", name, row))
}

fn read_str(ca: &StringChunked, name: &str, row: usize) -> Result<String> {
    ca.get(row).map(str::to_string).ok_or_else(|| null_at(name, row))
}

fn read_f64(ca: &Float64Chunked, name: &str, row: usize) -> Result<f64> {
    ca.get(row).ok_or_else(|| null_at(name, row))
}

fn read_trend(ca: &StringChunked, row: usize) -> Result<Trend> {
    read_str(ca, "trend", row)?
        .parse()
        .map_err(DataError::InvalidData)
}

fn read_timestamp(ca: &StringChunked, row: usize) -> Result<chrono::NaiveDateTime> {
    let text = read_str(ca, "captured_at", row)?;
    parse_timestamp(&text)
        .map_err(|e| DataError::InvalidData(format!("captured_at '{}': {}", text, e)))
}

impl SnapshotRecord for QuoteRecord {
    fn to_dataframe(batch: &[Self]) -> Result<DataFrame> {
        let df = df!(
            "label" => batch.iter().map(|r| r.label.as_str()).collect::<Vec<_>>(),
            "symbol" => batch.iter().map(|r| r.symbol.as_str()).collect::<Vec<_>>(),
            "price" => batch.iter().map(|r| r.price).collect::<Vec<_>>(),
            "percent_change" => batch.iter().map(|r| r.percent_change).collect::<Vec<_>>(),
            "captured_at" => batch.iter().map(|r| format_timestamp(&r.captured_at)).collect::<Vec<_>>(),
            "trend" => batch.iter().map(|r| r.trend.as_str()).collect::<Vec<_>>(),
            "reference_url" => batch.iter().map(|r| r.reference_url.as_str()).collect::<Vec<_>>(),
        )?;
        Ok(df)
    }

    fn from_dataframe(df: &DataFrame) -> Result<Vec<Self>> {
        let labels = str_column(df, "label")?;
        let symbols = str_column(df, "symbol")?;
        let prices = f64_column(df, "price")?;
        let changes = f64_column(df, "percent_change")?;
        let captured = str_column(df, "captured_at")?;
        let trends = str_column(df, "trend")?;
        let urls = str_column(df, "reference_url")?;

        (0..df.height())
            .map(|i| {
                Ok(QuoteRecord {
                    label: read_str(labels, "label", i)?,
                    symbol: read_str(symbols, "symbol", i)?,
                    price: read_f64(prices, "price", i)?,
                    percent_change: read_f64(changes, "percent_change", i)?,
                    trend: read_trend(trends, i)?,
                    captured_at: read_timestamp(captured, i)?,
                    reference_url: read_str(urls, "reference_url", i)?,
                })
            })
            .collect()
    }
}

impl SnapshotRecord for ExchangeRateRecord {
    fn to_dataframe(batch: &[Self]) -> Result<DataFrame> {
        let df = df!(
            "label" => batch.iter().map(|r| r.label.as_str()).collect::<Vec<_>>(),
            "code" => batch.iter().map(|r| r.code.as_str()).collect::<Vec<_>>(),
            "rate" => batch.iter().map(|r| r.rate).collect::<Vec<_>>(),
            "percent_change" => batch.iter().map(|r| r.percent_change).collect::<Vec<_>>(),
            "trend" => batch.iter().map(|r| r.trend.as_str()).collect::<Vec<_>>(),
            "captured_at" => batch.iter().map(|r| format_timestamp(&r.captured_at)).collect::<Vec<_>>(),
        )?;
        Ok(df)
    }

    fn from_dataframe(df: &DataFrame) -> Result<Vec<Self>> {
        let labels = str_column(df, "label")?;
        let codes = str_column(df, "code")?;
        let rates = f64_column(df, "rate")?;
        let changes = f64_column(df, "percent_change")?;
        let trends = str_column(df, "trend")?;
        let captured = str_column(df, "captured_at")?;

        (0..df.height())
            .map(|i| {
                Ok(ExchangeRateRecord {
                    label: read_str(labels, "label", i)?,
                    code: read_str(codes, "code", i)?,
                    rate: read_f64(rates, "rate", i)?,
                    percent_change: read_f64(changes, "percent_change", i)?,
                    trend: read_trend(trends, i)?,
                    captured_at: read_timestamp(captured, i)?,
                })
            })
            .collect()
    }
}

/// Parquet 스냅샷 저장소.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    /// 내보내기 디렉토리를 지정하여 생성.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 배치를 Snappy 압축 Parquet 파일로 저장하고 경로를 반환.
    ///
    /// 디렉토리가 없으면 생성합니다. 같은 이름의 파일이 있으면
    /// 덮어쓰지 않고 접미사를 붙입니다.
    pub fn write<R: SnapshotRecord>(&self, batch: &[R], file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let mut df = R::to_dataframe(batch)?;
        let path = unique_path(&self.dir, file_name);
        let tmp_path = path.with_extension("parquet.tmp");

        let written = File::create(&tmp_path)
            .map_err(DataError::from)
            .and_then(|file| {
                ParquetWriter::new(file)
                    .with_compression(ParquetCompression::Snappy)
                    .finish(&mut df)
                    .map_err(DataError::from)
            })
            .and_then(|_| fs::rename(&tmp_path, &path).map_err(DataError::from));

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        info!(
            kind = %R::KIND,
            rows = batch.len(),
            path = %path.display(),
            "Parquet 스냅샷 저장"
        );

        Ok(path)
    }

    /// 스냅샷 파일을 레코드로 로드.
    pub fn read<R: SnapshotRecord>(path: impl AsRef<Path>) -> Result<Vec<R>> {
        let file = File::open(path.as_ref())?;
        let df = ParquetReader::new(file).finish()?;
        R::from_dataframe(&df)
    }
}
