//! 배치 sink 모듈.
//!
//! 한 주기의 배치를 활성화된 모든 sink에 차례로 전달합니다.
//! 각 sink는 자신의 실패를 경계에서 처리하고 결과(`SinkOutcome`)로
//! 보고하므로, 한 sink의 실패가 다른 sink나 스케줄러를 멈추지 않습니다.

use std::path::PathBuf;

use async_trait::async_trait;
use coinai_core::RecordKind;
use coinai_data::{
    report_file_name, snapshot_file_name, MysqlSettings, MysqlStore, ReportWriter, SnapshotWriter,
};

use super::collect::CycleBatch;
use crate::config::{RunConfig, RunMode};
use crate::Result;

/// sink 한 번의 쓰기 결과.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SinkOutcome {
    /// 생성된 파일
    pub files: Vec<PathBuf>,
    /// 삽입된 행 수
    pub rows: usize,
    /// 실패 메시지
    pub failures: Vec<String>,
}

impl SinkOutcome {
    /// 실패가 없었는지
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            failures: vec![message.into()],
            ..Default::default()
        }
    }
}

/// 수집 배치를 소비하는 저장 대상.
#[async_trait]
pub trait BatchSink: Send {
    /// sink 이름 (로그용)
    fn name(&self) -> &str;

    /// 한 주기의 배치 저장.
    async fn write(&mut self, batch: &CycleBatch) -> SinkOutcome;

    /// 보유 자원 해제. 실행 종료 시 한 번 호출됩니다.
    async fn close(&mut self) {}
}

/// Parquet 스냅샷 sink (주식, 환율 각각 파일 하나).
pub struct SnapshotSink {
    writer: SnapshotWriter,
}

impl SnapshotSink {
    pub fn new(writer: SnapshotWriter) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl BatchSink for SnapshotSink {
    fn name(&self) -> &str {
        "parquet"
    }

    async fn write(&mut self, batch: &CycleBatch) -> SinkOutcome {
        let mut outcome = SinkOutcome::default();

        let results = [
            (
                RecordKind::Stock,
                self.writer.write(
                    &batch.stocks,
                    &snapshot_file_name(RecordKind::Stock, &batch.started_at),
                ),
            ),
            (
                RecordKind::Currency,
                self.writer.write(
                    &batch.currencies,
                    &snapshot_file_name(RecordKind::Currency, &batch.started_at),
                ),
            ),
        ];

        for (kind, result) in results {
            match result {
                Ok(path) => outcome.files.push(path),
                Err(e) => {
                    tracing::error!(sink = "parquet", kind = %kind, error = %e, "스냅샷 저장 실패");
                    outcome.failures.push(format!("{}: {}", kind, e));
                }
            }
        }

        outcome
    }
}

/// MySQL sink. 연결은 실행 기간 동안 유지되고 `close`에서 한 번 해제됩니다.
pub struct MysqlSink {
    store: Option<MysqlStore>,
}

impl MysqlSink {
    /// 스키마 단계를 수행하고 sink 생성.
    pub async fn open(settings: &MysqlSettings) -> Result<Self> {
        let store = MysqlStore::open(settings).await?;
        Ok(Self { store: Some(store) })
    }
}

#[async_trait]
impl BatchSink for MysqlSink {
    fn name(&self) -> &str {
        "mysql"
    }

    async fn write(&mut self, batch: &CycleBatch) -> SinkOutcome {
        let Some(store) = self.store.as_mut() else {
            return SinkOutcome::failed("데이터베이스 연결이 이미 종료됨");
        };

        let result = store.insert_cycle(&batch.stocks, &batch.currencies).await;

        let mut outcome = SinkOutcome::default();
        for (table, inserted) in [("acoes", &result.quotes), ("moedas", &result.rates)] {
            match inserted {
                Ok(n) => outcome.rows += n,
                Err(e) => outcome.failures.push(format!("{}: {}", table, e)),
            }
        }
        if let Err(e) = &result.commit {
            outcome.failures.push(format!("commit: {}", e));
        }
        outcome
    }

    async fn close(&mut self) {
        if let Some(store) = self.store.take() {
            store.close().await;
        }
    }
}

/// XLSX 리포트 sink (주기당 워크북 하나).
pub struct ReportSink {
    writer: ReportWriter,
}

impl ReportSink {
    pub fn new(writer: ReportWriter) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl BatchSink for ReportSink {
    fn name(&self) -> &str {
        "xlsx"
    }

    async fn write(&mut self, batch: &CycleBatch) -> SinkOutcome {
        let file_name = report_file_name(&batch.started_at);
        match self.writer.write(&batch.stocks, &batch.currencies, &file_name) {
            Ok(path) => SinkOutcome {
                files: vec![path],
                ..Default::default()
            },
            Err(e) => {
                tracing::error!(sink = "xlsx", error = %e, "리포트 저장 실패");
                SinkOutcome::failed(e.to_string())
            }
        }
    }
}

/// 실행 모드에 맞는 sink 구성.
///
/// - 파일 전용: XLSX 리포트
/// - 데이터베이스: Parquet 스냅샷(선택) + MySQL
///
/// MySQL 스키마 단계 실패는 `CollectorError::Connection`으로 반환됩니다.
pub async fn build_sinks(
    run: &RunConfig,
    export_dir: impl Into<PathBuf>,
) -> Result<Vec<Box<dyn BatchSink>>> {
    let export_dir = export_dir.into();
    let mut sinks: Vec<Box<dyn BatchSink>> = Vec::new();

    match run.mode() {
        RunMode::FileOnly => {
            sinks.push(Box::new(ReportSink::new(ReportWriter::new(export_dir))));
        }
        RunMode::Database => {
            if run.write_snapshots {
                sinks.push(Box::new(SnapshotSink::new(SnapshotWriter::new(export_dir))));
            }
            sinks.push(Box::new(MysqlSink::open(&run.database).await?));
        }
    }

    Ok(sinks)
}

/// 배치를 모든 sink에 순서대로 전달하고 결과를 모음.
pub async fn fan_out(sinks: &mut [Box<dyn BatchSink>], batch: &CycleBatch) -> Vec<SinkOutcome> {
    let mut outcomes = Vec::with_capacity(sinks.len());

    for sink in sinks.iter_mut() {
        let outcome = sink.write(batch).await;
        if outcome.is_success() {
            tracing::info!(
                sink = sink.name(),
                files = outcome.files.len(),
                rows = outcome.rows,
                "sink 저장 완료"
            );
        } else {
            tracing::warn!(
                sink = sink.name(),
                failures = outcome.failures.len(),
                "sink 저장 일부 실패"
            );
        }
        outcomes.push(outcome);
    }

    outcomes
}
