//! 실행 스케줄러.
//!
//! 상태 전이: `Idle → Configuring → Running → Draining → Idle`
//!
//! - 데이터베이스 모드: 마감 시각 전까지 `수집 → sink 전달 → 대기`를 반복
//! - 파일 전용 모드: 1회 수집 후 sink 전달
//!
//! 마감 시각은 새 주기를 시작하기 전에만 확인하며, 주기 도중에는
//! 중단하지 않습니다. 마지막 주기 뒤의 대기도 생략하지 않습니다.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::Instant;

use super::collect::{CycleBatch, Pipeline};
use super::sinks::{build_sinks, fan_out, BatchSink};
use crate::config::{RunConfig, RunMode};
use crate::Result;

/// 스케줄러 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// 대기
    Idle,
    /// 실행 모드와 sink 구성 중
    Configuring,
    /// 수집 주기 반복 중
    Running,
    /// sink 자원 해제 중
    Draining,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Configuring => "configuring",
            Self::Running => "running",
            Self::Draining => "draining",
        };
        write!(f, "{}", s)
    }
}

/// 실행 결과 요약
#[derive(Debug, Default)]
pub struct RunSummary {
    /// 수행한 주기 수
    pub cycles: usize,
    /// 실패한 sink 쓰기 수
    pub sink_failures: usize,
    /// 생성된 파일 (생성 순서)
    pub files: Vec<PathBuf>,
    /// 마지막 주기의 배치
    pub last_batch: Option<CycleBatch>,
}

/// 수집 주기를 구동하는 스케줄러.
pub struct Scheduler {
    pipeline: Pipeline,
    sinks: Vec<Box<dyn BatchSink>>,
    state: RunState,
}

impl Scheduler {
    /// 새 스케줄러 생성 (`Idle`)
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            sinks: Vec::new(),
            state: RunState::Idle,
        }
    }

    /// 현재 상태
    pub fn state(&self) -> RunState {
        self.state
    }

    /// 활성 sink 수
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!(from = %self.state, to = %next, "스케줄러 상태 전이");
        self.state = next;
    }

    /// 실행 설정에 맞게 sink를 구성.
    ///
    /// 데이터베이스 스키마 단계 실패 시 `Idle`로 돌아가고 에러를 반환합니다.
    pub async fn configure(&mut self, run: &RunConfig, export_dir: &Path) -> Result<()> {
        self.transition(RunState::Configuring);

        match build_sinks(run, export_dir).await {
            Ok(sinks) => {
                tracing::info!(mode = ?run.mode(), sinks = sinks.len(), "실행 구성 완료");
                self.sinks = sinks;
                Ok(())
            }
            Err(e) => {
                tracing::error!(mode = ?run.mode(), error = %e, "실행 구성 실패");
                self.transition(RunState::Idle);
                Err(e)
            }
        }
    }

    /// 이미 만들어진 sink로 구성.
    pub fn configure_with(&mut self, sinks: Vec<Box<dyn BatchSink>>) {
        self.transition(RunState::Configuring);
        self.sinks = sinks;
    }

    /// 구성된 모드로 실행.
    pub async fn run(&mut self, run: &RunConfig) -> RunSummary {
        match run.mode() {
            RunMode::FileOnly => self.run_once().await,
            RunMode::Database => self.run_scheduled(run.duration(), run.interval()).await,
        }
    }

    /// 1회 수집 후 sink 전달 (파일 전용 모드).
    pub async fn run_once(&mut self) -> RunSummary {
        self.transition(RunState::Running);
        let mut summary = RunSummary::default();

        self.run_cycle(&mut summary).await;

        self.drain().await;
        summary
    }

    /// 마감 시각까지 주기 실행 (데이터베이스 모드).
    ///
    /// `duration`이 0이면 주기를 수행하지 않고 곧바로 자원을 해제합니다.
    /// 현재 시각에 더할 수 없을 만큼 긴 `duration`은 마감 없음으로 취급합니다.
    pub async fn run_scheduled(&mut self, duration: Duration, interval: Duration) -> RunSummary {
        self.transition(RunState::Running);
        let mut summary = RunSummary::default();

        let deadline = Instant::now().checked_add(duration);
        tracing::info!(
            duration_secs = duration.as_secs(),
            interval_secs = interval.as_secs(),
            "=== 주기 수집 시작 ==="
        );

        while deadline.map_or(true, |d| Instant::now() < d) {
            self.run_cycle(&mut summary).await;

            tracing::info!(
                cycle = summary.cycles,
                "=== 다음 수집: {}초 후 ===",
                interval.as_secs()
            );
            tokio::time::sleep(interval).await;
        }

        tracing::info!(cycles = summary.cycles, "=== 주기 수집 종료 ===");
        self.drain().await;
        summary
    }

    async fn run_cycle(&mut self, summary: &mut RunSummary) {
        summary.cycles += 1;
        tracing::info!(cycle = summary.cycles, "수집 주기 시작");

        let batch = self.pipeline.collect_cycle().await;
        if batch.is_empty() {
            tracing::warn!(cycle = summary.cycles, "수집된 레코드가 없습니다");
        }

        for outcome in fan_out(&mut self.sinks, &batch).await {
            if !outcome.is_success() {
                summary.sink_failures += 1;
            }
            summary.files.extend(outcome.files);
        }

        summary.last_batch = Some(batch);
    }

    /// 모든 sink 자원을 해제하고 `Idle`로 복귀.
    async fn drain(&mut self) {
        self.transition(RunState::Draining);

        for mut sink in self.sinks.drain(..) {
            sink.close().await;
            tracing::debug!(sink = sink.name(), "sink 종료");
        }

        self.transition(RunState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::testing::{CountingSink, FakeSource};
    use coinai_core::{WatchItem, Watchlist};

    fn pipeline() -> Pipeline {
        let stocks = FakeSource::new(&[("AAPL", Ok(vec![190.0, 200.0]))]);
        let rates = FakeSource::new(&[("USD", Ok(vec![5.10, 5.00]))]);
        let watchlist = Watchlist::new(
            vec![WatchItem::new("AAPL", "Apple")],
            vec![WatchItem::new("USD", "Dólar")],
        );
        Pipeline::new(Box::new(stocks), Box::new(rates), watchlist)
    }

    fn scheduler_with(sinks: &[CountingSink]) -> Scheduler {
        let mut scheduler = Scheduler::new(pipeline());
        scheduler.configure_with(
            sinks
                .iter()
                .map(|s| Box::new(s.clone()) as Box<dyn BatchSink>)
                .collect(),
        );
        scheduler
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_runs_no_cycle_and_closes() {
        let sink = CountingSink::default();
        let mut scheduler = scheduler_with(&[sink.clone()]);

        let summary = scheduler
            .run_scheduled(Duration::ZERO, Duration::from_secs(300))
            .await;

        assert!(summary.cycles <= 1);
        assert_eq!(sink.closes(), 1);
        assert_eq!(scheduler.state(), RunState::Idle);
        assert_eq!(scheduler.sink_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_deadline_keeps_running() {
        let sink = CountingSink::default();
        let mut scheduler = scheduler_with(&[sink.clone()]);

        let run = scheduler.run_scheduled(Duration::from_secs(u64::MAX / 2), Duration::from_secs(30));
        let finished = tokio::time::timeout(Duration::from_secs(100), run).await;

        // t=0, 30, 60, 90 에서 실행된 뒤 시간 초과
        assert!(finished.is_err());
        assert_eq!(sink.writes(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycles_until_deadline() {
        let sink = CountingSink::default();
        let mut scheduler = scheduler_with(&[sink.clone()]);

        // t=0, t=30 에서 실행, t=60 은 마감 시각과 같으므로 종료
        let summary = scheduler
            .run_scheduled(Duration::from_secs(60), Duration::from_secs(30))
            .await;

        assert_eq!(summary.cycles, 2);
        assert_eq!(sink.writes(), 2);
        assert_eq!(sink.closes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_sleep_is_not_skipped() {
        let mut scheduler = scheduler_with(&[CountingSink::default()]);
        let start = Instant::now();

        scheduler
            .run_scheduled(Duration::from_secs(10), Duration::from_secs(30))
            .await;

        assert!(start.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_sink_keeps_loop_running() {
        let failing = CountingSink::failing();
        let healthy = CountingSink::default();
        let mut scheduler = scheduler_with(&[failing.clone(), healthy.clone()]);

        let summary = scheduler
            .run_scheduled(Duration::from_secs(90), Duration::from_secs(30))
            .await;

        assert_eq!(summary.cycles, 3);
        assert_eq!(summary.sink_failures, 3);
        assert_eq!(healthy.writes(), 3);
        assert_eq!(failing.closes(), 1);
        assert_eq!(healthy.closes(), 1);
    }

    #[tokio::test]
    async fn test_run_once_keeps_last_batch() {
        let sink = CountingSink::default();
        let mut scheduler = scheduler_with(&[sink.clone()]);

        let summary = scheduler.run_once().await;

        assert_eq!(summary.cycles, 1);
        assert_eq!(sink.closes(), 1);
        let batch = summary.last_batch.unwrap();
        assert_eq!(batch.stocks.len(), 1);
        assert_eq!(batch.currencies.len(), 1);
    }
}
