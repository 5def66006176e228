//! 수집 파이프라인 모듈.

pub mod collect;
pub mod opener;
pub mod scheduler;
pub mod sinks;

#[cfg(test)]
pub(crate) mod testing;

pub use collect::{collect, CycleBatch, Pipeline};
pub use opener::{open_report, ReportOpener, SystemOpener};
pub use scheduler::{RunState, RunSummary, Scheduler};
pub use sinks::{build_sinks, fan_out, BatchSink, MysqlSink, ReportSink, SinkOutcome, SnapshotSink};
