//! 테스트용 가짜 소스와 sink.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use coinai_core::PriceSeries;
use coinai_data::{PriceSource, ProviderError};

use super::collect::CycleBatch;
use super::sinks::{BatchSink, SinkOutcome};

/// 항목별 응답을 미리 정해둔 소스. 등록되지 않은 항목은 `NotFound`.
pub struct FakeSource {
    responses: HashMap<String, Result<Vec<f64>, String>>,
}

impl FakeSource {
    pub fn new(entries: &[(&str, Result<Vec<f64>, &str>)]) -> Self {
        Self {
            responses: entries
                .iter()
                .map(|(id, r)| (id.to_string(), r.clone().map_err(str::to_string)))
                .collect(),
        }
    }
}

#[async_trait]
impl PriceSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch(&self, id: &str) -> Result<PriceSeries, ProviderError> {
        match self.responses.get(id) {
            Some(Ok(values)) => Ok(PriceSeries::new(values.clone())),
            Some(Err(msg)) => Err(ProviderError::Network(msg.clone())),
            None => Err(ProviderError::NotFound(id.to_string())),
        }
    }
}

/// 호출 횟수를 세는 sink.
#[derive(Clone, Default)]
pub struct CountingSink {
    pub writes: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
    pub fail: bool,
}

impl CountingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BatchSink for CountingSink {
    fn name(&self) -> &str {
        "counting"
    }

    async fn write(&mut self, _batch: &CycleBatch) -> SinkOutcome {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            SinkOutcome {
                failures: vec!["simulated failure".to_string()],
                ..Default::default()
            }
        } else {
            SinkOutcome::default()
        }
    }

    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
