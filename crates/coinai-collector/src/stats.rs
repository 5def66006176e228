//! 수집 통계 구조체.

use serde::Serialize;
use std::time::Duration;

/// 수집 작업 통계
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionStats {
    /// 총 시도 횟수
    pub total: usize,
    /// 레코드 생성 성공 횟수
    pub success: usize,
    /// 조회 실패 (네트워크, HTTP 상태, 응답 형식)
    pub provider_errors: usize,
    /// 정규화 실패로 제외된 항목 (이력 부족, 이전 값 0, 잘못된 가격)
    pub dropped: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            provider_errors = self.provider_errors,
            dropped = self.dropped,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}
