//! 가격 시계열.

/// 제공자가 반환한 가격 관측치 (오래된 것부터).
///
/// 정규화에는 마지막 두 관측치만 사용됩니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    observations: Vec<f64>,
}

impl PriceSeries {
    /// 관측치 목록으로 생성.
    pub fn new(observations: Vec<f64>) -> Self {
        Self { observations }
    }

    /// 이전/현재 두 관측치로 생성.
    pub fn from_pair(previous: f64, current: f64) -> Self {
        Self {
            observations: vec![previous, current],
        }
    }

    /// 관측치 수.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// 전체 관측치.
    pub fn observations(&self) -> &[f64] {
        &self.observations
    }

    /// 마지막 두 관측치 `(previous, current)`.
    pub fn last_two(&self) -> Option<(f64, f64)> {
        match self.observations.as_slice() {
            [.., previous, current] => Some((*previous, *current)),
            _ => None,
        }
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(observations: Vec<f64>) -> Self {
        Self::new(observations)
    }
}
