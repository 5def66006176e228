//! 저장소 모듈.
//!
//! 수집 배치를 소비하는 세 가지 sink를 제공합니다:
//! - `snapshot`: 배치별 Parquet 파일 (추가/병합 없음)
//! - `mysql`: 스키마 보장 후 행 단위 삽입
//! - `report`: 두 시트로 구성된 XLSX 리포트

pub mod mysql;
pub mod report;
pub mod snapshot;

use chrono::NaiveDateTime;
use coinai_core::RecordKind;
use std::path::{Path, PathBuf};

/// 파일명에 들어가는 시각 형식.
pub const FILE_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// 스냅샷 파일명 (예: `dados_acoes_2024-03-07_09-05-01.parquet`).
pub fn snapshot_file_name(kind: RecordKind, at: &NaiveDateTime) -> String {
    format!("dados_{}_{}.parquet", kind.tag(), at.format(FILE_STAMP_FORMAT))
}

/// 리포트 파일명 (예: `dados_bolsa_2024-03-07_09-05-01.xlsx`).
pub fn report_file_name(at: &NaiveDateTime) -> String {
    format!("dados_bolsa_{}.xlsx", at.format(FILE_STAMP_FORMAT))
}

/// 같은 이름의 파일이 이미 있으면 `-1`, `-2`... 접미사를 붙인 경로.
pub(crate) fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{}", ext)),
        None => (file_name, String::new()),
    };

    (1..)
        .map(|n| dir.join(format!("{}-{}{}", stem, n, ext)))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}
