//! 사용자별 기본 경로.
//!
//! 모든 산출물은 `~/Documents/BolsaValores` 아래에 저장됩니다:
//! - `exports/`: Parquet 스냅샷, XLSX 리포트
//! - `logs/app.log`: 로그 파일

use std::path::PathBuf;

const APP_DIR: &str = "BolsaValores";

/// 기본 디렉토리 (`~/Documents/BolsaValores`).
///
/// 홈 디렉토리를 알 수 없으면 현재 디렉토리 기준 상대 경로를 사용합니다.
pub fn default_base_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join("Documents").join(APP_DIR),
        None => PathBuf::from(APP_DIR),
    }
}

/// 내보내기 디렉토리.
pub fn default_export_dir() -> PathBuf {
    default_base_dir().join("exports")
}

/// 로그 디렉토리.
pub fn default_log_dir() -> PathBuf {
    default_base_dir().join("logs")
}
