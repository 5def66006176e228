//! 환경변수 기반 설정 모듈.
//!
//! `.env` 파일과 환경변수에서 `CollectorConfig`를 읽고,
//! CLI 인자와 합쳐 실행 단위 설정인 `RunConfig`를 만듭니다.

use std::path::PathBuf;
use std::time::Duration;

use coinai_core::{default_export_dir, default_log_dir};
use coinai_data::provider::awesome::DEFAULT_BASE_URL;
use coinai_data::MysqlSettings;
use secrecy::SecretString;

use crate::Result;

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// MySQL 접속 설정
    pub database: MysqlSettings,
    /// 실행 시간/주기 기본값
    pub schedule: ScheduleConfig,
    /// 내보내기 디렉토리 (Parquet, XLSX)
    pub export_dir: PathBuf,
    /// 로그 디렉토리
    pub log_dir: PathBuf,
    /// 감시 목록 TOML 경로 (없으면 내장 기본값)
    pub watchlist_path: Option<PathBuf>,
    /// 제공자 설정
    pub provider: ProviderConfig,
}

/// 스케줄 기본값
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// 전체 실행 시간 (분)
    pub duration_minutes: u64,
    /// 수집 주기 (초)
    pub interval_seconds: u64,
}

/// 제공자 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// HTTP 요청 타임아웃 (초)
    pub http_timeout_secs: u64,
    /// AwesomeAPI 주소
    pub awesomeapi_base_url: String,
}

impl ProviderConfig {
    /// HTTP 요청 타임아웃을 Duration으로 반환
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로부터 설정 생성.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = MysqlSettings::default();

        let database = MysqlSettings {
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port: var_parse(&lookup, "DB_PORT", defaults.port)?,
            user: lookup("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD")
                .map(SecretString::from)
                .unwrap_or(defaults.password),
            database: lookup("DB_NAME").unwrap_or(defaults.database),
        };

        Ok(Self {
            database,
            schedule: ScheduleConfig {
                duration_minutes: var_parse(&lookup, "RUN_DURATION_MINUTES", 60)?,
                interval_seconds: var_parse(&lookup, "RUN_INTERVAL_SECONDS", 300)?,
            },
            export_dir: lookup("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_export_dir),
            log_dir: lookup("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_log_dir),
            watchlist_path: lookup("WATCHLIST_PATH").map(PathBuf::from),
            provider: ProviderConfig {
                http_timeout_secs: var_parse(&lookup, "HTTP_TIMEOUT_SECS", 30)?,
                awesomeapi_base_url: lookup("AWESOMEAPI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            },
        })
    }

    /// 로그 파일 경로 (`{log_dir}/app.log`)
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("app.log")
    }
}

/// 실행 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// 1회 수집 후 XLSX 리포트
    FileOnly,
    /// 주기 수집 후 Parquet 스냅샷 + MySQL
    Database,
}

/// 한 번의 실행 설정.
///
/// 대화형 입력 대신 CLI/환경변수 계층에서 만들어 스케줄러에 전달합니다.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// 데이터베이스 사용 여부
    pub use_database: bool,
    /// MySQL 접속 설정
    pub database: MysqlSettings,
    /// 전체 실행 시간 (분)
    pub duration_minutes: u64,
    /// 수집 주기 (초)
    pub interval_seconds: u64,
    /// 데이터베이스 모드에서 Parquet 스냅샷 저장 여부
    pub write_snapshots: bool,
}

impl RunConfig {
    /// 파일 전용 모드 (1회 수집).
    pub fn file_only() -> Self {
        Self {
            use_database: false,
            database: MysqlSettings::default(),
            duration_minutes: 0,
            interval_seconds: 0,
            write_snapshots: false,
        }
    }

    /// 데이터베이스 모드.
    pub fn database(settings: MysqlSettings, schedule: &ScheduleConfig) -> Self {
        Self {
            use_database: true,
            database: settings,
            duration_minutes: schedule.duration_minutes,
            interval_seconds: schedule.interval_seconds,
            write_snapshots: true,
        }
    }

    /// 실행 모드
    pub fn mode(&self) -> RunMode {
        if self.use_database {
            RunMode::Database
        } else {
            RunMode::FileOnly
        }
    }

    /// 전체 실행 시간을 Duration으로 반환 (초 환산 시 포화)
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_minutes.saturating_mul(60))
    }

    /// 수집 주기를 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

/// 값을 파싱 (없으면 기본값, 형식이 틀리면 설정 에러)
fn var_parse<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            crate::error::CollectorError::Config(format!("{} 값이 올바르지 않습니다: '{}'", key, raw))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<CollectorConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CollectorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.user, "root");
        assert_eq!(config.database.password.expose_secret(), "");
        assert_eq!(config.database.database, "CoinAI");
        assert_eq!(config.schedule.duration_minutes, 60);
        assert_eq!(config.schedule.interval_seconds, 300);
        assert_eq!(config.provider.http_timeout(), Duration::from_secs(30));
        assert_eq!(config.provider.awesomeapi_base_url, DEFAULT_BASE_URL);
        assert!(config.watchlist_path.is_none());
        assert!(config.log_file().ends_with("logs/app.log"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "3307"),
            ("DB_PASSWORD", "secret"),
            ("RUN_INTERVAL_SECONDS", "15"),
            ("EXPORT_DIR", "/tmp/exports"),
            ("WATCHLIST_PATH", "watchlist.toml"),
        ])
        .unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.password.expose_secret(), "secret");
        assert_eq!(config.schedule.interval_seconds, 15);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.watchlist_path, Some(PathBuf::from("watchlist.toml")));
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let err = config_from(&[("DB_PORT", "mysql")]).unwrap_err();
        assert!(matches!(err, crate::CollectorError::Config(ref m) if m.contains("DB_PORT")));
    }

    #[test]
    fn test_run_config_modes() {
        let file_only = RunConfig::file_only();
        assert_eq!(file_only.mode(), RunMode::FileOnly);
        assert_eq!(file_only.duration(), Duration::ZERO);

        let schedule = ScheduleConfig {
            duration_minutes: 2,
            interval_seconds: 30,
        };
        let db = RunConfig::database(MysqlSettings::default(), &schedule);
        assert_eq!(db.mode(), RunMode::Database);
        assert_eq!(db.duration(), Duration::from_secs(120));
        assert_eq!(db.interval(), Duration::from_secs(30));
        assert!(db.write_snapshots);
    }

    #[test]
    fn test_huge_duration_saturates() {
        let schedule = ScheduleConfig {
            duration_minutes: u64::MAX / 30,
            interval_seconds: 1,
        };
        let run = RunConfig::database(MysqlSettings::default(), &schedule);
        assert_eq!(run.duration(), Duration::from_secs(u64::MAX));
    }
}
