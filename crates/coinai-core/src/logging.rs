//! tracing을 사용한 로깅 인프라.
//!
//! 이 모듈은 다양한 출력 형식을 지원하는 구조화된 로깅을 제공합니다:
//! - **pretty**: 개발용 사람이 읽기 쉬운 형식
//! - **json**: 로그 집계용 JSON 형식
//! - **compact**: 로그 크기를 줄이기 위한 간결한 형식
//!
//! 콘솔 출력과 함께 선택적으로 로그 파일에도 기록합니다. 프로세스 시작 시
//! 한 번 초기화하고, 반환된 [`LogGuard`]를 종료 시점까지 유지해야 합니다.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::error::{CoreError, CoreResult};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 색상이 포함된 사람이 읽기 쉬운 형식 (개발용)
    #[default]
    Pretty,
    /// 로그 집계용 JSON 형식
    Json,
    /// 간결한 한 줄 형식
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 로그 레벨 필터 (예: "info", "debug", "coinai_collector=debug")
    pub level: String,
    /// 콘솔 출력 형식
    pub format: LogFormat,
    /// 파일명과 줄 번호 포함 여부
    pub with_file: bool,
    /// 대상(모듈 경로) 포함 여부
    pub with_target: bool,
    /// 로그 파일 경로 (None이면 콘솔만)
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            with_file: false,
            with_target: true,
            log_file: None,
        }
    }
}

impl LogConfig {
    /// 새 로그 설정을 생성합니다.
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// 로그 레벨 필터를 설정합니다.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// 로그 형식을 설정합니다.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// 로그 파일을 설정합니다.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// 환경 변수에서 설정을 생성합니다.
    ///
    /// `RUST_LOG`(레벨), `LOG_FORMAT`(형식)을 읽습니다. 이후 `with_*`로
    /// 덮어쓴 값이 우선합니다.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로부터 설정 생성.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(level) = lookup("RUST_LOG") {
            config.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT").and_then(|s| s.parse().ok()) {
            config.format = format;
        }
        config
    }
}

/// 로그 파일 핸들 보관자.
///
/// drop 시 파일 버퍼를 디스크로 플러시합니다.
#[derive(Debug, Default)]
pub struct LogGuard {
    file: Option<Arc<File>>,
}

impl LogGuard {
    /// 로그 파일 플러시.
    pub fn flush(&self) {
        if let Some(file) = &self.file {
            let mut handle: &File = file;
            let _ = handle.flush();
            let _ = file.sync_all();
        }
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        self.flush();
    }
}

fn console_layer(config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    match config.format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_file(config.with_file)
            .with_line_number(config.with_file)
            .with_target(config.with_target)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_file(config.with_file)
            .with_line_number(config.with_file)
            .with_target(config.with_target)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_file(config.with_file)
            .with_line_number(config.with_file)
            .with_target(config.with_target)
            .boxed(),
    }
}

fn open_log_file(path: &PathBuf) -> CoreResult<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(file)
}

/// 설정된 레벨 그대로 필터를 만듭니다. 환경 변수는 다시 읽지 않습니다.
fn build_filter(config: &LogConfig) -> CoreResult<EnvFilter> {
    EnvFilter::try_new(&config.level).map_err(|e| CoreError::Logging(e.to_string()))
}

/// 주어진 설정으로 로깅 시스템을 초기화합니다.
///
/// # 예제
///
/// ```no_run
/// use coinai_core::logging::{init_logging, LogConfig, LogFormat};
///
/// let _guard = init_logging(
///     LogConfig::new("debug")
///         .with_format(LogFormat::Json)
///         .with_log_file("/tmp/coinai.log"),
/// )
/// .unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> CoreResult<LogGuard> {
    let env_filter = build_filter(&config)?;

    let mut layers = vec![console_layer(&config)];
    let mut guard = LogGuard::default();

    if let Some(path) = &config.log_file {
        let file = Arc::new(open_log_file(path)?);
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_target(config.with_target)
                .with_writer(Arc::clone(&file))
                .boxed(),
        );
        guard.file = Some(file);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| CoreError::Logging(e.to_string()))?;

    tracing::info!(
        format = ?config.format,
        level = %config.level,
        log_file = ?config.log_file,
        "Logging initialized"
    );

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("COMPACT".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("invalid".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new("debug")
            .with_format(LogFormat::Json)
            .with_log_file("/tmp/app.log");

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/app.log")));
    }

    #[test]
    fn test_explicit_level_overrides_env() {
        let config = LogConfig::from_lookup(|key| match key {
            "RUST_LOG" => Some("warn".to_string()),
            "LOG_FORMAT" => Some("json".to_string()),
            _ => None,
        });
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Json);

        let config = config.with_level("debug");
        assert_eq!(config.level, "debug");
        assert_eq!(build_filter(&config).unwrap().to_string(), "debug");
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = LogConfig::from_lookup(|_| None);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_open_log_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("app.log");

        let file = open_log_file(&path).unwrap();
        drop(file);

        assert!(path.exists());
    }

    #[test]
    fn test_guard_without_file_flush_is_noop() {
        let guard = LogGuard::default();
        guard.flush();
        assert!(guard.file.is_none());
    }
}
