//! CoinAI market-quote collector CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coinai_collector::config::ScheduleConfig;
use coinai_collector::modules::{open_report, Pipeline, Scheduler, SystemOpener};
use coinai_collector::{CollectorConfig, RunConfig, RunMode};
use coinai_core::{init_logging, LogConfig, LogFormat, Watchlist};
use coinai_data::{AwesomeApiRateSource, YahooQuoteSource};

#[derive(Parser)]
#[command(name = "coinai-collector")]
#[command(about = "CoinAI 시세 수집기 (주식/ETF, 환율)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error). RUST_LOG보다 우선
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 콘솔 로그 형식 (pretty, json, compact). LOG_FORMAT보다 우선
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// 감시 목록 TOML 파일 (WATCHLIST_PATH보다 우선)
    #[arg(long, global = true)]
    watchlist: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// 파일 전용 모드: 1회 수집 후 XLSX 리포트 생성
    Report {
        /// 생성된 리포트를 자동으로 열지 않음
        #[arg(long)]
        no_open: bool,
    },

    /// 데이터베이스 모드: 주기적으로 수집하여 MySQL과 Parquet에 저장
    Record {
        /// 전체 실행 시간 (분)
        #[arg(long)]
        duration_minutes: Option<u64>,

        /// 수집 주기 (초)
        #[arg(long)]
        interval_seconds: Option<u64>,

        /// 데이터베이스 호스트
        #[arg(long)]
        db_host: Option<String>,

        /// 데이터베이스 사용자
        #[arg(long)]
        db_user: Option<String>,

        /// Parquet 스냅샷 저장 생략
        #[arg(long)]
        no_snapshots: bool,
    },

    /// 적용될 감시 목록 출력 (TOML)
    ShowWatchlist,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = CollectorConfig::from_env()?;

    let mut log_config = LogConfig::from_env().with_log_file(config.log_file());
    if let Some(level) = cli.log_level.as_deref() {
        log_config = log_config.with_level(level);
    }
    if let Some(format) = cli.log_format {
        log_config = log_config.with_format(format);
    }
    let _log_guard = init_logging(log_config)?;

    let watchlist_path = cli.watchlist.clone().or_else(|| config.watchlist_path.clone());
    let watchlist = Watchlist::load_or_default(watchlist_path.as_ref())?;

    let (run, open_after) = match cli.command {
        Commands::ShowWatchlist => {
            print!("{}", toml::to_string_pretty(&watchlist)?);
            return Ok(());
        }
        Commands::Report { no_open } => (RunConfig::file_only(), !no_open),
        Commands::Record {
            duration_minutes,
            interval_seconds,
            db_host,
            db_user,
            no_snapshots,
        } => {
            let mut settings = config.database.clone();
            if let Some(host) = db_host {
                settings.host = host;
            }
            if let Some(user) = db_user {
                settings.user = user;
            }

            let schedule = ScheduleConfig {
                duration_minutes: duration_minutes.unwrap_or(config.schedule.duration_minutes),
                interval_seconds: interval_seconds.unwrap_or(config.schedule.interval_seconds),
            };

            let mut run = RunConfig::database(settings, &schedule);
            run.write_snapshots = !no_snapshots;
            (run, false)
        }
    };

    tracing::info!(
        mode = ?run.mode(),
        stocks = watchlist.stocks().len(),
        currencies = watchlist.currencies().len(),
        "CoinAI 시세 수집기 시작"
    );

    let stock_source = YahooQuoteSource::new()?;
    let rate_source = AwesomeApiRateSource::with_base_url(
        config.provider.awesomeapi_base_url.as_str(),
        config.provider.http_timeout(),
    )?;
    let pipeline = Pipeline::new(Box::new(stock_source), Box::new(rate_source), watchlist);

    let mut scheduler = Scheduler::new(pipeline);
    scheduler.configure(&run, &config.export_dir).await?;

    let summary = scheduler.run(&run).await;
    tracing::info!(
        cycles = summary.cycles,
        files = summary.files.len(),
        sink_failures = summary.sink_failures,
        "CoinAI 시세 수집기 종료"
    );

    if run.mode() == RunMode::FileOnly && open_after {
        match summary.files.last() {
            Some(report) => {
                open_report(&SystemOpener, report);
            }
            None => tracing::warn!("생성된 리포트가 없어 열지 않습니다"),
        }
    }

    Ok(())
}
