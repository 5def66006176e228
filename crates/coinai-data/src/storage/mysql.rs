//! MySQL 저장소.
//!
//! 두 단계로 동작합니다.
//!
//! 1. **스키마 단계** (실행 시작 시 1회, 멱등):
//!    서버 연결 → 대상 데이터베이스가 없으면 생성 → 전환 →
//!    `acoes`, `moedas` 테이블 보장 (`CREATE TABLE IF NOT EXISTS`)
//! 2. **삽입 단계** (수집 주기마다):
//!    배치의 레코드를 행 단위로 파라미터 바인딩하여 삽입하고,
//!    두 테이블 삽입을 모두 시도한 뒤 한 번에 커밋
//!
//! 연결 풀 없이 단일 연결을 실행 기간 동안 유지합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! let mut store = MysqlStore::open(&settings).await?;
//! let outcome = store.insert_cycle(&quotes, &rates).await;
//! store.close().await;
//! ```

use coinai_core::{ExchangeRateRecord, QuoteRecord};
use secrecy::{ExposeSecret, SecretString};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, MySql, Transaction};
use tracing::{debug, error, info, instrument};

use crate::error::{DataError, Result};

/// 기본 데이터베이스명.
pub const DEFAULT_DATABASE: &str = "CoinAI";

const CREATE_ACOES: &str = r#"
    CREATE TABLE IF NOT EXISTS acoes (
        id INT AUTO_INCREMENT PRIMARY KEY,
        company VARCHAR(255) NOT NULL,
        symbol VARCHAR(50) NOT NULL,
        price DOUBLE NOT NULL,
        percent_change DOUBLE NOT NULL,
        captured_at DATETIME NOT NULL,
        trend VARCHAR(50) NOT NULL,
        reference_url TEXT NOT NULL
    )
"#;

const CREATE_MOEDAS: &str = r#"
    CREATE TABLE IF NOT EXISTS moedas (
        id INT AUTO_INCREMENT PRIMARY KEY,
        label VARCHAR(255) NOT NULL,
        code VARCHAR(50) NOT NULL,
        rate DOUBLE NOT NULL,
        percent_change DOUBLE NOT NULL,
        trend VARCHAR(50) NOT NULL,
        captured_at DATETIME NOT NULL
    )
"#;

const INSERT_ACOES: &str = r#"
    INSERT INTO acoes (company, symbol, price, percent_change, captured_at, trend, reference_url)
    VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

const INSERT_MOEDAS: &str = r#"
    INSERT INTO moedas (label, code, rate, percent_change, trend, captured_at)
    VALUES (?, ?, ?, ?, ?, ?)
"#;

/// MySQL 접속 설정.
#[derive(Debug, Clone)]
pub struct MysqlSettings {
    /// 호스트
    pub host: String,
    /// 포트
    pub port: u16,
    /// 사용자
    pub user: String,
    /// 비밀번호
    pub password: SecretString,
    /// 데이터베이스명
    pub database: String,
}

impl Default for MysqlSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: SecretString::from(String::new()),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl MysqlSettings {
    /// 데이터베이스를 지정하지 않은 서버 접속 옵션.
    fn server_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user);

        let password = self.password.expose_secret();
        if password.is_empty() {
            options
        } else {
            options.password(password)
        }
    }
}

/// 대상 데이터베이스 존재 여부.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseState {
    /// 이미 존재
    Present,
    /// 존재하지 않음 (알 수 없는 데이터베이스)
    Missing,
}

/// 한 주기의 삽입 결과.
///
/// 테이블별로 독립적이며, 한쪽 실패가 다른 쪽 삽입을 되돌리지 않습니다.
#[derive(Debug)]
pub struct InsertOutcome {
    /// `acoes` 삽입 행 수 또는 오류
    pub quotes: Result<usize>,
    /// `moedas` 삽입 행 수 또는 오류
    pub rates: Result<usize>,
    /// 커밋 결과
    pub commit: Result<()>,
}

impl InsertOutcome {
    /// 두 테이블 삽입과 커밋이 모두 성공했는지.
    pub fn is_success(&self) -> bool {
        self.quotes.is_ok() && self.rates.is_ok() && self.commit.is_ok()
    }
}

/// 데이터베이스명은 SQL 식별자로 직접 쓰이므로 영숫자와 `_`만 허용.
pub fn validate_identifier(name: &str) -> Result<&str> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(DataError::InvalidIdentifier(name.to_string()))
    }
}

/// 서버에 데이터베이스가 있는지 확인.
async fn database_state(conn: &mut MySqlConnection, database: &str) -> Result<DatabaseState> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM INFORMATION_SCHEMA.SCHEMATA WHERE SCHEMA_NAME = ?",
    )
    .bind(database)
    .fetch_one(&mut *conn)
    .await?;

    Ok(if count > 0 {
        DatabaseState::Present
    } else {
        DatabaseState::Missing
    })
}

/// `acoes`에 배치 삽입. 첫 오류에서 중단.
async fn insert_quotes(tx: &mut Transaction<'_, MySql>, batch: &[QuoteRecord]) -> Result<usize> {
    for record in batch {
        sqlx::query(INSERT_ACOES)
            .bind(&record.label)
            .bind(&record.symbol)
            .bind(record.price)
            .bind(record.percent_change)
            .bind(record.captured_at)
            .bind(record.trend.as_str())
            .bind(&record.reference_url)
            .execute(&mut **tx)
            .await
            .map_err(|e| DataError::InsertError(format!("acoes ({}): {}", record.symbol, e)))?;
    }
    Ok(batch.len())
}

/// `moedas`에 배치 삽입. 첫 오류에서 중단.
async fn insert_rates(
    tx: &mut Transaction<'_, MySql>,
    batch: &[ExchangeRateRecord],
) -> Result<usize> {
    for record in batch {
        sqlx::query(INSERT_MOEDAS)
            .bind(&record.label)
            .bind(&record.code)
            .bind(record.rate)
            .bind(record.percent_change)
            .bind(record.trend.as_str())
            .bind(record.captured_at)
            .execute(&mut **tx)
            .await
            .map_err(|e| DataError::InsertError(format!("moedas ({}): {}", record.code, e)))?;
    }
    Ok(batch.len())
}

/// MySQL 저장소 (단일 연결).
pub struct MysqlStore {
    conn: MySqlConnection,
    database: String,
}

impl MysqlStore {
    /// 스키마 단계: 연결, 데이터베이스 생성/전환, 테이블 보장.
    ///
    /// 여기서 발생한 오류는 데이터베이스 모드 실행 전체에 치명적입니다.
    #[instrument(skip(settings), fields(host = %settings.host, database = %settings.database))]
    pub async fn open(settings: &MysqlSettings) -> Result<Self> {
        let database = validate_identifier(&settings.database)?.to_string();

        let mut conn = MySqlConnection::connect_with(&settings.server_options())
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;
        info!("데이터베이스 서버 연결 성공");

        if database_state(&mut conn, &database).await? == DatabaseState::Missing {
            info!(database = %database, "데이터베이스가 없어 생성합니다");
            sqlx::raw_sql(&format!("CREATE DATABASE IF NOT EXISTS `{}`", database))
                .execute(&mut conn)
                .await?;
            info!(database = %database, "데이터베이스 생성 완료");
        }

        sqlx::raw_sql(&format!("USE `{}`", database))
            .execute(&mut conn)
            .await?;

        let mut store = Self { conn, database };
        store.ensure_tables().await?;
        Ok(store)
    }

    /// 현재 데이터베이스명.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// 두 테이블이 없으면 생성 (이미 있으면 변화 없음).
    pub async fn ensure_tables(&mut self) -> Result<()> {
        sqlx::raw_sql(CREATE_ACOES).execute(&mut self.conn).await?;
        sqlx::raw_sql(CREATE_MOEDAS).execute(&mut self.conn).await?;
        info!("테이블 준비 완료");
        Ok(())
    }

    /// 삽입 단계: 두 배치를 하나의 트랜잭션으로 삽입 후 커밋.
    ///
    /// 한 테이블의 삽입이 실패해도 다른 테이블 삽입은 진행되며,
    /// 성공한 행은 그대로 커밋됩니다.
    pub async fn insert_cycle(
        &mut self,
        quotes: &[QuoteRecord],
        rates: &[ExchangeRateRecord],
    ) -> InsertOutcome {
        let mut tx = match self.conn.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                let msg = e.to_string();
                error!(error = %msg, "트랜잭션 시작 실패");
                return InsertOutcome {
                    quotes: Err(DataError::QueryError(msg.clone())),
                    rates: Err(DataError::QueryError(msg.clone())),
                    commit: Err(DataError::QueryError(msg)),
                };
            }
        };

        let quotes_result = insert_quotes(&mut tx, quotes).await;
        match &quotes_result {
            Ok(n) => info!(table = "acoes", rows = n, "데이터 삽입 완료"),
            Err(e) => error!(table = "acoes", error = %e, "데이터 삽입 실패"),
        }

        let rates_result = insert_rates(&mut tx, rates).await;
        match &rates_result {
            Ok(n) => info!(table = "moedas", rows = n, "데이터 삽입 완료"),
            Err(e) => error!(table = "moedas", error = %e, "데이터 삽입 실패"),
        }

        let commit = tx.commit().await.map_err(DataError::from);
        if let Err(e) = &commit {
            error!(error = %e, "커밋 실패");
        } else {
            debug!("커밋 완료");
        }

        InsertOutcome {
            quotes: quotes_result,
            rates: rates_result,
            commit,
        }
    }

    /// 연결 종료.
    pub async fn close(self) {
        match self.conn.close().await {
            Ok(()) => info!("데이터베이스 연결 종료"),
            Err(e) => error!(error = %e, "데이터베이스 연결 종료 실패"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("CoinAI").is_ok());
        assert!(validate_identifier("coin_ai_2").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("x; DROP TABLE acoes").is_err());
        assert!(validate_identifier("a`b").is_err());
        assert!(validate_identifier(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_default_settings() {
        let settings = MysqlSettings::default();
        assert_eq!(settings.host, "localhost");
        assert_eq!(settings.port, 3306);
        assert_eq!(settings.database, DEFAULT_DATABASE);
    }

    #[test]
    fn test_insert_outcome_success() {
        let outcome = InsertOutcome {
            quotes: Ok(2),
            rates: Err(DataError::InsertError("x".to_string())),
            commit: Ok(()),
        };
        assert!(!outcome.is_success());

        let outcome = InsertOutcome {
            quotes: Ok(2),
            rates: Ok(0),
            commit: Ok(()),
        };
        assert!(outcome.is_success());
    }
}
