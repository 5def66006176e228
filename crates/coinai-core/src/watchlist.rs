//! 감시 목록 설정.
//!
//! 수집 대상 주식/ETF 심볼과 통화 코드를 이름과 함께 정의합니다.
//! 입력 순서가 그대로 배치 순서가 됩니다.
//!
//! TOML 파일 형식:
//!
//! ```toml
//! [[stocks]]
//! symbol = "PETR4.SA"
//! label = "Petrobras"
//!
//! [[currencies]]
//! code = "USD"
//! label = "Dólar"
//! ```

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::path::Path;

use crate::error::CoreResult;

/// 감시 항목 (심볼 또는 통화 코드 → 표시 이름).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WatchItem {
    /// 심볼 또는 통화 코드
    #[serde(alias = "symbol", alias = "code")]
    pub id: String,
    /// 표시 이름
    pub label: String,
}

impl WatchItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// 주식/ETF와 통화 감시 목록.
///
/// 직렬화 결과는 [`Watchlist::load`]가 읽는 TOML 형식과 같습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct Watchlist {
    stocks: Vec<WatchItem>,
    currencies: Vec<WatchItem>,
}

#[derive(Debug, Deserialize)]
struct WatchlistFile {
    #[serde(default)]
    stocks: Vec<WatchItem>,
    #[serde(default)]
    currencies: Vec<WatchItem>,
}

#[derive(Serialize)]
struct StockEntry<'a> {
    symbol: &'a str,
    label: &'a str,
}

#[derive(Serialize)]
struct CurrencyEntry<'a> {
    code: &'a str,
    label: &'a str,
}

#[derive(Serialize)]
struct WatchlistView<'a> {
    stocks: Vec<StockEntry<'a>>,
    currencies: Vec<CurrencyEntry<'a>>,
}

impl Serialize for Watchlist {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WatchlistView {
            stocks: self
                .stocks
                .iter()
                .map(|i| StockEntry {
                    symbol: &i.id,
                    label: &i.label,
                })
                .collect(),
            currencies: self
                .currencies
                .iter()
                .map(|i| CurrencyEntry {
                    code: &i.id,
                    label: &i.label,
                })
                .collect(),
        }
        .serialize(serializer)
    }
}

impl Watchlist {
    /// 새 감시 목록 생성.
    ///
    /// 같은 심볼/코드가 여러 번 나오면 첫 항목만 유지합니다.
    pub fn new(stocks: Vec<WatchItem>, currencies: Vec<WatchItem>) -> Self {
        Self {
            stocks: dedup(stocks, "stocks"),
            currencies: dedup(currencies, "currencies"),
        }
    }

    /// 주식/ETF 항목.
    pub fn stocks(&self) -> &[WatchItem] {
        &self.stocks
    }

    /// 통화 항목.
    pub fn currencies(&self) -> &[WatchItem] {
        &self.currencies
    }

    /// TOML 파일에서 감시 목록 로드.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let source = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;
        let file: WatchlistFile = source.try_deserialize()?;

        tracing::debug!(
            path = %path.as_ref().display(),
            stocks = file.stocks.len(),
            currencies = file.currencies.len(),
            "감시 목록 파일 로드"
        );

        Ok(Self::new(file.stocks, file.currencies))
    }

    /// 경로가 있으면 파일에서, 없으면 기본 목록.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> CoreResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

fn dedup(items: Vec<WatchItem>, section: &str) -> Vec<WatchItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let first = seen.insert(item.id.clone());
            if !first {
                tracing::warn!(section, id = %item.id, "중복 항목 무시");
            }
            first
        })
        .collect()
}

/// 기본 주식/ETF 목록: 국내(브라질) 주식, 해외 주식, ETF.
const DEFAULT_STOCKS: &[(&str, &str)] = &[
    ("PETR4.SA", "Petrobras"),
    ("VALE3.SA", "Vale S.A."),
    ("ITUB4.SA", "Itaú Unibanco"),
    ("BBDC3.SA", "Banco Bradesco"),
    ("BBAS3.SA", "Banco do Brasil"),
    ("B3SA3.SA", "B3 S.A."),
    ("WEGE3.SA", "Weg S.A."),
    ("SUZB3.SA", "Suzano S.A."),
    ("JBSS3.SA", "JBS S.A."),
    ("RENT3.SA", "Localiza"),
    ("AAPL", "Apple"),
    ("TSLA", "Tesla"),
    ("MSFT", "Microsoft"),
    ("GOOGL", "Google"),
    ("AMZN", "Amazon"),
    ("META", "Meta"),
    ("NVDA", "NVIDIA"),
    ("JNJ", "Johnson & Johnson"),
    ("V", "Visa"),
    ("WMT", "Walmart"),
    ("SPY", "SPDR S&P 500"),
    ("IVV", "iShares S&P 500"),
    ("VTI", "Vanguard Total Market"),
    ("QQQ", "Invesco QQQ"),
    ("VOO", "Vanguard S&P 500"),
];

/// 기본 통화 목록 (BRL 기준, 암호화폐 포함).
const DEFAULT_CURRENCIES: &[(&str, &str)] = &[
    ("USD", "Dólar"),
    ("EUR", "Euro"),
    ("JPY", "Iene"),
    ("GBP", "Libra"),
    ("ARS", "Peso Argentino"),
    ("CHF", "Franco Suíço"),
    ("CNY", "Yuan"),
    ("BTC", "Bitcoin"),
    ("ETH", "Ethereum"),
    ("CAD", "Dólar Canadense"),
];

impl Default for Watchlist {
    fn default() -> Self {
        let to_items = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(id, label)| WatchItem::new(*id, *label))
                .collect()
        };
        Self::new(to_items(DEFAULT_STOCKS), to_items(DEFAULT_CURRENCIES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_watchlist() {
        let watchlist = Watchlist::default();
        assert_eq!(watchlist.stocks().len(), 25);
        assert_eq!(watchlist.currencies().len(), 10);
        assert_eq!(watchlist.stocks()[0], WatchItem::new("PETR4.SA", "Petrobras"));
        assert_eq!(watchlist.currencies()[7].id, "BTC");
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let watchlist = Watchlist::new(
            vec![
                WatchItem::new("AAPL", "Apple"),
                WatchItem::new("MSFT", "Microsoft"),
                WatchItem::new("AAPL", "Apple Inc."),
            ],
            vec![],
        );
        assert_eq!(watchlist.stocks().len(), 2);
        assert_eq!(watchlist.stocks()[0].label, "Apple");
        assert_eq!(watchlist.stocks()[1].id, "MSFT");
    }

    #[test]
    fn test_load_from_toml_preserves_order() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[[stocks]]
symbol = "NVDA"
label = "NVIDIA"

[[stocks]]
symbol = "AAPL"
label = "Apple"

[[currencies]]
code = "EUR"
label = "Euro"
"#
        )
        .unwrap();

        let watchlist = Watchlist::load(file.path()).unwrap();
        let ids: Vec<&str> = watchlist.stocks().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["NVDA", "AAPL"]);
        assert_eq!(watchlist.currencies(), &[WatchItem::new("EUR", "Euro")]);
    }

    #[test]
    fn test_serialized_watchlist_uses_file_keys() {
        let watchlist = Watchlist::new(
            vec![WatchItem::new("AAPL", "Apple")],
            vec![WatchItem::new("USD", "Dólar")],
        );

        let text = toml::to_string_pretty(&watchlist).unwrap();
        assert!(text.contains("symbol = \"AAPL\""));
        assert!(text.contains("code = \"USD\""));
        assert!(!text.contains("id ="));

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        assert_eq!(Watchlist::load(file.path()).unwrap(), watchlist);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Watchlist::load("/nonexistent/watchlist.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_without_path() {
        let watchlist = Watchlist::load_or_default(None::<&str>).unwrap();
        assert_eq!(watchlist, Watchlist::default());
    }
}
