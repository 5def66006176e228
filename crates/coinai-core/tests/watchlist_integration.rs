//! 감시 목록 파일 로드와 정규화를 함께 검증하는 통합 테스트.

use std::io::Write;

use coinai_core::{normalize, ExchangeRateRecord, PriceSeries, QuoteRecord, Trend, Watchlist};

const WATCHLIST: &str = r#"
[[stocks]]
symbol = "ITUB4.SA"
label = "Itaú Unibanco"

[[stocks]]
symbol = "AAPL"
label = "Apple"

[[stocks]]
symbol = "ITUB4.SA"
label = "Duplicate"

[[currencies]]
code = "BTC"
label = "Bitcoin"
"#;

#[test]
fn test_loaded_watchlist_drives_normalization() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(WATCHLIST.as_bytes()).unwrap();

    let watchlist = Watchlist::load(file.path()).unwrap();
    let ids: Vec<&str> = watchlist.stocks().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["ITUB4.SA", "AAPL"]);
    assert_eq!(watchlist.stocks()[0].label, "Itaú Unibanco");

    let apple = &watchlist.stocks()[1];
    let record: QuoteRecord = normalize(apple, &PriceSeries::new(vec![190.0, 200.0])).unwrap();
    assert_eq!(record.label, "Apple");
    assert_eq!(record.trend, Trend::Up);

    let btc = &watchlist.currencies()[0];
    let record: ExchangeRateRecord =
        normalize(btc, &PriceSeries::from_pair(350_000.0, 350_000.0)).unwrap();
    assert_eq!(record.percent_change, 0.0);
    assert_eq!(record.trend, Trend::Down);
}
