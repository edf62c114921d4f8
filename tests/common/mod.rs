//! Shared test fixtures for the crypto-history integration tests.
//!
//! Provides `sample_table()`, a small in-memory table spanning two years, and
//! `write_csv()` for tests that go through the DuckDB loader.

#![allow(dead_code)]

use chrono::NaiveDate;
use crypto_history::models::PricePoint;
use crypto_history::Table;
use std::io::Write;
use tempfile::NamedTempFile;

pub const CSV_HEADER: &str = "coin_name,date,price,total_volume,market_cap";

/// Parse a `YYYY-MM-DD` literal.
pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn point(coin: &str, date: &str, price: f64, volume: f64, cap: f64) -> PricePoint {
    PricePoint::new(coin, d(date), price, volume, cap)
}

/// Sample table with four coins in 2021 and two in 2022.
///
/// 2021, per coin (date order):
/// - BTC:  100, 150, 200      (+100%, sd 50, mean 150)
/// - ETH:  10, 20, 15         (+50%,  sd 5,  mean 15)
/// - DOGE: 0.01, 0.05         (+400%, sd ~0.0283, mean 0.03)
/// - ADA:  1                  (0%, single observation)
///
/// Rows are deliberately interleaved and not in date order.
pub fn sample_table() -> Table {
    Table::new(vec![
        point("BTC", "2021-01-01", 100.0, 1000.0, 10000.0),
        point("ETH", "2021-01-01", 10.0, 500.0, 0.0),
        point("BTC", "2021-12-31", 200.0, 2000.0, 20000.0),
        point("ETH", "2021-06-01", 20.0, 400.0, 2000.0),
        point("DOGE", "2021-01-01", 0.01, 10.0, 100.0),
        point("BTC", "2021-06-01", 150.0, 1500.0, 15000.0),
        point("DOGE", "2021-12-31", 0.05, 20.0, 500.0),
        point("ETH", "2021-12-31", 15.0, 300.0, 3000.0),
        point("ADA", "2021-03-01", 1.0, 5.0, 50.0),
        point("BTC", "2022-01-01", 50.0, 500.0, 5000.0),
        point("ETH", "2022-01-01", 5.0, 50.0, 500.0),
    ])
}

/// Write CSV `lines` (header included by the caller) to a temp `.csv` file.
///
/// The caller must keep the returned file alive while it is being read.
pub fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

/// The sample table as a CSV file, header first.
pub fn sample_csv() -> NamedTempFile {
    let mut lines = vec![CSV_HEADER.to_string()];
    for p in sample_table().rows() {
        lines.push(format!(
            "{},{},{},{},{}",
            p.coin_id.to_lowercase(),
            p.date,
            p.price,
            p.total_volume,
            p.market_cap
        ));
    }
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    write_csv(&refs)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
