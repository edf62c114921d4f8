//! Per-year analytics: top movers, volatility extremes, global mean, overview.

mod common;

use common::{assert_close, d};
use crypto_history::queries::{YearInput, YearParams};
use crypto_history::{CryptoStatsError, Table};

// ---------------------------------------------------------------------------
// top_movers
// ---------------------------------------------------------------------------

#[test]
fn top_movers_ranked_by_absolute_change() {
    let table = common::sample_table();
    let result = table.yearly().top_movers(2021).unwrap();

    assert_eq!(result.year, 2021);
    let coins: Vec<&str> = result.top_n.iter().map(|c| c.coin_id.as_str()).collect();
    assert_eq!(coins, vec!["DOGE", "BTC", "ETH", "ADA"]);
    assert_close(result.top_n[0].percent_change, 400.0);
    assert_close(result.top_n[1].percent_change, 100.0);
    assert_close(result.top_n[2].percent_change, 50.0);
    assert_close(result.top_n[3].percent_change, 0.0);
}

#[test]
fn top_movers_returns_at_most_four() {
    let mut rows = Vec::new();
    for (i, coin) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
        rows.push(common::point(coin, "2020-01-01", 100.0, 0.0, 0.0));
        rows.push(common::point(coin, "2020-12-31", 100.0 + (i as f64 + 1.0) * 10.0, 0.0, 0.0));
    }
    let table = Table::new(rows);
    let result = table.yearly().top_movers(2020).unwrap();

    assert_eq!(result.top_n.len(), 4);
    let coins: Vec<&str> = result.top_n.iter().map(|c| c.coin_id.as_str()).collect();
    assert_eq!(coins, vec!["F", "E", "D", "C"]);
    for pair in result.top_n.windows(2) {
        assert!(pair[0].percent_change.abs() >= pair[1].percent_change.abs());
    }
}

#[test]
fn top_movers_ranks_drops_by_magnitude() {
    let table = Table::new(vec![
        common::point("UP", "2020-01-01", 100.0, 0.0, 0.0),
        common::point("DOWN", "2020-01-01", 100.0, 0.0, 0.0),
        common::point("UP", "2020-12-31", 110.0, 0.0, 0.0),
        common::point("DOWN", "2020-12-31", 20.0, 0.0, 0.0),
    ]);
    let result = table.yearly().top_movers(2020).unwrap();
    assert_eq!(result.top_n[0].coin_id, "DOWN");
    assert_close(result.top_n[0].percent_change, -80.0);
}

#[test]
fn top_movers_uses_chronological_first_and_last() {
    // Table order is not date order: the 2021-12-31 BTC row comes before 2021-06-01
    let table = common::sample_table();
    let result = table.yearly().top_movers(2021).unwrap();
    let btc = result.top_n.iter().find(|c| c.coin_id == "BTC").unwrap();

    let dates: Vec<_> = btc.price_series.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![d("2021-01-01"), d("2021-06-01"), d("2021-12-31")]);
    let prices: Vec<f64> = btc.price_series.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![100.0, 150.0, 200.0]);
}

#[test]
fn top_movers_skips_zero_first_price() {
    let table = Table::new(vec![
        common::point("ZERO", "2020-01-01", 0.0, 0.0, 0.0),
        common::point("ZERO", "2020-12-31", 10.0, 0.0, 0.0),
        common::point("BTC", "2020-01-01", 10.0, 0.0, 0.0),
        common::point("BTC", "2020-12-31", 20.0, 0.0, 0.0),
    ]);
    let result = table.yearly().top_movers(2020).unwrap();
    assert_eq!(result.top_n.len(), 1);
    assert_eq!(result.top_n[0].coin_id, "BTC");
}

#[test]
fn top_movers_series_limited_to_year() {
    let table = common::sample_table();
    let result = table.yearly().top_movers(2022).unwrap();
    for coin in &result.top_n {
        assert_eq!(coin.price_series.len(), 1);
        assert_eq!(coin.price_series[0].date, d("2022-01-01"));
    }
}

#[test]
fn top_movers_empty_year_is_no_data() {
    let table = common::sample_table();
    let err = table.yearly().top_movers(1999).unwrap_err();
    assert!(matches!(err, CryptoStatsError::NoDataFound(_)));
}

// ---------------------------------------------------------------------------
// volatility_extremes
// ---------------------------------------------------------------------------

#[test]
fn volatility_extremes_picks_max_and_min_std_dev() {
    let table = common::sample_table();
    let result = table.yearly().volatility_extremes(2021).unwrap();

    assert_eq!(result.most_volatile.coin_id, "BTC");
    assert_close(result.most_volatile.std_dev, 50.0);
    assert_eq!(result.most_stable.coin_id, "DOGE");
    assert_close(result.most_stable.std_dev, 0.0008f64.sqrt());
    assert!(result.most_volatile.std_dev >= result.most_stable.std_dev);
}

#[test]
fn volatility_extremes_attach_year_series() {
    let table = common::sample_table();
    let result = table.yearly().volatility_extremes(2021).unwrap();
    assert_eq!(result.most_volatile.price_series.len(), 3);
    assert_eq!(result.most_stable.price_series.len(), 2);
    assert_eq!(result.most_stable.price_series[0].date, d("2021-01-01"));
}

#[test]
fn volatility_extremes_ignore_single_observation_coins() {
    // ADA has one row in 2021 and would otherwise be the "most stable" (sd 0)
    let table = common::sample_table();
    let result = table.yearly().volatility_extremes(2021).unwrap();
    assert_ne!(result.most_stable.coin_id, "ADA");
    assert_ne!(result.most_volatile.coin_id, "ADA");
}

#[test]
fn volatility_extremes_ties_go_to_first_coin() {
    let table = Table::new(vec![
        common::point("FIRST", "2020-01-01", 1.0, 0.0, 0.0),
        common::point("FIRST", "2020-02-01", 3.0, 0.0, 0.0),
        common::point("SECOND", "2020-01-01", 11.0, 0.0, 0.0),
        common::point("SECOND", "2020-02-01", 13.0, 0.0, 0.0),
    ]);
    let result = table.yearly().volatility_extremes(2020).unwrap();
    assert_eq!(result.most_volatile.coin_id, "FIRST");
    assert_eq!(result.most_stable.coin_id, "FIRST");
}

#[test]
fn volatility_extremes_without_two_observations_is_invalid() {
    let table = Table::new(vec![
        common::point("A", "2020-01-01", 1.0, 0.0, 0.0),
        common::point("B", "2020-01-01", 2.0, 0.0, 0.0),
    ]);
    let err = table.yearly().volatility_extremes(2020).unwrap_err();
    assert!(matches!(err, CryptoStatsError::InvalidComputation(_)));
}

#[test]
fn volatility_extremes_empty_year_is_no_data() {
    let table = common::sample_table();
    let err = table.yearly().volatility_extremes(2005).unwrap_err();
    assert!(matches!(err, CryptoStatsError::NoDataFound(_)));
}

#[test]
fn volatility_extremes_handle_huge_prices() {
    let table = Table::new(vec![
        common::point("BIG", "2020-01-01", f64::MAX, 0.0, 0.0),
        common::point("BIG", "2020-02-01", 0.0, 0.0, 0.0),
        common::point("SMALL", "2020-01-01", 1.0, 0.0, 0.0),
        common::point("SMALL", "2020-02-01", 2.0, 0.0, 0.0),
    ]);
    let result = table.yearly().volatility_extremes(2020).unwrap();
    assert_eq!(result.most_volatile.coin_id, "BIG");
    assert!(result.most_volatile.std_dev.is_finite());

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["most_volatile"]["std_dev"].is_number());
}

#[test]
fn volatility_extremes_overflow_is_invalid() {
    let table = Table::new(vec![
        common::point("WILD", "2020-01-01", -f64::MAX, 0.0, 0.0),
        common::point("WILD", "2020-02-01", f64::MAX, 0.0, 0.0),
    ]);
    let err = table.yearly().volatility_extremes(2020).unwrap_err();
    assert!(matches!(err, CryptoStatsError::InvalidComputation(_)));

    let err = table.yearly().overview(2020).unwrap_err();
    assert!(matches!(err, CryptoStatsError::InvalidComputation(_)));
}

#[test]
fn global_mean_of_huge_prices_stays_finite() {
    let table = Table::new(vec![
        common::point("A", "2020-01-01", f64::MAX, 0.0, 0.0),
        common::point("B", "2020-01-01", f64::MAX, 0.0, 0.0),
    ]);
    let result = table.yearly().above_global_mean(2020).unwrap();
    assert_eq!(result.global_mean, f64::MAX);
    assert!(result.coins.is_empty());
}

// ---------------------------------------------------------------------------
// above_global_mean
// ---------------------------------------------------------------------------

#[test]
fn global_mean_is_mean_of_coin_means() {
    let table = common::sample_table();
    let result = table.yearly().above_global_mean(2021).unwrap();

    let expected = (150.0 + 15.0 + 0.03 + 1.0) / 4.0;
    assert_close(result.global_mean, expected);

    let row_mean: f64 = table.in_year(2021).map(|r| r.price).sum::<f64>() / 9.0;
    assert!((result.global_mean - row_mean).abs() > 1.0);
}

#[test]
fn above_global_mean_returns_only_coins_above() {
    let table = common::sample_table();
    let result = table.yearly().above_global_mean(2021).unwrap();

    assert_eq!(result.coins.len(), 1);
    assert_eq!(result.coins[0].coin_id, "BTC");
    assert_close(result.coins[0].mean_price, 150.0);
    assert_eq!(result.coins[0].price_series.len(), 3);
    assert!(result.coins.iter().all(|c| c.mean_price > result.global_mean));
}

#[test]
fn heavily_sampled_coin_does_not_dominate_global_mean() {
    let mut rows = vec![common::point("RARE", "2020-06-01", 100.0, 0.0, 0.0)];
    for day in 1..=9 {
        rows.push(common::point("OFTEN", &format!("2020-01-0{day}"), 10.0, 0.0, 0.0));
    }
    let table = Table::new(rows);
    let result = table.yearly().above_global_mean(2020).unwrap();

    assert_close(result.global_mean, 55.0);
    assert_eq!(result.coins.len(), 1);
    assert_eq!(result.coins[0].coin_id, "RARE");
}

#[test]
fn above_global_mean_is_strict() {
    let table = Table::new(vec![
        common::point("A", "2020-01-01", 5.0, 0.0, 0.0),
        common::point("B", "2020-01-01", 5.0, 0.0, 0.0),
    ]);
    let result = table.yearly().above_global_mean(2020).unwrap();
    assert_close(result.global_mean, 5.0);
    assert!(result.coins.is_empty());
}

#[test]
fn above_global_mean_empty_year_is_empty_not_error() {
    let table = common::sample_table();
    let result = table.yearly().above_global_mean(1999).unwrap();
    assert_eq!(result.global_mean, 0.0);
    assert!(result.coins.is_empty());
}

// ---------------------------------------------------------------------------
// overview
// ---------------------------------------------------------------------------

#[test]
fn overview_combines_stability_and_global_mean() {
    let table = common::sample_table();
    let result = table.yearly().overview(2021).unwrap();

    assert_eq!(result.year, 2021);
    assert_eq!(result.most_stable.coin_id, "DOGE");
    assert_close(result.global_mean, (150.0 + 15.0 + 0.03 + 1.0) / 4.0);
    assert_eq!(result.coins.len(), 1);
    assert_eq!(result.coins[0].coin_id, "BTC");
}

// ---------------------------------------------------------------------------
// YearParams
// ---------------------------------------------------------------------------

#[test]
fn year_params_accept_number_and_string() {
    let p: YearParams = serde_json::from_str(r#"{"year": 2021}"#).unwrap();
    assert_eq!(p.resolve().unwrap(), 2021);

    let p: YearParams = serde_json::from_str(r#"{"year": "2021"}"#).unwrap();
    assert_eq!(p.year, Some(YearInput::Text("2021".into())));
    assert_eq!(p.resolve().unwrap(), 2021);

    assert_eq!(YearParams::new(2020).resolve().unwrap(), 2020);
}

#[test]
fn year_params_missing_or_blank() {
    let p: YearParams = serde_json::from_str("{}").unwrap();
    assert!(matches!(p.resolve(), Err(CryptoStatsError::MissingField(_))));

    let p: YearParams = serde_json::from_str(r#"{"year": ""}"#).unwrap();
    assert!(matches!(p.resolve(), Err(CryptoStatsError::MissingField(_))));

    let p: YearParams = serde_json::from_str(r#"{"year": null}"#).unwrap();
    assert!(matches!(p.resolve(), Err(CryptoStatsError::MissingField(_))));
}

#[test]
fn year_params_reject_non_integers() {
    let p: YearParams = serde_json::from_str(r#"{"year": "twenty"}"#).unwrap();
    assert!(matches!(p.resolve(), Err(CryptoStatsError::InvalidArgument(_))));

    let p: YearParams = serde_json::from_str(r#"{"year": 99999999999}"#).unwrap();
    assert!(matches!(p.resolve(), Err(CryptoStatsError::InvalidArgument(_))));
}
