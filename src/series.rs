//! Per-coin grouping and the numeric helpers the yearly queries are built on.

use std::collections::HashMap;

use crate::error::{CryptoStatsError, Result};
use crate::models::{PricePoint, SeriesPoint};

/// Arithmetic mean, or `None` for an empty slice.
///
/// When the plain sum overflows, each value is divided by the count before
/// summing, so the mean of finite values stays finite.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let plain = values.iter().sum::<f64>() / n;
    if plain.is_finite() {
        return Some(plain);
    }
    Some(values.iter().map(|v| v / n).sum())
}

/// Sample standard deviation (n - 1 divisor).
///
/// Undefined, and so `None`, for fewer than two values. When the squared
/// deviations overflow, the values are rescaled by their largest magnitude;
/// the result is then only infinite when the deviation itself exceeds
/// `f64::MAX`.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let plain = raw_std_dev(values)?;
    if plain.is_finite() {
        return Some(plain);
    }
    let scale = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if !scale.is_finite() || scale == 0.0 {
        return Some(plain);
    }
    let scaled: Vec<f64> = values.iter().map(|v| v / scale).collect();
    Some(raw_std_dev(&scaled)? * scale)
}

fn raw_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Fail with [`CryptoStatsError::InvalidComputation`] when `value` overflowed.
pub fn ensure_finite(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CryptoStatsError::InvalidComputation(format!(
            "{} is not representable as a finite number",
            what
        )))
    }
}

/// `(final - initial) / initial * 100`, or `None` when `initial` is zero.
pub fn percent_change(initial: f64, final_value: f64) -> Option<f64> {
    if initial == 0.0 {
        return None;
    }
    let change = (final_value - initial) / initial * 100.0;
    change.is_finite().then_some(change)
}

// ---------------------------------------------------------------------------
// CoinSeries
// ---------------------------------------------------------------------------

/// The rows of one coin, ordered by date.
///
/// Ordering is a stable sort, so rows sharing a date keep their table order.
#[derive(Debug, Clone)]
pub struct CoinSeries<'a> {
    pub coin_id: &'a str,
    pub points: Vec<&'a PricePoint>,
}

impl<'a> CoinSeries<'a> {
    fn new(coin_id: &'a str) -> Self {
        Self {
            coin_id,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&'a PricePoint> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<&'a PricePoint> {
        self.points.last().copied()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn mean_price(&self) -> Option<f64> {
        mean(&self.prices())
    }

    pub fn std_dev(&self) -> Option<f64> {
        sample_std_dev(&self.prices())
    }

    /// Change between the chronologically first and last price.
    pub fn percent_change(&self) -> Option<f64> {
        percent_change(self.first()?.price, self.last()?.price)
    }

    pub fn price_series(&self) -> Vec<SeriesPoint> {
        self.points.iter().map(|p| SeriesPoint::from(*p)).collect()
    }
}

/// Split rows into one [`CoinSeries`] per coin.
///
/// Coins appear in the order they are first encountered; each series is
/// sorted by date.
pub fn group_by_coin<'a, I>(rows: I) -> Vec<CoinSeries<'a>>
where
    I: IntoIterator<Item = &'a PricePoint>,
{
    let mut series: Vec<CoinSeries<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for row in rows {
        let slot = *index.entry(row.coin_id.as_str()).or_insert_with(|| {
            series.push(CoinSeries::new(row.coin_id.as_str()));
            series.len() - 1
        });
        series[slot].points.push(row);
    }

    for s in &mut series {
        s.points.sort_by_key(|p| p.date);
    }
    series
}
