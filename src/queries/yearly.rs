//! Per-year analytics: top movers, volatility extremes and the global mean.
//!
//! Every function here filters the table to one calendar year and groups the
//! rows with [`group_by_coin`], so coins are visited in first-encounter order
//! and each coin's rows are in date order.

use serde::Deserialize;

use crate::config::TOP_MOVERS_LIMIT;
use crate::error::{CryptoStatsError, Result};
use crate::models::{
    AboveMeanResult, CoinDeviation, CoinMean, CoinMove, CoinVolatility, VolatilityExtremesResult,
    YearOverviewResult, YearlyRankingResult,
};
use crate::series::{ensure_finite, group_by_coin, mean, CoinSeries};
use crate::table::Table;

// ---------------------------------------------------------------------------
// YearParams
// ---------------------------------------------------------------------------

/// A year as sent by clients: either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum YearInput {
    Number(i64),
    Text(String),
}

/// Request payload for the yearly queries: `{year}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YearParams {
    pub year: Option<YearInput>,
}

impl YearParams {
    pub fn new(year: i32) -> Self {
        Self {
            year: Some(YearInput::Number(year.into())),
        }
    }

    pub fn resolve(&self) -> Result<i32> {
        match &self.year {
            None => Err(CryptoStatsError::MissingField("year".to_string())),
            Some(YearInput::Text(s)) if s.trim().is_empty() => {
                Err(CryptoStatsError::MissingField("year".to_string()))
            }
            Some(YearInput::Text(s)) => s.trim().parse::<i32>().map_err(|_| {
                CryptoStatsError::InvalidArgument(format!("year must be an integer, got '{}'", s))
            }),
            Some(YearInput::Number(n)) => i32::try_from(*n).map_err(|_| {
                CryptoStatsError::InvalidArgument(format!("year {} is out of range", n))
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// YearlyQuery
// ---------------------------------------------------------------------------

/// Query interface for statistics computed over one calendar year.
pub struct YearlyQuery<'a> {
    table: &'a Table,
}

impl<'a> YearlyQuery<'a> {
    /// Create a new `YearlyQuery` bound to the given table.
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    fn coins_in(&self, year: i32) -> Vec<CoinSeries<'a>> {
        let coins = group_by_coin(self.table.in_year(year));
        tracing::debug!(year, coins = coins.len(), "grouped rows for year");
        coins
    }

    fn coins_in_non_empty(&self, year: i32) -> Result<Vec<CoinSeries<'a>>> {
        let coins = self.coins_in(year);
        if coins.is_empty() {
            return Err(CryptoStatsError::NoDataFound(format!(
                "No data found for year {}.",
                year
            )));
        }
        Ok(coins)
    }

    // -- Top movers --------------------------------------------------------

    /// The coins with the largest absolute price swing over the year.
    ///
    /// The swing is the percent change between each coin's chronologically
    /// first and last price. Coins whose first price is zero have no defined
    /// change and are not ranked. At most [`TOP_MOVERS_LIMIT`] coins are
    /// returned, by descending absolute change; ties keep encounter order.
    pub fn top_movers(&self, year: i32) -> Result<YearlyRankingResult> {
        let coins = self.coins_in_non_empty(year)?;

        let mut ranked: Vec<(f64, &CoinSeries<'a>)> = coins
            .iter()
            .filter_map(|c| match c.percent_change() {
                Some(change) => Some((change, c)),
                None => {
                    tracing::debug!(coin = c.coin_id, year, "skipping coin with zero first price");
                    None
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.0.abs().total_cmp(&a.0.abs()));
        ranked.truncate(TOP_MOVERS_LIMIT);

        Ok(YearlyRankingResult {
            year,
            top_n: ranked
                .into_iter()
                .map(|(change, c)| CoinMove {
                    coin_id: c.coin_id.to_string(),
                    percent_change: change,
                    price_series: c.price_series(),
                })
                .collect(),
        })
    }

    // -- Volatility --------------------------------------------------------

    /// Sample standard deviation per coin, for coins with two or more rows.
    fn deviations(&self, year: i32) -> Result<Vec<(f64, CoinSeries<'a>)>> {
        let coins = self.coins_in_non_empty(year)?;
        let deviations: Vec<(f64, CoinSeries<'a>)> = coins
            .into_iter()
            .filter_map(|c| c.std_dev().map(|sd| (sd, c)))
            .map(|(sd, c)| {
                let sd = ensure_finite(sd, &format!("standard deviation of {}", c.coin_id))?;
                Ok::<_, CryptoStatsError>((sd, c))
            })
            .collect::<Result<_>>()?;

        if deviations.is_empty() {
            return Err(CryptoStatsError::InvalidComputation(format!(
                "no coin has at least two observations in {}; standard deviation is undefined",
                year
            )));
        }
        Ok(deviations)
    }

    /// The coins with the highest and the lowest price standard deviation.
    ///
    /// Coins with a single observation in the year are excluded. Ties go to
    /// the coin encountered first. A deviation too large for `f64` is an
    /// [`CryptoStatsError::InvalidComputation`] rather than an infinite value.
    pub fn volatility_extremes(&self, year: i32) -> Result<VolatilityExtremesResult> {
        let deviations = self.deviations(year)?;

        let (most_volatile, most_stable) = extremes(&deviations)
            .ok_or_else(|| CryptoStatsError::InvalidComputation("empty deviation set".into()))?;

        Ok(VolatilityExtremesResult {
            year,
            most_volatile: volatility(most_volatile),
            most_stable: volatility(most_stable),
        })
    }

    // -- Global mean -------------------------------------------------------

    /// Per-coin mean prices and their unweighted mean.
    fn coin_means(&self, year: i32) -> Result<(f64, Vec<(f64, CoinSeries<'a>)>)> {
        let means: Vec<(f64, CoinSeries<'a>)> = self
            .coins_in(year)
            .into_iter()
            .filter_map(|c| c.mean_price().map(|m| (m, c)))
            .map(|(m, c)| {
                let m = ensure_finite(m, &format!("mean price of {}", c.coin_id))?;
                Ok::<_, CryptoStatsError>((m, c))
            })
            .collect::<Result<_>>()?;

        // Mean of means: every coin weighs the same however many rows it has
        let per_coin: Vec<f64> = means.iter().map(|(m, _)| *m).collect();
        let global_mean = ensure_finite(mean(&per_coin).unwrap_or(0.0), "global mean")?;
        Ok((global_mean, means))
    }

    /// Coins whose mean price in the year is strictly above the global mean.
    ///
    /// The global mean is the average of the per-coin means, not of all
    /// rows. A year without data yields a global mean of `0.0` and no coins.
    pub fn above_global_mean(&self, year: i32) -> Result<AboveMeanResult> {
        let (global_mean, means) = self.coin_means(year)?;
        Ok(AboveMeanResult {
            year,
            global_mean,
            coins: above(global_mean, &means),
        })
    }

    // -- Overview ----------------------------------------------------------

    /// The most stable coin together with the above-global-mean coins.
    pub fn overview(&self, year: i32) -> Result<YearOverviewResult> {
        let deviations = self.deviations(year)?;
        let (_, (std_dev, stable)) = extremes(&deviations)
            .ok_or_else(|| CryptoStatsError::InvalidComputation("empty deviation set".into()))?;

        let (global_mean, means) = self.coin_means(year)?;

        Ok(YearOverviewResult {
            year,
            most_stable: CoinDeviation {
                coin_id: stable.coin_id.to_string(),
                std_dev: *std_dev,
            },
            global_mean,
            coins: above(global_mean, &means),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Scored<'s, 'a> = &'s (f64, CoinSeries<'a>);

/// `(max, min)` by score; the first encountered wins a tie.
fn extremes<'s, 'a>(scored: &'s [(f64, CoinSeries<'a>)]) -> Option<(Scored<'s, 'a>, Scored<'s, 'a>)> {
    let mut iter = scored.iter();
    let first = iter.next()?;
    let (mut max, mut min) = (first, first);
    for item in iter {
        if item.0 > max.0 {
            max = item;
        }
        if item.0 < min.0 {
            min = item;
        }
    }
    Some((max, min))
}

fn volatility((std_dev, series): Scored<'_, '_>) -> CoinVolatility {
    CoinVolatility {
        coin_id: series.coin_id.to_string(),
        std_dev: *std_dev,
        price_series: series.price_series(),
    }
}

fn above(global_mean: f64, means: &[(f64, CoinSeries<'_>)]) -> Vec<CoinMean> {
    means
        .iter()
        .filter(|(m, _)| *m > global_mean)
        .map(|(m, c)| CoinMean {
            coin_id: c.coin_id.to_string(),
            mean_price: *m,
            price_series: c.price_series(),
        })
        .collect()
}
