//! Backtest pipeline.
//!
//! Runs the fixed stage order over an already-fetched price series:
//! indicators -> positions -> intervals -> returns. Each stage consumes the
//! complete output of the previous one and owns what it produces.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::error::SmatrendError;
use crate::domain::indicator::{IndicatorSet, SmaWindows};
use crate::domain::interval::{self, Intervals};
use crate::domain::price::PriceSeries;
use crate::domain::returns::{self, ReturnRow};
use crate::domain::signal::{self, Position};

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub windows: SmaWindows,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub series: PriceSeries,
    pub indicators: IndicatorSet,
    pub positions: Vec<Position>,
    pub intervals: Intervals,
    pub returns: Vec<ReturnRow>,
}

impl BacktestResult {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn ticker(&self) -> &str {
        self.series.ticker()
    }

    /// Final cumulative market growth factor, 1.0 for an empty series.
    pub fn final_market_return(&self) -> f64 {
        self.returns.last().map_or(1.0, |r| r.cumulative_market)
    }

    /// Final cumulative strategy growth factor, 1.0 for an empty series.
    pub fn final_strategy_return(&self) -> f64 {
        self.returns.last().map_or(1.0, |r| r.cumulative_strategy)
    }

    pub fn cumulative_market(&self) -> Vec<f64> {
        self.returns.iter().map(|r| r.cumulative_market).collect()
    }

    pub fn cumulative_strategy(&self) -> Vec<f64> {
        self.returns.iter().map(|r| r.cumulative_strategy).collect()
    }
}

pub fn run_backtest(
    series: &PriceSeries,
    windows: &SmaWindows,
) -> Result<BacktestResult, SmatrendError> {
    let prices = series.prices();
    let indicators = IndicatorSet::compute(&prices, windows);
    let positions = signal::classify_series(&indicators);
    debug!(
        ticker = series.ticker(),
        bars = prices.len(),
        fast = windows.fast,
        medium = windows.medium,
        slow = windows.slow,
        "classified positions"
    );

    finish(series, indicators, positions)
}

/// Run the interval and return stages against a caller-supplied position
/// sequence, skipping indicator classification. Indicators are still
/// computed with the default windows so charts have something to draw.
pub fn run_with_positions(
    series: &PriceSeries,
    positions: Vec<Position>,
) -> Result<BacktestResult, SmatrendError> {
    let indicators = IndicatorSet::compute(&series.prices(), &SmaWindows::default());
    finish(series, indicators, positions)
}

fn finish(
    series: &PriceSeries,
    indicators: IndicatorSet,
    positions: Vec<Position>,
) -> Result<BacktestResult, SmatrendError> {
    let returns = returns::calculate_returns(&series.prices(), &positions)?;
    let intervals = interval::segment(&positions);
    debug!(
        long = intervals.long.len(),
        short = intervals.short.len(),
        "segmented holding intervals"
    );

    Ok(BacktestResult {
        series: series.clone(),
        indicators,
        positions,
        intervals,
        returns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PricePoint;
    use approx::assert_relative_eq;

    fn series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(start + chrono::Duration::days(i as i64), p))
            .collect();
        PriceSeries::new("TEST", points).unwrap()
    }

    #[test]
    fn empty_series_produces_empty_outputs() {
        let result = run_backtest(&series(&[]), &SmaWindows::default()).unwrap();
        assert!(result.is_empty());
        assert!(result.positions.is_empty());
        assert!(result.returns.is_empty());
        assert!(result.intervals.is_empty());
        assert!(result.indicators.is_empty());
        assert_eq!(result.final_strategy_return(), 1.0);
    }

    #[test]
    fn all_columns_have_price_length() {
        let prices: Vec<f64> = (0..260).map(|i| 100.0 + i as f64).collect();
        let result = run_backtest(&series(&prices), &SmaWindows::default()).unwrap();

        assert_eq!(result.len(), 260);
        assert_eq!(result.positions.len(), 260);
        assert_eq!(result.returns.len(), 260);
        assert_eq!(result.indicators.len(), 260);
    }

    #[test]
    fn steady_uptrend_is_short_then_flat_then_long() {
        let prices: Vec<f64> = (0..260).map(|i| 100.0 + i as f64).collect();
        let result = run_backtest(&series(&prices), &SmaWindows::default()).unwrap();

        // before SMA50 is defined both comparisons are false
        assert_eq!(result.intervals.short_bounds(), vec![(0, 48)]);
        // SMA20 > SMA50 from 49 until SMA200 appears at 199
        assert!(result.positions[49..199].iter().all(|p| p.is_flat()));
        assert_eq!(result.intervals.long_bounds(), vec![(199, 259)]);
    }

    #[test]
    fn forced_positions_scenario() {
        let result = run_with_positions(
            &series(&[100.0, 102.0, 101.0, 105.0, 110.0]),
            vec![
                Position::Flat,
                Position::Long,
                Position::Long,
                Position::Short,
                Position::Short,
            ],
        )
        .unwrap();

        assert_eq!(result.intervals.long_bounds(), vec![(1, 2)]);
        assert_eq!(result.intervals.short_bounds(), vec![(3, 4)]);
        assert_relative_eq!(result.returns[1].log_return.unwrap(), 1.02_f64.ln());
        assert_relative_eq!(result.returns[1].strategy_return.unwrap(), 1.02_f64.ln());
        assert_relative_eq!(
            result.returns[3].strategy_return.unwrap(),
            -(105.0_f64 / 101.0).ln()
        );
    }

    #[test]
    fn forced_positions_length_mismatch_is_error() {
        let err = run_with_positions(&series(&[1.0, 2.0, 3.0]), vec![Position::Flat]).unwrap_err();
        assert!(matches!(err, SmatrendError::LengthMismatch { .. }));
    }

    #[test]
    fn final_returns_track_last_row() {
        let result = run_with_positions(
            &series(&[100.0, 120.0]),
            vec![Position::Flat, Position::Long],
        )
        .unwrap();
        assert_relative_eq!(result.final_market_return(), 1.2, epsilon = 1e-12);
        assert_relative_eq!(result.final_strategy_return(), 1.2, epsilon = 1e-12);
    }
}
