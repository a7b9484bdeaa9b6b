//! Summary statistics over a finished backtest.

use crate::domain::backtest::BacktestResult;
use crate::domain::signal::Position;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub market_return: f64,
    pub strategy_return: f64,
    pub annualized_market_return: f64,
    pub annualized_strategy_return: f64,
    pub market_max_drawdown: f64,
    pub strategy_max_drawdown: f64,
    pub long_intervals: usize,
    pub short_intervals: usize,
    pub days_long: usize,
    pub days_short: usize,
    pub days_flat: usize,
    /// Fraction of indices with a non-flat position.
    pub exposure: f64,
}

impl Metrics {
    pub fn compute(result: &BacktestResult) -> Self {
        let market_curve = result.cumulative_market();
        let strategy_curve = result.cumulative_strategy();

        let market_return = result.final_market_return() - 1.0;
        let strategy_return = result.final_strategy_return() - 1.0;

        let periods = result.len().saturating_sub(1);

        let count = |target: Position| result.positions.iter().filter(|&&p| p == target).count();
        let days_long = count(Position::Long);
        let days_short = count(Position::Short);
        let days_flat = count(Position::Flat);

        let exposure = if result.is_empty() {
            0.0
        } else {
            (days_long + days_short) as f64 / result.len() as f64
        };

        Metrics {
            market_return,
            strategy_return,
            annualized_market_return: annualize(result.final_market_return(), periods),
            annualized_strategy_return: annualize(result.final_strategy_return(), periods),
            market_max_drawdown: max_drawdown(&market_curve),
            strategy_max_drawdown: max_drawdown(&strategy_curve),
            long_intervals: result.intervals.long.len(),
            short_intervals: result.intervals.short.len(),
            days_long,
            days_short,
            days_flat,
            exposure,
        }
    }
}

/// Growth factor over `periods` daily steps scaled to a trading year.
pub fn annualize(growth: f64, periods: usize) -> f64 {
    if periods == 0 || growth <= 0.0 || !growth.is_finite() {
        return 0.0;
    }
    let years = periods as f64 / TRADING_DAYS_PER_YEAR;
    growth.powf(1.0 / years) - 1.0
}

/// Largest peak-to-trough decline of a growth curve, as a fraction of the peak.
pub fn max_drawdown(curve: &[f64]) -> f64 {
    let Some(&first) = curve.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &value in curve {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::run_with_positions;
    use crate::domain::price::{PricePoint, PriceSeries};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn result(prices: &[f64], positions: Vec<Position>) -> BacktestResult {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(start + chrono::Duration::days(i as i64), p))
            .collect();
        let series = PriceSeries::new("TEST", points).unwrap();
        run_with_positions(&series, positions).unwrap()
    }

    #[test]
    fn max_drawdown_empty_and_monotonic() {
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(max_drawdown(&[1.0, 1.1, 1.2]), 0.0);
    }

    #[test]
    fn max_drawdown_picks_deepest_trough() {
        let dd = max_drawdown(&[1.0, 1.2, 0.9, 1.5, 1.2]);
        assert_relative_eq!(dd, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn annualize_one_year_is_identity() {
        assert_relative_eq!(annualize(1.1, 252), 0.1, epsilon = 1e-12);
        assert_eq!(annualize(1.1, 0), 0.0);
    }

    #[test]
    fn metrics_count_days_and_intervals() {
        let r = result(
            &[100.0, 102.0, 101.0, 105.0, 110.0],
            vec![
                Position::Flat,
                Position::Long,
                Position::Long,
                Position::Short,
                Position::Short,
            ],
        );
        let m = Metrics::compute(&r);

        assert_eq!(m.days_long, 2);
        assert_eq!(m.days_short, 2);
        assert_eq!(m.days_flat, 1);
        assert_eq!(m.long_intervals, 1);
        assert_eq!(m.short_intervals, 1);
        assert_relative_eq!(m.exposure, 0.8);
        assert_relative_eq!(m.market_return, 0.10, epsilon = 1e-12);
        let expected = (101.0_f64 / 100.0) * (101.0 / 110.0) - 1.0;
        assert_relative_eq!(m.strategy_return, expected, epsilon = 1e-12);
    }

    #[test]
    fn metrics_all_flat() {
        let r = result(&[10.0, 9.0, 8.0], vec![Position::Flat; 3]);
        let m = Metrics::compute(&r);

        assert_eq!(m.strategy_return, 0.0);
        assert_eq!(m.strategy_max_drawdown, 0.0);
        assert_relative_eq!(m.market_max_drawdown, 0.2, epsilon = 1e-12);
        assert_eq!(m.exposure, 0.0);
    }
}
