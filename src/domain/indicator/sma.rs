//! Simple Moving Average.
//!
//! SMA(n)[i] = sum(P[i-j] for j in 0..n) / n
//! Warmup: first (n-1) values are undefined. n == 0 is undefined everywhere.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_sma(prices: &[f64], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(prices.len());

    if period == 0 {
        values.resize(prices.len(), IndicatorValue::Undefined);
        return IndicatorSeries {
            indicator_type: IndicatorType::Sma(period),
            values,
        };
    }

    let mut window_sum = 0.0_f64;
    for (i, &price) in prices.iter().enumerate() {
        window_sum += price;
        if i >= period {
            window_sum -= prices[i - period];
        }

        if i + 1 >= period {
            values.push(IndicatorValue::Defined(window_sum / period as f64));
        } else {
            values.push(IndicatorValue::Undefined);
        }
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn defined(series: &IndicatorSeries, i: usize) -> f64 {
        series.values[i]
            .as_option()
            .unwrap_or_else(|| panic!("value at {} is undefined", i))
    }

    #[test]
    fn sma_warmup() {
        let series = calculate_sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        assert_eq!(series.len(), 5);
        assert!(!series.values[0].is_defined());
        assert!(!series.values[1].is_defined());
        assert!(series.values[2].is_defined());
        assert!(series.values[3].is_defined());
        assert!(series.values[4].is_defined());
    }

    #[test]
    fn sma_basic_calculation() {
        let series = calculate_sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        assert_relative_eq!(defined(&series, 2), 20.0);
        assert_relative_eq!(defined(&series, 3), 30.0);
        assert_relative_eq!(defined(&series, 4), 40.0);
    }

    #[test]
    fn sma_period_one_is_identity() {
        let prices = [3.0, 1.0, 4.0, 1.0, 5.0];
        let series = calculate_sma(&prices, 1);
        for (i, &p) in prices.iter().enumerate() {
            assert_relative_eq!(defined(&series, i), p);
        }
    }

    #[test]
    fn sma_window_longer_than_series_is_all_undefined() {
        let series = calculate_sma(&[1.0, 2.0, 3.0], 200);
        assert_eq!(series.len(), 3);
        assert!(series.values.iter().all(|v| !v.is_defined()));
    }

    #[test]
    fn sma_zero_period_is_all_undefined() {
        let series = calculate_sma(&[1.0, 2.0], 0);
        assert_eq!(series.len(), 2);
        assert!(series.values.iter().all(|v| !v.is_defined()));
    }

    #[test]
    fn sma_empty_input() {
        let series = calculate_sma(&[], 20);
        assert!(series.is_empty());
    }

    #[test]
    fn sma_rolling_matches_direct_mean_over_long_series() {
        let prices: Vec<f64> = (0..400)
            .map(|i| 100.0 + (i as f64 * 0.37).sin() * 15.0)
            .collect();
        let series = calculate_sma(&prices, 50);

        for i in 49..prices.len() {
            let direct = prices[i + 1 - 50..=i].iter().sum::<f64>() / 50.0;
            assert_relative_eq!(defined(&series, i), direct, epsilon = 1e-9);
        }
    }

    #[test]
    fn sma_indicator_type() {
        let series = calculate_sma(&[1.0], 50);
        assert_eq!(series.indicator_type, IndicatorType::Sma(50));
    }
}
