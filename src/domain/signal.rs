//! Position classification from the three moving averages.
//!
//! score = [fast > medium] + [medium > slow] - 1
//!
//! Both comparisons are strict and false when either operand is undefined,
//! so during the warmup window the score is -1 and the classifier reports
//! `Short`. This mirrors the trend rule's literal arithmetic and is kept
//! intentionally; changing it would change backtest results.

use crate::domain::indicator::{IndicatorRow, IndicatorSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Long,
    Flat,
    Short,
}

impl Position {
    pub fn value(self) -> i8 {
        match self {
            Position::Long => 1,
            Position::Flat => 0,
            Position::Short => -1,
        }
    }

    pub fn is_flat(self) -> bool {
        self == Position::Flat
    }

    /// Signal weight applied to a log return.
    pub fn weight(self) -> f64 {
        f64::from(self.value())
    }
}

impl TryFrom<i8> for Position {
    type Error = i8;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Position::Long),
            0 => Ok(Position::Flat),
            -1 => Ok(Position::Short),
            other => Err(other),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Long => write!(f, "long"),
            Position::Flat => write!(f, "flat"),
            Position::Short => write!(f, "short"),
        }
    }
}

pub fn classify(row: &IndicatorRow) -> Position {
    let score = i8::from(row.fast.gt(&row.medium)) + i8::from(row.medium.gt(&row.slow)) - 1;
    match score {
        1 => Position::Long,
        0 => Position::Flat,
        _ => Position::Short,
    }
}

/// One position per index; no lookahead.
pub fn classify_series(indicators: &IndicatorSet) -> Vec<Position> {
    indicators.rows().map(|row| classify(&row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{IndicatorValue, SmaWindows};

    fn row(fast: Option<f64>, medium: Option<f64>, slow: Option<f64>) -> IndicatorRow {
        IndicatorRow {
            fast: fast.into(),
            medium: medium.into(),
            slow: slow.into(),
        }
    }

    #[test]
    fn fully_stacked_uptrend_is_long() {
        assert_eq!(classify(&row(Some(3.0), Some(2.0), Some(1.0))), Position::Long);
    }

    #[test]
    fn fully_stacked_downtrend_is_short() {
        assert_eq!(classify(&row(Some(1.0), Some(2.0), Some(3.0))), Position::Short);
    }

    #[test]
    fn mixed_ordering_is_flat() {
        assert_eq!(classify(&row(Some(3.0), Some(1.0), Some(2.0))), Position::Flat);
        assert_eq!(classify(&row(Some(1.0), Some(3.0), Some(2.0))), Position::Flat);
    }

    #[test]
    fn equal_averages_do_not_count_as_above() {
        assert_eq!(classify(&row(Some(2.0), Some(2.0), Some(2.0))), Position::Short);
        assert_eq!(classify(&row(Some(3.0), Some(2.0), Some(2.0))), Position::Flat);
    }

    #[test]
    fn all_undefined_classifies_short() {
        assert_eq!(classify(&row(None, None, None)), Position::Short);
    }

    #[test]
    fn undefined_slow_with_rising_fast_is_flat() {
        // fast > medium contributes 1, medium > undefined contributes 0
        assert_eq!(classify(&row(Some(3.0), Some(2.0), None)), Position::Flat);
    }

    #[test]
    fn warmup_window_defaults_to_short_then_flat() {
        let prices: Vec<f64> = (1..=6).map(|i| i as f64).collect();
        let windows = SmaWindows {
            fast: 1,
            medium: 2,
            slow: 4,
        };
        let set = IndicatorSet::compute(&prices, &windows);
        let positions = classify_series(&set);

        assert_eq!(positions.len(), 6);
        // index 0: medium undefined -> both false
        assert_eq!(positions[0], Position::Short);
        // index 1..=2: fast > medium, slow undefined
        assert_eq!(positions[1], Position::Flat);
        assert_eq!(positions[2], Position::Flat);
        // index 3+: rising series, fully stacked
        assert_eq!(positions[3], Position::Long);
        assert_eq!(positions[5], Position::Long);
        assert_eq!(set.row(0).medium, IndicatorValue::Undefined);
    }

    #[test]
    fn value_and_try_from_agree() {
        for p in [Position::Long, Position::Flat, Position::Short] {
            assert_eq!(Position::try_from(p.value()), Ok(p));
        }
        assert_eq!(Position::try_from(2), Err(2));
    }

    #[test]
    fn display() {
        assert_eq!(Position::Long.to_string(), "long");
        assert_eq!(Position::Short.to_string(), "short");
    }
}
