//! Moving-average indicators over a price series.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorValue`: a number that may be undefined during the warmup window
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: one indicator value per price index
//! - `IndicatorSet`: the fast/medium/slow SMA triple the classifier reads

pub mod sma;

use std::fmt;

pub use sma::calculate_sma;

/// An indicator reading that is absent until its window is full.
///
/// Comparisons involving `Undefined` are always false; nothing is ever
/// coerced to zero or NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    Defined(f64),
    Undefined,
}

impl IndicatorValue {
    pub fn is_defined(&self) -> bool {
        matches!(self, IndicatorValue::Defined(_))
    }

    pub fn as_option(&self) -> Option<f64> {
        match *self {
            IndicatorValue::Defined(v) => Some(v),
            IndicatorValue::Undefined => None,
        }
    }

    /// Strict greater-than; false when either side is undefined.
    pub fn gt(&self, other: &IndicatorValue) -> bool {
        match (self, other) {
            (IndicatorValue::Defined(a), IndicatorValue::Defined(b)) => a > b,
            _ => false,
        }
    }
}

impl From<Option<f64>> for IndicatorValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(IndicatorValue::Undefined, IndicatorValue::Defined)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA{}", period),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorValue>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> IndicatorValue {
        self.values
            .get(index)
            .copied()
            .unwrap_or(IndicatorValue::Undefined)
    }
}

/// Window lengths for the three moving averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmaWindows {
    pub fast: usize,
    pub medium: usize,
    pub slow: usize,
}

impl Default for SmaWindows {
    fn default() -> Self {
        Self {
            fast: 20,
            medium: 50,
            slow: 200,
        }
    }
}

/// The three SMA readings at one index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub fast: IndicatorValue,
    pub medium: IndicatorValue,
    pub slow: IndicatorValue,
}

#[derive(Debug, Clone)]
pub struct IndicatorSet {
    pub fast: IndicatorSeries,
    pub medium: IndicatorSeries,
    pub slow: IndicatorSeries,
}

impl IndicatorSet {
    /// Each window is computed independently over the same prices.
    pub fn compute(prices: &[f64], windows: &SmaWindows) -> Self {
        Self {
            fast: calculate_sma(prices, windows.fast),
            medium: calculate_sma(prices, windows.medium),
            slow: calculate_sma(prices, windows.slow),
        }
    }

    pub fn len(&self) -> usize {
        self.fast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fast.is_empty()
    }

    pub fn row(&self, index: usize) -> IndicatorRow {
        IndicatorRow {
            fast: self.fast.get(index),
            medium: self.medium.get(index),
            slow: self.slow.get(index),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = IndicatorRow> + '_ {
        (0..self.len()).map(|i| self.row(i))
    }

    pub fn series(&self) -> [&IndicatorSeries; 3] {
        [&self.fast, &self.medium, &self.slow]
    }
}
