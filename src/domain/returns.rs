//! Log returns and continuously compounded cumulative returns.
//!
//! log_return[i]      = ln(P[i] / P[i-1]), undefined at i = 0
//! strategy_return[i] = log_return[i] * position[i]
//! cumulative_*[i]    = exp(sum of defined returns up to i)
//!
//! Index 0 contributes nothing to either sum, so both cumulative series
//! start at exactly 1.0.

use crate::domain::error::SmatrendError;
use crate::domain::signal::Position;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnRow {
    pub log_return: Option<f64>,
    pub cumulative_market: f64,
    pub strategy_return: Option<f64>,
    pub cumulative_strategy: f64,
}

pub fn log_returns(prices: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(prices.windows(2).map(|w| Some((w[1] / w[0]).ln())));
    out
}

/// exp of the running sum, skipping undefined entries.
pub fn compound(returns: &[Option<f64>]) -> Vec<f64> {
    returns
        .iter()
        .scan(0.0_f64, |sum, r| {
            *sum += r.unwrap_or(0.0);
            Some(sum.exp())
        })
        .collect()
}

pub fn calculate_returns(
    prices: &[f64],
    positions: &[Position],
) -> Result<Vec<ReturnRow>, SmatrendError> {
    if prices.len() != positions.len() {
        return Err(SmatrendError::LengthMismatch {
            prices: prices.len(),
            positions: positions.len(),
        });
    }

    let market = log_returns(prices);
    let strategy: Vec<Option<f64>> = market
        .iter()
        .zip(positions)
        .map(|(r, p)| r.map(|r| r * p.weight()))
        .collect();

    let cumulative_market = compound(&market);
    let cumulative_strategy = compound(&strategy);

    Ok((0..prices.len())
        .map(|i| ReturnRow {
            log_return: market[i],
            cumulative_market: cumulative_market[i],
            strategy_return: strategy[i],
            cumulative_strategy: cumulative_strategy[i],
        })
        .collect())
}
