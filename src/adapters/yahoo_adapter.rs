//! Yahoo Finance price adapter.
//!
//! Fetches daily closes from Yahoo's v8 chart API, from the start date through
//! the current time. A failed request is returned to the caller as-is; there
//! is no retry, so the backtest aborts rather than running on partial data.

use crate::domain::error::SmatrendError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, SmatrendError> {
        Self::with_base_url("https://query2.finance.yahoo.com")
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, SmatrendError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| SmatrendError::DataSource {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, ticker: &str, start: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).map_or(0, |dt| dt.and_utc().timestamp());
        let end_ts = Utc::now().timestamp();
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url,
            ticker.to_uppercase(),
            start_ts,
            end_ts
        )
    }
}

/// Round to cents, matching the precision quote providers display.
fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

fn parse_response(ticker: &str, resp: ChartResponse) -> Result<Vec<PricePoint>, SmatrendError> {
    let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
        Some(err) if err.code == "Not Found" => SmatrendError::NoData {
            ticker: ticker.to_string(),
        },
        Some(err) => SmatrendError::DataSource {
            reason: format!("{}: {}", err.code, err.description),
        },
        None => SmatrendError::DataSource {
            reason: "empty result with no error".into(),
        },
    })?;

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| SmatrendError::DataSource {
            reason: "result array is empty".into(),
        })?;

    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| SmatrendError::DataSource {
            reason: "no quote data".into(),
        })?;

    let mut points = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        // null closes are non-trading rows
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };
        let date = chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| SmatrendError::DataSource {
                reason: format!("invalid timestamp: {}", ts),
            })?;
        points.push(PricePoint {
            date,
            price: round_price(close),
        });
    }

    points.sort_by_key(|p| p.date);
    points.dedup_by_key(|p| p.date);
    Ok(points)
}

impl DataPort for YahooAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, SmatrendError> {
        let url = self.chart_url(ticker, start_date);
        debug!(%url, "requesting chart data");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| SmatrendError::DataSource {
                reason: format!("request for {} failed: {}", ticker, e),
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SmatrendError::NoData {
                ticker: ticker.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SmatrendError::DataSource {
                reason: format!("HTTP {} for {}", status, ticker),
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| SmatrendError::DataSource {
            reason: format!("failed to parse response for {}: {}", ticker, e),
        })?;

        let points = parse_response(ticker, chart)?;
        info!(ticker, rows = points.len(), "fetched price history");
        Ok(points)
    }
}
