//! SVG chart report adapter.
//!
//! Writes two charts per backtest:
//! - `<ticker>_price.svg`: close prices, the three SMAs, holding intervals shaded
//! - `<ticker>_returns.svg`: cumulative market vs strategy growth, same shading

pub mod chart_svg;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SmatrendError;
use crate::domain::interval::Intervals;
use crate::domain::metrics::Metrics;
use crate::ports::report_port::ReportPort;
use chart_svg::{Band, Chart, ChartSeries, SeriesStyle};

const LONG_COLOR: &str = "green";
const SHORT_COLOR: &str = "red";
const SMA_COLORS: [&str; 3] = ["#ff7f0e", "#2ca02c", "#d62728"];

pub fn interval_bands(intervals: &Intervals) -> Vec<Band> {
    let long = intervals.long.iter().map(|iv| Band {
        start: iv.start,
        end: iv.end,
        color: LONG_COLOR,
    });
    let short = intervals.short.iter().map(|iv| Band {
        start: iv.start,
        end: iv.end,
        color: SHORT_COLOR,
    });
    long.chain(short).collect()
}

fn date_labels(result: &BacktestResult) -> (String, String) {
    result
        .series
        .date_range()
        .map(|(first, last)| (first.to_string(), last.to_string()))
        .unwrap_or_default()
}

pub fn price_chart(result: &BacktestResult) -> String {
    let title = result.ticker().to_uppercase();
    let (x_start_label, x_end_label) = date_labels(result);

    let mut series = vec![ChartSeries {
        label: "Close price".to_string(),
        color: "#1f77b4",
        style: SeriesStyle::Scatter,
        values: result.series.prices().into_iter().map(Some).collect(),
    }];
    for (indicator, color) in result.indicators.series().into_iter().zip(SMA_COLORS) {
        series.push(ChartSeries {
            label: indicator.indicator_type.to_string(),
            color,
            style: SeriesStyle::Line,
            values: indicator.values.iter().map(|v| v.as_option()).collect(),
        });
    }

    chart_svg::render(&Chart {
        title: &title,
        x_start_label,
        x_end_label,
        series,
        bands: interval_bands(&result.intervals),
    })
}

pub fn returns_chart(result: &BacktestResult, metrics: &Metrics) -> String {
    let title = format!(
        "{}  market {:+.1}%  strategy {:+.1}%",
        result.ticker().to_uppercase(),
        metrics.market_return * 100.0,
        metrics.strategy_return * 100.0
    );
    let (x_start_label, x_end_label) = date_labels(result);

    chart_svg::render(&Chart {
        title: &title,
        x_start_label,
        x_end_label,
        series: vec![
            ChartSeries {
                label: "market".to_string(),
                color: "#1f77b4",
                style: SeriesStyle::Line,
                values: result.cumulative_market().into_iter().map(Some).collect(),
            },
            ChartSeries {
                label: "strategy".to_string(),
                color: "#ff7f0e",
                style: SeriesStyle::Line,
                values: result.cumulative_strategy().into_iter().map(Some).collect(),
            },
        ],
        bands: interval_bands(&result.intervals),
    })
}

pub struct SvgReportAdapter;

impl SvgReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for SvgReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        metrics: &Metrics,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, SmatrendError> {
        fs::create_dir_all(output_dir)?;
        let stem = result.ticker().to_uppercase();

        let charts = [
            (format!("{}_price.svg", stem), price_chart(result)),
            (format!("{}_returns.svg", stem), returns_chart(result, metrics)),
        ];

        let mut written: Vec<PathBuf> = Vec::with_capacity(charts.len());
        for (name, svg) in charts {
            let path = output_dir.join(name);
            if let Err(e) = fs::write(&path, svg) {
                // leave no half-written chart pair behind
                for done in &written {
                    let _ = fs::remove_file(done);
                }
                return Err(e.into());
            }
            info!(path = %path.display(), "wrote chart");
            written.push(path);
        }
        Ok(written)
    }
}
