//! Per-index backtest table export.
//!
//! One row per price index; undefined values are written as empty cells.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SmatrendError;
use crate::domain::metrics::Metrics;
use crate::ports::report_port::ReportPort;

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.6}", v)).unwrap_or_default()
}

fn csv_error(e: csv::Error) -> SmatrendError {
    SmatrendError::Render {
        reason: format!("CSV write error: {}", e),
    }
}

pub fn header(result: &BacktestResult) -> Vec<String> {
    let mut columns = vec!["date".to_string(), "price".to_string()];
    columns.extend(
        result
            .indicators
            .series()
            .iter()
            .map(|s| s.indicator_type.to_string().to_lowercase()),
    );
    columns.extend(
        [
            "position",
            "log_return",
            "cumulative_market_return",
            "strategy_return",
            "cumulative_strategy_return",
        ]
        .map(String::from),
    );
    columns
}

pub fn write_table<W: std::io::Write>(result: &BacktestResult, out: W) -> Result<(), SmatrendError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(header(result)).map_err(csv_error)?;

    for (i, point) in result.series.points().iter().enumerate() {
        let row = result.indicators.row(i);
        let ret = &result.returns[i];
        wtr.write_record([
            point.date.to_string(),
            format!("{:.6}", point.price),
            cell(row.fast.as_option()),
            cell(row.medium.as_option()),
            cell(row.slow.as_option()),
            result.positions[i].value().to_string(),
            cell(ret.log_return),
            cell(Some(ret.cumulative_market)),
            cell(ret.strategy_return),
            cell(Some(ret.cumulative_strategy)),
        ])
        .map_err(csv_error)?;
    }

    wtr.flush()?;
    Ok(())
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        _metrics: &Metrics,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, SmatrendError> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(format!("{}_backtest.csv", result.ticker().to_uppercase()));
        let file = fs::File::create(&path)?;
        write_table(result, file)?;
        info!(path = %path.display(), rows = result.len(), "wrote backtest table");
        Ok(vec![path])
    }
}
