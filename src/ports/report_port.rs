//! Report rendering port.

use std::path::{Path, PathBuf};

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SmatrendError;
use crate::domain::metrics::Metrics;

/// Port for consumers of a finished backtest (charts, tables).
pub trait ReportPort {
    /// Write output files under `output_dir`, returning the paths written.
    fn write(
        &self,
        result: &BacktestResult,
        metrics: &Metrics,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, SmatrendError>;
}
