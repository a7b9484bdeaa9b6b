//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::SmatrendError;
use crate::domain::indicator::SmaWindows;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const KNOWN_SOURCES: [&str; 2] = ["csv", "yahoo"];

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SmatrendError> {
    validate_ticker(config)?;
    validate_start_date(config)?;
    validate_source(config)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), SmatrendError> {
    let windows = read_windows(config)?;
    if windows.fast >= windows.medium {
        return Err(SmatrendError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "fast".to_string(),
            reason: "fast window must be shorter than medium window".to_string(),
        });
    }
    if windows.medium >= windows.slow {
        return Err(SmatrendError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "medium".to_string(),
            reason: "medium window must be shorter than slow window".to_string(),
        });
    }
    Ok(())
}

/// Window lengths from `[indicators]`, defaulting to 20/50/200.
pub fn read_windows(config: &dyn ConfigPort) -> Result<SmaWindows, SmatrendError> {
    let defaults = SmaWindows::default();
    Ok(SmaWindows {
        fast: read_window(config, "fast", defaults.fast)?,
        medium: read_window(config, "medium", defaults.medium)?,
        slow: read_window(config, "slow", defaults.slow)?,
    })
}

fn read_window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, SmatrendError> {
    let value = config.get_int("indicators", key, default as i64)?;
    if value < 1 {
        return Err(SmatrendError::ConfigInvalid {
            section: "indicators".to_string(),
            key: key.to_string(),
            reason: format!("{} window must be at least 1", key),
        });
    }
    Ok(value as usize)
}

fn validate_ticker(config: &dyn ConfigPort) -> Result<(), SmatrendError> {
    match config.get_string("backtest", "ticker") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SmatrendError::ConfigMissing {
            section: "backtest".to_string(),
            key: "ticker".to_string(),
        }),
    }
}

fn validate_start_date(config: &dyn ConfigPort) -> Result<(), SmatrendError> {
    let value = config.get_string("backtest", "start_date");
    parse_date(value.as_deref(), "start_date").map(|_| ())
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, SmatrendError> {
    match value {
        None => Err(SmatrendError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => {
            NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
                SmatrendError::ConfigInvalid {
                    section: "backtest".to_string(),
                    key: field.to_string(),
                    reason: format!("invalid {} format, expected YYYY-MM-DD", field),
                }
            })
        }
    }
}

fn validate_source(config: &dyn ConfigPort) -> Result<(), SmatrendError> {
    let source = config
        .get_string("backtest", "source")
        .unwrap_or_else(|| "csv".to_string());
    if !KNOWN_SOURCES.contains(&source.trim().to_lowercase().as_str()) {
        return Err(SmatrendError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "source".to_string(),
            reason: format!("unknown source '{}', expected csv or yahoo", source),
        });
    }
    Ok(())
}
