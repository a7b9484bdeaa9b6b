//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for smatrend.
#[derive(Debug, thiserror::Error)]
pub enum SmatrendError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no price data for {ticker}")]
    NoData { ticker: String },

    #[error("invalid price {price} for {ticker} on {date}")]
    InvalidPrice {
        ticker: String,
        date: NaiveDate,
        price: f64,
    },

    #[error("dates for {ticker} are not strictly increasing at {date}")]
    UnorderedDates { ticker: String, date: NaiveDate },

    #[error("length mismatch: {prices} prices but {positions} positions")]
    LengthMismatch { prices: usize, positions: usize },

    #[error("render error: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SmatrendError> for std::process::ExitCode {
    fn from(err: &SmatrendError) -> Self {
        let code: u8 = match err {
            SmatrendError::Io(_) | SmatrendError::Render { .. } => 1,
            SmatrendError::ConfigParse { .. }
            | SmatrendError::ConfigMissing { .. }
            | SmatrendError::ConfigInvalid { .. } => 2,
            SmatrendError::DataSource { .. } => 3,
            SmatrendError::InvalidPrice { .. }
            | SmatrendError::UnorderedDates { .. }
            | SmatrendError::LengthMismatch { .. } => 4,
            SmatrendError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
