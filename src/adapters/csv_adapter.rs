//! CSV file price adapter.
//!
//! Reads `<base_path>/<TICKER>.csv`. The `date` and `close` columns are
//! located by header name (case-insensitive), so both a minimal
//! `date,close` file and a full `Date,Open,High,Low,Close,Adj Close,Volume`
//! export load without changes. Only the leading `YYYY-MM-DD` of the date
//! cell is read, so timestamped exports such as `2020-01-02 00:00:00-05:00`
//! load too.

use crate::domain::config_validation::DATE_FORMAT;
use crate::domain::error::SmatrendError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker.to_uppercase()))
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, SmatrendError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| SmatrendError::DataSource {
            reason: format!("missing {} column", name),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, SmatrendError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| SmatrendError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| SmatrendError::DataSource {
            reason: format!("CSV header error: {}", e),
        })?;
        let date_col = column_index(headers, "date")?;
        let close_col = column_index(headers, "close")?;

        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SmatrendError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).unwrap_or_default().trim();
            let day = date_str.get(..10).unwrap_or(date_str);
            let date = NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|e| {
                SmatrendError::DataSource {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            if date < start_date {
                continue;
            }

            let close_str = record.get(close_col).unwrap_or_default().trim();
            // Blank closes mark non-trading rows in some exports.
            if close_str.is_empty() || close_str.eq_ignore_ascii_case("null") {
                continue;
            }
            let price: f64 = close_str.parse().map_err(|e| SmatrendError::DataSource {
                reason: format!("invalid close value '{}': {}", close_str, e),
            })?;

            points.push(PricePoint { date, price });
        }

        points.sort_by_key(|p| p.date);
        info!(
            ticker,
            rows = points.len(),
            path = %path.display(),
            "loaded price history"
        );
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        fs::write(
            path.join("GOOG.csv"),
            "date,close\n\
             2024-01-17,115.0\n\
             2024-01-15,105.0\n\
             2024-01-16,110.0\n",
        )
        .unwrap();
        fs::write(
            path.join("MSFT.csv"),
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2024-01-15,100.0,110.0,90.0,105.5,105.0,50000\n\
             2024-01-16,105.0,115.0,100.0,,,0\n\
             2024-01-17,110.0,120.0,105.0,112.25,112.0,55000\n",
        )
        .unwrap();
        fs::write(
            path.join("AAPL.csv"),
            "Date,Open,High,Low,Close,Volume,Dividends,Stock Splits\n\
             2024-01-15 00:00:00-05:00,180.0,182.0,179.0,181.5,1000,0.0,0.0\n\
             2024-01-16 00:00:00-05:00,181.5,184.0,181.0,183.25,1000,0.0,0.0\n",
        )
        .unwrap();
        fs::write(path.join("BAD.csv"), "date,open\n2024-01-15,1.0\n").unwrap();
        fs::write(path.join("JUNK.csv"), "date,close\n15/01/2024,1.0\n").unwrap();

        (dir, path)
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn fetch_prices_returns_sorted_closes() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let points = adapter.fetch_prices("GOOG", d(1)).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], PricePoint::new(d(15), 105.0));
        assert_eq!(points[2], PricePoint::new(d(17), 115.0));
    }

    #[test]
    fn fetch_prices_filters_by_start_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let points = adapter.fetch_prices("GOOG", d(16)).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, d(16));
    }

    #[test]
    fn ticker_lookup_is_case_insensitive() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert_eq!(adapter.fetch_prices("goog", d(1)).unwrap().len(), 3);
    }

    #[test]
    fn full_export_uses_close_column_and_skips_blanks() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let points = adapter.fetch_prices("MSFT", d(1)).unwrap();
        assert_eq!(
            points,
            vec![PricePoint::new(d(15), 105.5), PricePoint::new(d(17), 112.25)]
        );
    }

    #[test]
    fn timestamped_dates_use_leading_day() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let points = adapter.fetch_prices("AAPL", d(1)).unwrap();
        assert_eq!(
            points,
            vec![PricePoint::new(d(15), 181.5), PricePoint::new(d(16), 183.25)]
        );
    }

    #[test]
    fn unparseable_date_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch_prices("JUNK", d(1)).unwrap_err();
        assert!(matches!(err, SmatrendError::DataSource { .. }));
    }

    #[test]
    fn missing_file_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch_prices("XYZ", d(1)).unwrap_err();
        assert!(matches!(err, SmatrendError::DataSource { .. }));
    }

    #[test]
    fn missing_close_column_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch_prices("BAD", d(1)).unwrap_err();
        assert!(
            matches!(err, SmatrendError::DataSource { reason } if reason == "missing close column")
        );
    }
}
