//! Local CSV series loader (DRAM, NAND, book-to-bill).
//!
//! Files have a `Date` column plus one or more numeric columns. Loading never
//! fails outward: an unreadable file, a missing column or a malformed row all
//! yield an empty series and a warning in the log.

use super::provider::DataError;
use crate::domain::{Observation, ObservationSeries};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, warn};

const DATE_COLUMN: &str = "Date";
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Load `value_column` from the CSV at `path`, sorted ascending by date.
///
/// Blank cells become `NaN`. Any read or parse failure returns an empty
/// series named after the column.
pub fn load_csv_series(path: impl AsRef<Path>, value_column: &str) -> ObservationSeries {
    let path = path.as_ref();
    match read_csv_series(path, value_column) {
        Ok(series) => {
            debug!(path = %path.display(), column = value_column, rows = series.len(), "loaded csv series");
            series
        }
        Err(e) => {
            warn!(path = %path.display(), column = value_column, error = %e, "csv series unavailable");
            ObservationSeries::empty(value_column)
        }
    }
}

fn read_csv_series(path: &Path, value_column: &str) -> Result<ObservationSeries, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::Csv(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| DataError::Csv(e.to_string()))?
        .clone();
    let date_idx = column_index(&headers, DATE_COLUMN)?;
    let value_idx = column_index(&headers, value_column)?;

    let mut points = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| DataError::Csv(e.to_string()))?;
        let line = row + 2;

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = parse_date(raw_date)
            .ok_or_else(|| DataError::Csv(format!("line {line}: bad date {raw_date:?}")))?;

        let raw_value = record.get(value_idx).unwrap_or_default();
        let value = if raw_value.is_empty() {
            f64::NAN
        } else {
            raw_value
                .parse::<f64>()
                .map_err(|_| DataError::Csv(format!("line {line}: bad value {raw_value:?}")))?
        };

        points.push(Observation { date, value });
    }

    Ok(ObservationSeries::new(value_column, points))
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DataError::Csv(format!("missing column {name:?}")))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
