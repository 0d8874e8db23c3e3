//! The readings table offered for download, as a polars `DataFrame` or CSV.

use crate::readings::error::ExportError;
use crate::readings::summary::DEFAULT_UNIT;
use crate::types::reading::Reading;
use chrono::SecondsFormat;
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tokio::task;

pub const TIMESTAMP_COLUMN: &str = "Date & Time";

/// Header of the value column, e.g. "Value (mASD)".
pub fn value_column(unit: &str) -> String {
    format!("Value ({})", unit)
}

/// `{stationId}_{parameter}_readings.csv`
pub fn csv_file_name(station_id: &str, parameter: &str) -> String {
    format!("{}_{}_readings.csv", station_id, parameter)
}

/// Two columns, newest reading first: [`TIMESTAMP_COLUMN`] as RFC 3339 UTC text and the
/// value column named after the first unit found. Missing values stay null.
pub fn readings_table(readings: &[Reading]) -> Result<DataFrame, ExportError> {
    let unit = readings
        .iter()
        .map(|r| r.unit.as_str())
        .find(|unit| !unit.is_empty())
        .unwrap_or(DEFAULT_UNIT);

    let mut rows: Vec<&Reading> = readings.iter().collect();
    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let timestamps: Vec<String> = rows
        .iter()
        .map(|r| r.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
        .collect();
    let values: Vec<Option<f64>> = rows.iter().map(|r| r.value).collect();

    DataFrame::new(vec![
        Column::new(TIMESTAMP_COLUMN.into(), timestamps),
        Column::new(value_column(unit).into(), values),
    ])
    .map_err(ExportError::Table)
}

/// The table as UTF-8 CSV with a header row.
pub fn export_csv(readings: &[Reading]) -> Result<Vec<u8>, ExportError> {
    let mut df = readings_table(readings)?;
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut df)
        .map_err(ExportError::CsvWrite)?;
    Ok(buffer)
}

/// Writes the table to `dir/{stationId}_{parameter}_readings.csv` and returns the path.
/// An existing file of that name is replaced.
pub async fn write_csv(
    dir: &Path,
    station_id: &str,
    parameter: &str,
    readings: &[Reading],
) -> Result<PathBuf, ExportError> {
    let mut df = readings_table(readings)?;
    let path = dir.join(csv_file_name(station_id, parameter));

    let path_buf = path.clone();
    task::spawn_blocking(move || {
        let file = std::fs::File::create(&path_buf)
            .map_err(|e| ExportError::FileWrite(path_buf.clone(), e))?;
        CsvWriter::new(file)
            .include_header(true)
            .finish(&mut df)
            .map_err(ExportError::CsvWrite)?;
        Ok::<(), ExportError>(())
    })
    .await??;

    info!("Wrote {} readings to {}", readings.len(), path.display());
    Ok(path)
}
