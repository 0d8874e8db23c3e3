use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to build readings table")]
    Table(#[source] PolarsError),

    #[error("Failed to serialise readings as CSV")]
    CsvWrite(#[source] PolarsError),

    #[error("I/O error writing CSV file '{0}'")]
    FileWrite(PathBuf, #[source] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
