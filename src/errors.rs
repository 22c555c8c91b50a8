//! Errors
//!
//! Custom error types used throughout the `drift_report` crate.
use thiserror::Error;

/// Errors that can occur while building or serving a drift report.
#[derive(Debug, Error)]
pub enum DriftError {
    /// Dataset download failed.
    #[error("Unable to download dataset: {0}")]
    Download(#[from] reqwest::Error),
    /// The downloaded archive could not be opened or lacks the requested member.
    #[error("Unable to read dataset archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// The CSV table is malformed.
    #[error("Unable to parse dataset table: {0}")]
    Csv(#[from] csv::Error),
    /// Filesystem read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Report summary could not be serialized.
    #[error("Unable to serialize report summary: {0}")]
    Json(#[from] serde_json::Error),
    /// A column required by the pipeline is not present in the table.
    #[error("Column {0} is not present in the table.")]
    MissingColumn(String),
    /// A cell could not be parsed as a number. Column, row, raw value.
    #[error("Column {0} row {1}: unable to parse {2} as a number.")]
    ParseValue(String, usize, String),
    /// A cell of the index column could not be parsed as a timestamp. Row, raw value.
    #[error("Index row {0}: unable to parse {1} as a timestamp.")]
    ParseTimestamp(usize, String),
    /// NaN or infinite value found in a column used for fitting.
    #[error("Column {0} contains a non-finite value at row {1}.")]
    NonFiniteValue(String, usize),
    /// Nothing to fit on.
    #[error("The training window contains no rows.")]
    EmptyTrainingSet,
    /// Inputs that must be aligned have different lengths. Name, expected, found.
    #[error("Length mismatch for {0}: expected {1}, found {2}.")]
    LengthMismatch(String, usize, usize),
    /// A chart could not be drawn.
    #[error("Unable to render chart {0}: {1}")]
    Render(String, String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
}
