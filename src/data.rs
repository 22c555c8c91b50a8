//! Data
//!
//! The time-indexed observation table read from the dataset, the inclusive time
//! ranges used to slice it, and the column major matrix handed to the regressor.
use crate::constants::{DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::errors::DriftError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Contiguous Column Major Matrix data container.
///
/// Holds a borrowed dense block of values laid out column after column, so a
/// single feature can be sliced without copying.
///
/// # Type Parameters
/// * `T` - The numeric type of the data (e.g., `f32`, `f64`).
pub struct Matrix<'a, T> {
    /// The raw data stored in a single slice.
    pub data: &'a [T],
    /// Indices into the data row-wise.
    pub index: Vec<usize>,
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
}

impl<'a, T> Matrix<'a, T> {
    /// Create a new Matrix.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Self {
        Matrix {
            data,
            index: (0..rows).collect(),
            rows,
            cols,
        }
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[j * self.rows + i]
    }

    /// Get an entire column in the matrix.
    ///
    /// * `col` - The index of the column to get.
    pub fn get_col(&self, col: usize) -> &[T] {
        let start = col * self.rows;
        &self.data[start..start + self.rows]
    }
}

impl<'a, T> Matrix<'a, T>
where
    T: Copy,
{
    /// Get a row of the data as a vector.
    pub fn get_row(&self, row: usize) -> Vec<T> {
        self.data.iter().skip(row).step_by(self.rows.max(1)).copied().collect()
    }
}

/// Parse a timestamp written either as a date (midnight) or as a full date and time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Time range, inclusive on both ends.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        TimeRange { start, end }
    }

    /// Build a range from two literal timestamps.
    pub fn parse(start: &str, end: &str) -> Result<Self, DriftError> {
        let start_ts = parse_timestamp(start).ok_or_else(|| DriftError::ParseTimestamp(0, start.to_string()))?;
        let end_ts = parse_timestamp(end).ok_or_else(|| DriftError::ParseTimestamp(0, end.to_string()))?;
        Ok(TimeRange::new(start_ts, end_ts))
    }

    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        self.start <= *ts && *ts <= self.end
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Table of numeric columns indexed by timestamp.
///
/// The index is kept sorted; duplicate timestamps are allowed and keep the
/// order in which they were read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObservationTable {
    timestamps: Vec<NaiveDateTime>,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl ObservationTable {
    /// Create a table, sorting rows by timestamp.
    ///
    /// * `timestamps` - The index values, one per row.
    /// * `columns` - Named columns, each with one value per row.
    pub fn new(timestamps: Vec<NaiveDateTime>, columns: Vec<(String, Vec<f64>)>) -> Result<Self, DriftError> {
        let rows = timestamps.len();
        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (name, col) in columns {
            if col.len() != rows {
                return Err(DriftError::LengthMismatch(name, rows, col.len()));
            }
            names.push(name);
            values.push(col);
        }

        // Stable, so rows sharing a timestamp stay in file order.
        let mut order: Vec<usize> = (0..rows).collect();
        order.sort_by_key(|&i| timestamps[i]);
        let already_sorted = order.iter().enumerate().all(|(pos, &i)| pos == i);
        if already_sorted {
            return Ok(ObservationTable {
                timestamps,
                names,
                columns: values,
            });
        }

        Ok(ObservationTable {
            timestamps: order.iter().map(|&i| timestamps[i]).collect(),
            names,
            columns: values
                .iter()
                .map(|col| order.iter().map(|&i| col[i]).collect())
                .collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Result<&[f64], DriftError> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| DriftError::MissingColumn(name.to_string()))
    }

    /// Copy the rows whose timestamp falls in `range` into a new table.
    pub fn slice(&self, range: &TimeRange) -> ObservationTable {
        let lo = self.timestamps.partition_point(|ts| *ts < range.start);
        let hi = self.timestamps.partition_point(|ts| *ts <= range.end).max(lo);
        ObservationTable {
            timestamps: self.timestamps[lo..hi].to_vec(),
            names: self.names.clone(),
            columns: self.columns.iter().map(|col| col[lo..hi].to_vec()).collect(),
        }
    }

    /// Gather the named columns into a column major buffer suitable for [`Matrix`].
    ///
    /// Every value must be finite, the regressor has no notion of missing data.
    pub fn feature_data(&self, features: &[String]) -> Result<Vec<f64>, DriftError> {
        let mut data = Vec::with_capacity(self.rows() * features.len());
        for name in features {
            let col = self.column(name)?;
            if let Some(row) = col.iter().position(|v| !v.is_finite()) {
                return Err(DriftError::NonFiniteValue(name.clone(), row));
            }
            data.extend_from_slice(col);
        }
        Ok(data)
    }
}
