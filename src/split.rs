//! Window Splitter
//!
//! Purely positional slicing of the table on its timestamp index. Ranges are not
//! validated against each other: overlapping ranges give windows that share rows.
use crate::data::{ObservationTable, TimeRange};
use log::{info, warn};

/// Slice the reference and current windows out of `table`.
///
/// Both windows are independent copies, neither aliases the other nor the table.
pub fn split(
    table: &ObservationTable,
    reference: &TimeRange,
    current: &TimeRange,
) -> (ObservationTable, ObservationTable) {
    if reference.overlaps(current) {
        warn!("Reference and current ranges overlap, the windows will share rows.");
    }
    let reference_window = table.slice(reference);
    let current_window = table.slice(current);
    info!(
        "Split {} rows into reference ({} rows) and current ({} rows)",
        table.rows(),
        reference_window.rows(),
        current_window.rows()
    );
    (reference_window, current_window)
}
