//! The `OutputWriter` trait implemented by all backend writers.

use crate::{EventRow, OutputResult, TickSummaryRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`EventOutputObserver::take_error`](crate::EventOutputObserver::take_error).
pub trait OutputWriter {
    /// Write a batch of events, in emission order.
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.  Writes after this fail with [`OutputError::Closed`](crate::OutputError::Closed).
    fn finish(&mut self) -> OutputResult<()>;
}
