//! `EventOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use qs_core::Tick;
use qs_events::Event;
use qs_sim::{RunSummary, SimObserver, TickStats};
use tracing::warn;

use crate::row::{EventRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes every event, plus periodic tick summaries,
/// to any [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// Events are buffered for the tick and written as one batch when it ends.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct EventOutputObserver<W: OutputWriter> {
    writer:        W,
    pending:       Vec<EventRow>,
    /// Seconds between summary rows; 0 disables them.
    summary_every: u64,
    written:       u64,
    last_error:    Option<OutputError>,
}

impl<W: OutputWriter> EventOutputObserver<W> {
    /// Create an observer backed by `writer` that writes a summary row
    /// every tick.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending:       Vec::new(),
            summary_every: 1,
            written:       0,
            last_error:    None,
        }
    }

    /// Write summary rows only for ticks divisible by `secs`; 0 disables them.
    pub fn summary_every(mut self, secs: u64) -> Self {
        self.summary_every = secs;
        self
    }

    /// Events handed to the writer so far.
    pub fn events_written(&self) -> u64 {
        self.written
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush_events(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let result = self.writer.write_events(&self.pending);
        if result.is_ok() {
            self.written += self.pending.len() as u64;
        }
        self.pending.clear();
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output writer failed; later errors are dropped");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for EventOutputObserver<W> {
    fn on_event(&mut self, event: &Event) {
        self.pending.push(EventRow::from(event));
    }

    fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
        self.flush_events();
        if self.summary_every > 0 && tick.0.is_multiple_of(self.summary_every) {
            let result = self.writer.write_tick_summary(&TickSummaryRow::new(tick, stats));
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _summary: &RunSummary) {
        // Stuck events arrive after the last tick.
        self.flush_events();
        let result = self.writer.finish();
        self.store_err(result);
    }
}
