//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `events.csv`
//! - `tick_summaries.csv`
//!
//! Absent optional columns (`mode`, `activity`) are written as empty fields.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{EventRow, OutputError, OutputResult, TickSummaryRow};
use crate::writer::OutputWriter;

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    events:    Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(["tick", "type", "agent_id", "link_id", "mode", "activity"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "departures", "arrivals", "in_network", "waiting"])?;

        Ok(Self {
            events,
            summaries,
            finished: false,
        })
    }

    fn ensure_open(&self, file: &'static str) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Closed { file });
        }
        Ok(())
    }
}

impl OutputWriter for CsvWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        self.ensure_open("events.csv")?;
        for row in rows {
            self.events.write_record(&[
                row.tick.to_string(),
                row.kind.to_owned(),
                row.agent_id.to_string(),
                row.link_id.to_string(),
                row.mode.unwrap_or_default().to_owned(),
                row.activity.map(|a| a.to_string()).unwrap_or_default(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.ensure_open("tick_summaries.csv")?;
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.departures.to_string(),
            row.arrivals.to_string(),
            row.in_network.to_string(),
            row.waiting.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
