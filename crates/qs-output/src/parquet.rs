//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `events.parquet`
//! - `tick_summaries.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{StringBuilder, UInt16Builder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{EventRow, OutputError, OutputResult, TickSummaryRow};

fn event_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick",     DataType::UInt64, false),
        Field::new("type",     DataType::Utf8,   false),
        Field::new("agent_id", DataType::UInt32, false),
        Field::new("link_id",  DataType::UInt32, false),
        Field::new("mode",     DataType::Utf8,   true),
        Field::new("activity", DataType::UInt16, true),
    ]))
}

fn summary_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick",       DataType::UInt64, false),
        Field::new("departures", DataType::UInt64, false),
        Field::new("arrivals",   DataType::UInt64, false),
        Field::new("in_network", DataType::UInt64, false),
        Field::new("waiting",    DataType::UInt64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes simulation output to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    events:         Option<ArrowWriter<File>>,
    summaries:      Option<ArrowWriter<File>>,
    event_schema:   Arc<Schema>,
    summary_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let event_schema = event_schema();
        let summary_schema = summary_schema();

        let events = ArrowWriter::try_new(
            File::create(dir.join("events.parquet"))?,
            Arc::clone(&event_schema),
            Some(snappy_props()),
        )?;
        let summaries = ArrowWriter::try_new(
            File::create(dir.join("tick_summaries.parquet"))?,
            Arc::clone(&summary_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            events: Some(events),
            summaries: Some(summaries),
            event_schema,
            summary_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.events.as_mut() else {
            return Err(OutputError::Closed { file: "events.parquet" });
        };

        let mut ticks      = UInt64Builder::new();
        let mut kinds      = StringBuilder::new();
        let mut agents     = UInt32Builder::new();
        let mut links      = UInt32Builder::new();
        let mut modes      = StringBuilder::new();
        let mut activities = UInt16Builder::new();

        for row in rows {
            ticks.append_value(row.tick);
            kinds.append_value(row.kind);
            agents.append_value(row.agent_id);
            links.append_value(row.link_id);
            modes.append_option(row.mode);
            activities.append_option(row.activity);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.event_schema),
            vec![
                Arc::new(ticks.finish()),
                Arc::new(kinds.finish()),
                Arc::new(agents.finish()),
                Arc::new(links.finish()),
                Arc::new(modes.finish()),
                Arc::new(activities.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        let Some(writer) = self.summaries.as_mut() else {
            return Err(OutputError::Closed { file: "tick_summaries.parquet" });
        };

        let mut columns: [UInt64Builder; 5] = Default::default();
        for (builder, value) in columns
            .iter_mut()
            .zip([row.tick, row.departures, row.arrivals, row.in_network, row.waiting])
        {
            builder.append_value(value);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.summary_schema),
            columns
                .iter_mut()
                .map(|b| Arc::new(b.finish()) as arrow::array::ArrayRef)
                .collect(),
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.events.take() {
            w.close()?;
        }
        if let Some(w) = self.summaries.take() {
            w.close()?;
        }
        Ok(())
    }
}
