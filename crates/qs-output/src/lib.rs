//! `qs-output`: consumers of the simulation event stream.
//!
//! [`VolumeCounter`] tallies vehicles leaving each link per time bin.
//! [`EventOutputObserver`] writes the full event stream plus tick summaries
//! through one of three backends, selected by Cargo feature:
//!
//! | Feature   | Backend     | Files created                               |
//! |-----------|-------------|---------------------------------------------|
//! | *(none)*  | CSV         | `events.csv`, `tick_summaries.csv`          |
//! | `sqlite`  | SQLite      | `output.db`                                 |
//! | `parquet` | Parquet     | `events.parquet`, `tick_summaries.parquet`  |
//!
//! All backends implement [`OutputWriter`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use qs_output::{CsvWriter, EventOutputObserver, VolumeCounter};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = (EventOutputObserver::new(writer).summary_every(60), VolumeCounter::hourly());
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.0.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod volumes;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::EventOutputObserver;
pub use row::{EventRow, TickSummaryRow};
pub use volumes::VolumeCounter;
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
