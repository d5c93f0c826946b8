//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `events` and `tick_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::{EventRow, OutputError, OutputResult, TickSummaryRow};
use crate::writer::OutputWriter;

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS events (
                 seq      INTEGER PRIMARY KEY,
                 tick     INTEGER NOT NULL,
                 type     TEXT    NOT NULL,
                 agent_id INTEGER NOT NULL,
                 link_id  INTEGER NOT NULL,
                 mode     TEXT,
                 activity INTEGER
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick       INTEGER PRIMARY KEY,
                 departures INTEGER NOT NULL,
                 arrivals   INTEGER NOT NULL,
                 in_network INTEGER NOT NULL,
                 waiting    INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }

    fn ensure_open(&self) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Closed { file: "output.db" });
        }
        Ok(())
    }
}

impl OutputWriter for SqliteWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        self.ensure_open()?;
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO events (tick, type, agent_id, link_id, mode, activity) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.kind,
                    row.agent_id,
                    row.link_id,
                    row.mode,
                    row.activity,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.ensure_open()?;
        self.conn.execute(
            "INSERT INTO tick_summaries (tick, departures, arrivals, in_network, waiting) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                row.tick as i64,
                row.departures as i64,
                row.arrivals as i64,
                row.in_network as i64,
                row.waiting as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
