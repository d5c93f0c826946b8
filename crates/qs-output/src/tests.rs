//! Integration tests for qs-output.

use qs_core::{ActivityId, AgentId, LinkId, Tick, TransportMode};
use qs_events::Event;

use crate::row::{EventRow, TickSummaryRow};

fn departure(tick: u64, agent: u32, link: u32) -> Event {
    Event::Departure { tick: Tick(tick), agent: AgentId(agent), link: LinkId(link), mode: TransportMode::Car }
}

fn left(tick: u64, agent: u32, link: u32) -> Event {
    Event::LinkLeft { tick: Tick(tick), agent: AgentId(agent), link: LinkId(link) }
}

fn sample_rows() -> Vec<EventRow> {
    [
        Event::ActivityEnd { tick: Tick(5), agent: AgentId(0), link: LinkId(3), activity: ActivityId(2) },
        departure(5, 0, 3),
        Event::LinkEntered { tick: Tick(5), agent: AgentId(0), link: LinkId(3) },
    ]
    .iter()
    .map(EventRow::from)
    .collect()
}

fn summary_row(tick: u64) -> TickSummaryRow {
    TickSummaryRow { tick, departures: 2, arrivals: 1, in_network: 40, waiting: 3 }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod row_tests {
    use super::*;

    #[test]
    fn optional_columns_follow_event_kind() {
        let rows = sample_rows();
        assert_eq!(rows[0].kind, "actend");
        assert_eq!(rows[0].activity, Some(2));
        assert_eq!(rows[0].mode, None);
        assert_eq!(rows[1].kind, "departure");
        assert_eq!(rows[1].mode, Some("car"));
        assert_eq!(rows[1].activity, None);
        assert_eq!(rows[2].kind, "entered link");
        assert_eq!((rows[2].tick, rows[2].agent_id, rows[2].link_id), (5, 0, 3));
    }

    #[test]
    fn summary_row_copies_stats() {
        let stats = qs_sim::TickStats { departures: 4, arrivals: 2, in_network: 9, waiting: 1, ..Default::default() };
        let row = TickSummaryRow::new(Tick(60), &stats);
        assert_eq!(row, TickSummaryRow { tick: 60, departures: 4, arrivals: 2, in_network: 9, waiting: 1 });
    }
}

// ── Volumes ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod volume_tests {
    use super::*;
    use qs_events::{EventBus, EventHandler, EventKind, EventSink};

    use crate::VolumeCounter;

    #[test]
    fn counts_link_left_per_bin() {
        let mut v = VolumeCounter::new(3_600, Tick::from_hms(9, 0, 0));
        assert_eq!(v.bin_count(), 10);
        for e in [left(10, 0, 1), left(3_599, 1, 1), left(3_600, 2, 1), left(7_300, 3, 2), departure(7_300, 4, 1)] {
            v.handle(&e);
        }
        assert_eq!(v.volume(LinkId(1), 0), 2);
        assert_eq!(v.volume(LinkId(1), 1), 1);
        assert_eq!(v.volume(LinkId(2), 2), 1);
        assert_eq!(v.total(LinkId(1)), 3);
        assert_eq!(v.volumes(LinkId(7)), None);
        assert_eq!(v.links().collect::<Vec<_>>(), vec![LinkId(1), LinkId(2)]);
    }

    #[test]
    fn late_events_land_in_last_bin() {
        let mut v = VolumeCounter::new(600, Tick(1_800));
        assert_eq!(v.bin_count(), 4);
        v.handle(&left(50_000, 0, 0));
        assert_eq!(v.volume(LinkId(0), 3), 1);
    }

    #[test]
    fn works_as_bus_subscriber() {
        let mut v = VolumeCounter::hourly();
        {
            let mut bus = EventBus::new();
            bus.subscribe(&mut v, &[EventKind::LinkLeft]);
            for e in [left(100, 0, 4), left(200, 1, 4), departure(300, 2, 4)] {
                bus.emit(&e);
            }
        }
        assert_eq!(v.volume(LinkId(4), 0), 2);
        v.reset();
        assert_eq!(v.total(LinkId(4)), 0);
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::csv::CsvWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("events.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["tick", "type", "agent_id", "link_id", "mode", "activity"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["tick", "departures", "arrivals", "in_network", "waiting"]);
    }

    #[test]
    fn csv_event_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_events(&sample_rows()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][1], "actend");
        assert_eq!(&rows[0][4], "");  // no mode
        assert_eq!(&rows[0][5], "2"); // activity
        assert_eq!(&rows[1][4], "car");
        assert_eq!(&rows[1][5], "");
        assert_eq!(&rows[2][1], "entered link");
    }

    #[test]
    fn csv_tick_summary_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), ["3", "2", "1", "40", "3"]);
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_write_after_finish_rejected() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        let err = w.write_tick_summary(&summary_row(0)).unwrap_err();
        assert!(matches!(err, crate::OutputError::Closed { file: "tick_summaries.csv" }));
    }

    #[test]
    fn csv_empty_batch_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_events(&[]).unwrap();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use std::io;

    use qs_core::{Coord, SimConfig};
    use qs_events::EventKind;
    use qs_network::{LinkSpec, NetworkBuilder};
    use qs_plans::{Activity, Leg, Plan};
    use qs_sim::{Sim, SimBuilder, SimObserver, TickStats};
    use tempfile::TempDir;

    use super::*;
    use crate::{CsvWriter, EventOutputObserver, OutputError, OutputResult, OutputWriter, VolumeCounter};

    /// Two 100 m links; `n` agents cross both, one departing every 10 s.
    fn corridor(n: u32) -> Sim {
        let mut b = NetworkBuilder::new();
        let nodes: Vec<_> = (0..3).map(|i| b.add_node(Coord::new(i as f64 * 100.0, 0.0))).collect();
        b.add_link(nodes[0], nodes[1], LinkSpec::new(100.0, 10.0, 3_600.0, 1.0));
        b.add_link(nodes[1], nodes[2], LinkSpec::new(100.0, 10.0, 3_600.0, 1.0));

        let plans = (0..n)
            .map(|i| {
                Plan::new(Activity::new(ActivityId(0), LinkId(0)).with_end_time(Tick(i as u64 * 10)))
                    .then(Leg::car(vec![LinkId(0), LinkId(1)]), Activity::new(ActivityId(1), LinkId(1)))
            })
            .collect();
        let cfg = SimConfig { end_time: Tick(599), ..SimConfig::default() };
        SimBuilder::new(cfg, b.build().unwrap()).plans(plans).build().unwrap()
    }

    #[test]
    fn csv_receives_every_event() {
        let dir = TempDir::new().unwrap();
        let mut obs = EventOutputObserver::new(CsvWriter::new(dir.path()).unwrap()).summary_every(60);
        let summary = corridor(5).run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");
        assert_eq!(obs.events_written(), summary.total_events());

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len() as u64, summary.total_events());
        assert_eq!(rows.iter().filter(|r| &r[1] == "arrival").count(), 5);

        // Ticks 0, 60, …, 540.
        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 10);
    }

    #[test]
    fn runs_alongside_volume_counter() {
        let dir = TempDir::new().unwrap();
        let output = EventOutputObserver::new(CsvWriter::new(dir.path()).unwrap()).summary_every(0);
        let mut obs = (output, VolumeCounter::new(60, Tick(599)));
        let summary = corridor(8).run(&mut obs).unwrap();

        assert_eq!(obs.1.total(LinkId(0)), 8);
        assert_eq!(obs.1.total(LinkId(1)), 8);
        assert_eq!(summary.count(EventKind::LinkLeft), 16);
        // First crossing of link 0 ends at t = 10.
        assert_eq!(obs.1.volume(LinkId(0), 0), 5);
    }

    struct FailingWriter {
        calls: usize,
    }

    impl OutputWriter for FailingWriter {
        fn write_events(&mut self, _rows: &[EventRow]) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(io::Error::other(format!("disk full #{}", self.calls))))
        }
        fn write_tick_summary(&mut self, _row: &TickSummaryRow) -> OutputResult<()> {
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn first_writer_error_is_latched() {
        let mut obs = EventOutputObserver::new(FailingWriter { calls: 0 });
        for t in 0..3 {
            obs.on_event(&departure(t, 0, 0));
            obs.on_tick_end(Tick(t), &TickStats::default());
        }
        let err = obs.take_error().unwrap();
        assert!(err.to_string().contains("#1"));
        assert!(obs.take_error().is_none());
        assert_eq!(obs.events_written(), 0);
        assert_eq!(obs.into_writer().calls, 3);
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_event_rows_keep_order_and_nulls() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_events(&sample_rows()).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let mut stmt = conn.prepare("SELECT type, mode, activity FROM events ORDER BY seq").unwrap();
        let rows: Vec<(String, Option<String>, Option<i64>)> = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(rows, vec![
            ("actend".to_owned(), None, Some(2)),
            ("departure".to_owned(), Some("car".to_owned()), None),
            ("entered link".to_owned(), None, None),
        ]);
    }

    #[test]
    fn sqlite_tick_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(7)).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (tick, in_network, waiting): (i64, i64, i64) = conn.query_row(
            "SELECT tick, in_network, waiting FROM tick_summaries WHERE tick = 7",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        ).unwrap();
        assert_eq!((tick, in_network, waiting), (7, 40, 3));
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use tempfile::TempDir;

    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::*;
    use crate::parquet::ParquetWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("events.parquet").exists());
        assert!(dir.path().join("tick_summaries.parquet").exists());
    }

    #[test]
    fn parquet_event_round_trip() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_events(&sample_rows()).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("events.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let batches: Vec<_> = builder.build().unwrap().map(|b| b.unwrap()).collect();
        let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total_rows, 3);

        let field_names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(field_names, ["tick", "type", "agent_id", "link_id", "mode", "activity"]);
        assert!(schema.field_with_name("mode").unwrap().is_nullable());
        assert_eq!(*schema.field_with_name("activity").unwrap().data_type(), DataType::UInt16);
    }

    #[test]
    fn parquet_finish_required() {
        // Without finish() the footer is never written.
        let dir = tmp();
        {
            let mut w = ParquetWriter::new(dir.path()).unwrap();
            w.write_events(&sample_rows()).unwrap();
        }

        let file = std::fs::File::open(dir.path().join("events.parquet")).unwrap();
        let result = ParquetRecordBatchReaderBuilder::try_new(file);
        assert!(result.is_err(), "file without Parquet footer should fail to open");
    }
}
