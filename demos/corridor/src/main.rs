//! corridor: commuters crossing a single-lane bottleneck.
//!
//! Every agent leaves home between 06:00 and 09:00, works for 7–9 hours and
//! drives back.  Events and tick summaries go to CSV; hourly volumes of the
//! bottleneck link are logged at the end.
//!
//! ```text
//! corridor [config.json] [output-dir]
//! ```
//!
//! `config.json` holds a partial `SimConfig`; missing fields keep their
//! defaults.  Set `RUST_LOG=debug` for hourly progress.

mod network;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use qs_core::{ActivityId, SimConfig, Tick};
use qs_output::{CsvWriter, EventOutputObserver, VolumeCounter};
use qs_plans::{Activity, Leg, Plan};
use qs_sim::SimBuilder;

use network::{Corridor, build_corridor};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT:   usize = 2_000;
const SEED:          u64   = 42;
const SUMMARY_EVERY: u64   = 300;

const HOME: ActivityId = ActivityId(0);
const WORK: ActivityId = ActivityId(1);

// ── Population ────────────────────────────────────────────────────────────────

fn population(corridor: &Corridor, rng: &mut SmallRng) -> Vec<Plan> {
    let morning = corridor.morning_route();
    let evening = corridor.evening_route();
    (0..AGENT_COUNT)
        .map(|_| {
            let leave = rng.gen_range(Tick::from_hms(6, 0, 0).0..Tick::from_hms(9, 0, 0).0);
            let shift = rng.gen_range(7 * 3_600..9 * 3_600);
            Plan::new(Activity::new(HOME, corridor.home()).with_end_time(Tick(leave)))
                .then(Leg::car(morning.clone()), Activity::new(WORK, corridor.work()).with_duration(shift))
                .then(Leg::car(evening.clone()), Activity::new(HOME, corridor.home()))
        })
        .collect()
}

fn load_config(path: Option<&str>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let config = load_config(args.next().as_deref())?;
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "output/corridor".into()));
    info!(?config, out_dir = %out_dir.display(), "configuration loaded");

    // 1. Network and population.
    let corridor = build_corridor()?;
    let bottleneck = corridor.eastbound[2];
    let plans = population(&corridor, &mut SmallRng::seed_from_u64(SEED));
    info!(
        agents = plans.len(),
        links = corridor.network.link_count(),
        %bottleneck,
        "corridor ready"
    );

    // 2. Sim.
    let end_time = config.end_time;
    let mut sim = SimBuilder::new(config, corridor.network).plans(plans).build()?;

    // 3. Output.
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let writer = CsvWriter::new(&out_dir)?;
    let mut obs = (
        EventOutputObserver::new(writer).summary_every(SUMMARY_EVERY),
        VolumeCounter::new(3_600, end_time),
    );

    // 4. Run.
    let summary = sim.run(&mut obs)?;
    if let Some(e) = obs.0.take_error() {
        warn!(error = %e, "event output incomplete");
    }

    // 5. Report.
    info!(
        events = summary.total_events(),
        written = obs.0.events_written(),
        stuck = summary.stuck.len(),
        wall_ms = summary.wall.as_millis() as u64,
        "run complete"
    );
    let volumes = &obs.1;
    for bin in 0..volumes.bin_count() {
        let n = volumes.volume(bottleneck, bin);
        if n > 0 {
            info!(hour = bin, vehicles = n, "bottleneck volume");
        }
    }

    Ok(())
}
