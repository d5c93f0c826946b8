//! The `Sim` struct and its tick loop.

use std::collections::{BTreeMap, VecDeque};
use std::time::{Duration, Instant};

use qs_core::{AgentId, LinkId, SimClock, SimConfig, Tick};
use qs_engine::{CapacityExceeded, QueueNetwork, Vehicle};
use qs_events::{Event, EventKind, EventSink};
use qs_network::Network;
use qs_plans::{AgentRuntime, DepartureQueue, PlanCursor, PlanError};
use tracing::{debug, info, warn};

use crate::{RunSummary, SimError, SimObserver, SimResult, StopHandle, TickStats};

// ── Relay ─────────────────────────────────────────────────────────────────────

/// The event sink used while a tick runs.
///
/// Keeps plan cursors in step with vehicle moves, counts events by kind,
/// and forwards everything to the observer.  A cursor that refuses a move
/// is latched and turned into an error once the engine call returns.
struct Relay<'a, O: SimObserver> {
    agents:   &'a mut AgentRuntime,
    observer: &'a mut O,
    counts:   [u64; EventKind::COUNT],
    fault:    Option<(AgentId, LinkId, PlanError)>,
}

impl<'a, O: SimObserver> Relay<'a, O> {
    fn new(agents: &'a mut AgentRuntime, observer: &'a mut O) -> Self {
        Self { agents, observer, counts: [0; EventKind::COUNT], fault: None }
    }

    fn check(&mut self, tick: Tick) -> SimResult<()> {
        match self.fault.take() {
            Some((agent, link, err)) => Err(SimError::cursor(tick, agent, Some(link), err)),
            None => Ok(()),
        }
    }

    fn count(&self, kind: EventKind) -> usize {
        self.counts[kind.index()] as usize
    }
}

impl<O: SimObserver> EventSink for Relay<'_, O> {
    fn emit(&mut self, event: &Event) {
        if let Event::LinkEntered { agent, link, .. } = event {
            if let Err(err) = self.agents.enter_link(*agent) {
                if self.fault.is_none() {
                    self.fault = Some((*agent, *link, err));
                }
            }
        }
        self.counts[event.kind().index()] += 1;
        self.observer.on_event(event);
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim` owns all run state and drives the four-step tick loop:
///
/// 1. **Departures**: agents whose activity ends now start their leg and
///    join the backlog of their first link; each backlog is then served in
///    ascending `LinkId` until that link refuses a vehicle.
/// 2. **Link advance**: vehicles whose free-flow time is over join their
///    link's buffer.
/// 3. **Node transfer**: every node with buffered incoming vehicles runs the
///    node mover, in ascending `NodeId`.
/// 4. **Arrivals**: agents that finished their route start their next
///    activity and, if it ends, are scheduled to depart again.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Run configuration, validated.
    pub config: SimConfig,

    /// Simulation clock; `clock.current` is the next tick to process.
    pub clock: SimClock,

    /// Road network, read-only for the run.
    pub network: Network,

    /// One queue per link.
    pub queues: QueueNetwork,

    /// Plans and plan cursors, indexed by `AgentId`.
    pub agents: AgentRuntime,

    /// Agents waiting for their current activity to end.
    pub departures: DepartureQueue,

    /// Departed vehicles not yet admitted, per first link.
    pub(crate) waiting: BTreeMap<LinkId, VecDeque<Vehicle>>,

    /// Vehicles that finished their route this tick.  Reused between ticks.
    pub(crate) arrived: Vec<Vehicle>,

    pub(crate) stop:      StopHandle,
    pub(crate) totals:    [u64; EventKind::COUNT],
    pub(crate) ticks:     u64,
    pub(crate) last_tick: Option<Tick>,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_time` (inclusive), then
    /// report agents that did not finish.
    ///
    /// A stop request is honoured between ticks.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        let started = Instant::now();
        info!(
            agents = self.agents.len(),
            links = self.network.link_count(),
            start = %self.clock.current,
            end = %self.clock.end,
            step_secs = self.clock.step,
            "simulation starting"
        );

        let mut stopped_early = false;
        while !self.clock.is_finished() {
            if self.stop.is_stopped() {
                warn!(tick = %self.clock.current, "stop requested, ending run before the horizon");
                stopped_early = true;
                break;
            }
            self.step(observer)?;
        }

        Ok(self.finish(observer, stopped_early, started.elapsed()))
    }

    /// Run at most `n` ticks from the current position.
    ///
    /// Stops early at the end of the horizon or on a stop request.  Does not
    /// emit `Stuck` events or call `on_sim_end`.  Returns the number of ticks
    /// processed.  Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<u64> {
        let mut done = 0;
        while done < n && !self.clock.is_finished() && !self.stop.is_stopped() {
            self.step(observer)?;
            done += 1;
        }
        Ok(done)
    }

    /// A handle that stops this simulation between ticks.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Vehicles on `link`, in transit or buffered.
    pub fn link_occupancy(&self, link: LinkId) -> usize {
        self.queues.link(link).occupancy()
    }

    pub fn agent_cursor(&self, agent: AgentId) -> PlanCursor {
        self.agents.cursor(agent)
    }

    /// Departed agents whose first link has not admitted them yet.
    pub fn waiting_departures(&self) -> usize {
        self.waiting.values().map(VecDeque::len).sum()
    }

    pub fn vehicles_in_network(&self) -> usize {
        self.queues.vehicles_in_network()
    }

    /// Events emitted so far, indexed by [`EventKind::index`].
    pub fn event_counts(&self) -> &[u64; EventKind::COUNT] {
        &self.totals
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current;
        observer.on_tick_start(now);
        let stats = self.process_tick(now, observer)?;

        if self.last_tick.is_none_or(|t| t.hour() != now.hour()) {
            debug!(
                tick = %now,
                in_network = stats.in_network,
                waiting = stats.waiting,
                "hourly progress"
            );
        }

        observer.on_tick_end(now, &stats);
        self.last_tick = Some(now);
        self.ticks += 1;
        self.clock.advance();
        Ok(())
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<TickStats> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let Self { clock, network, queues, agents, departures, waiting, arrived, totals, .. } = self;
        let mut relay = Relay::new(agents, observer);

        // ── Step 1: departures ────────────────────────────────────────────
        for agent in departures.drain_until(now) {
            let leg = relay
                .agents
                .depart(agent)
                .map_err(|err| SimError::cursor(now, agent, None, err))?;
            relay.emit(&Event::ActivityEnd { tick: now, agent, link: leg.link, activity: leg.activity_id });
            relay.emit(&Event::Departure { tick: now, agent, link: leg.link, mode: leg.mode });

            let vehicle = Vehicle::new(agent, leg.mode, leg.route);
            match vehicle.current_link() {
                Some(first) if !vehicle.is_on_last_link() => {
                    waiting.entry(first).or_default().push_back(vehicle);
                }
                // Origin and destination are the same link.
                _ => {
                    relay.emit(&Event::Arrival { tick: now, agent, link: leg.link, mode: leg.mode });
                    arrived.push(vehicle);
                }
            }
        }

        for (&link, backlog) in waiting.iter_mut() {
            while let Some(vehicle) = backlog.pop_front() {
                let agent = vehicle.agent;
                match queues.enter(link, vehicle, now) {
                    Ok(()) => relay.emit(&Event::LinkEntered { tick: now, agent, link }),
                    Err(CapacityExceeded { vehicle, .. }) => {
                        backlog.push_front(vehicle);
                        break;
                    }
                }
            }
        }
        waiting.retain(|_, backlog| !backlog.is_empty());
        relay.check(now)?;

        // ── Step 2: link advance ──────────────────────────────────────────
        queues.advance(now);

        // ── Step 3: node transfer ─────────────────────────────────────────
        queues
            .move_nodes(network, now, &mut relay, arrived)
            .map_err(|err| SimError::engine(now, err))?;
        relay.check(now)?;
        queues.check_storage().map_err(|err| SimError::engine(now, err))?;

        // ── Step 4: arrivals ──────────────────────────────────────────────
        for vehicle in arrived.drain(..) {
            let agent = vehicle.agent;
            let next = relay
                .agents
                .arrive(agent, now)
                .map_err(|err| SimError::cursor(now, agent, vehicle.current_link(), err))?;
            relay.emit(&Event::ActivityStart { tick: now, agent, link: next.link, activity: next.activity_id });
            if let Some(end) = next.ends_at {
                // An end time already past means leaving on the next tick.
                departures.push(clock.align_up(end.max(now + 1)), agent);
            }
        }

        let stats = TickStats {
            departures: relay.count(EventKind::Departure),
            entered:    relay.count(EventKind::LinkEntered),
            left:       relay.count(EventKind::LinkLeft),
            arrivals:   relay.count(EventKind::Arrival),
            in_network: queues.vehicles_in_network(),
            waiting:    waiting.values().map(VecDeque::len).sum(),
        };
        for (total, n) in totals.iter_mut().zip(relay.counts) {
            *total += n;
        }
        Ok(stats)
    }

    /// Report unfinished agents and build the summary.
    fn finish<O: SimObserver>(&mut self, observer: &mut O, stopped_early: bool, wall: Duration) -> RunSummary {
        let tick = self.last_tick.unwrap_or(self.clock.start);
        let stuck: Vec<(AgentId, LinkId)> = self
            .agents
            .en_route()
            .map(|agent| (agent, self.agents.current_link(agent)))
            .collect();

        for &(agent, link) in &stuck {
            warn!(%agent, %link, cursor = ?self.agents.cursor(agent), "agent did not reach its destination");
            observer.on_event(&Event::Stuck { tick, agent, link });
        }
        self.totals[EventKind::Stuck.index()] += stuck.len() as u64;

        let summary = RunSummary {
            last_tick: self.last_tick,
            ticks: self.ticks,
            events: self.totals,
            stuck,
            stopped_early,
            wall,
        };
        info!(
            ticks = summary.ticks,
            departures = summary.count(EventKind::Departure),
            arrivals = summary.count(EventKind::Arrival),
            stuck = summary.stuck.len(),
            wall_ms = wall.as_millis() as u64,
            "simulation finished"
        );
        observer.on_sim_end(&summary);
        summary
    }
}
