//! Per-tick and end-of-run figures handed to observers.

use std::time::Duration;

use qs_core::{AgentId, LinkId, Tick};
use qs_events::EventKind;

/// What happened during one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Activities that ended and started a leg.
    pub departures: usize,
    /// `LinkEntered` events, first links included.
    pub entered:    usize,
    /// `LinkLeft` events, final links included.
    pub left:       usize,
    pub arrivals:   usize,
    /// Vehicles on links after the tick.
    pub in_network: usize,
    /// Departed agents still waiting for room on their first link.
    pub waiting:    usize,
}

/// Returned by [`Sim::run`](crate::Sim::run) and passed to
/// [`SimObserver::on_sim_end`](crate::SimObserver::on_sim_end).
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Last tick processed, `None` if the loop never ran.
    pub last_tick:     Option<Tick>,
    /// Ticks processed over the life of the `Sim`.
    pub ticks:         u64,
    /// Events emitted, indexed by [`EventKind::index`].
    pub events:        [u64; EventKind::COUNT],
    /// Agents still departing or travelling at the end, with their link.
    pub stuck:         Vec<(AgentId, LinkId)>,
    /// The run ended on a stop request before the horizon.
    pub stopped_early: bool,
    /// Wall time spent in `run`.
    pub wall:          Duration,
}

impl RunSummary {
    #[inline]
    pub fn count(&self, kind: EventKind) -> u64 {
        self.events[kind.index()]
    }

    pub fn total_events(&self) -> u64 {
        self.events.iter().sum()
    }
}
