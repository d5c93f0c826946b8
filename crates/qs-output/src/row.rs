//! Plain data row types written by output backends.

use qs_core::Tick;
use qs_events::Event;
use qs_sim::TickStats;

/// One event, flattened into columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRow {
    pub tick:     u64,
    /// [`EventKind::as_str`](qs_events::EventKind::as_str).
    pub kind:     &'static str,
    pub agent_id: u32,
    pub link_id:  u32,
    /// Transport mode for `departure` and `arrival`.
    pub mode:     Option<&'static str>,
    /// Activity type for `actend` and `actstart`.
    pub activity: Option<u16>,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            tick:     event.tick().0,
            kind:     event.kind().as_str(),
            agent_id: event.agent().0,
            link_id:  event.link().0,
            mode:     event.mode().map(|m| m.as_str()),
            activity: event.activity().map(|a| a.0),
        }
    }
}

/// Network state at the end of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:       u64,
    pub departures: u64,
    pub arrivals:   u64,
    pub in_network: u64,
    pub waiting:    u64,
}

impl TickSummaryRow {
    pub fn new(tick: Tick, stats: &TickStats) -> Self {
        Self {
            tick:       tick.0,
            departures: stats.departures as u64,
            arrivals:   stats.arrivals as u64,
            in_network: stats.in_network as u64,
            waiting:    stats.waiting as u64,
        }
    }
}
