//! `DepartureQueue`: sparse per-tick activity-end queue.
//!
//! Most agents are at an activity most of the day.  Instead of scanning all
//! N agents every tick, an agent registers the tick at which its current
//! activity ends; each tick the loop drains only the agents due by then.
//!
//! `BTreeMap` gives O(log W) insert and pop where W is the number of
//! distinct end ticks currently enqueued.

use std::collections::BTreeMap;

use qs_core::{AgentId, SimClock, Tick};

use crate::AgentRuntime;

/// Maps simulation ticks to agents whose activity ends at that tick.
///
/// Agents due at the same tick come out in insertion order.
#[derive(Default)]
pub struct DepartureQueue {
    inner: BTreeMap<Tick, Vec<AgentId>>,
    /// Cached total agent count for O(1) `len()`.
    total: usize,
}

impl DepartureQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule every agent's first departure, in ascending `AgentId`.
    ///
    /// Times are snapped onto the clock's grid; agents whose first activity
    /// never ends are not inserted.
    pub fn from_runtime(runtime: &AgentRuntime, clock: &SimClock) -> Self {
        let mut queue = Self::new();
        for agent in AgentId::all(runtime.len()) {
            if let Some(end) = runtime.first_departure(agent, clock.start) {
                queue.push(clock.align_up(end), agent);
            }
        }
        queue
    }

    /// Schedule `agent` to depart at `tick`.
    pub fn push(&mut self, tick: Tick, agent: AgentId) {
        self.inner.entry(tick).or_default().push(agent);
        self.total += 1;
    }

    /// Remove and return all agents due at or before `tick`, earliest first.
    ///
    /// Returns an empty `Vec` without allocating when nothing is due.
    pub fn drain_until(&mut self, tick: Tick) -> Vec<AgentId> {
        let mut due = Vec::new();
        while let Some(entry) = self.inner.first_entry() {
            if *entry.key() > tick {
                break;
            }
            let agents = entry.remove();
            self.total -= agents.len();
            if due.is_empty() {
                due = agents;
            } else {
                due.extend(agents);
            }
        }
        due
    }

    /// The earliest tick with at least one queued agent, or `None` if empty.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Total number of queued agents across all future ticks.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future ticks that have at least one queued agent.
    pub fn tick_count(&self) -> usize {
        self.inner.len()
    }
}
