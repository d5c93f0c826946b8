//! The unit of traffic moved between link queues.

use std::sync::Arc;

use qs_core::{AgentId, LinkId, Tick, TransportMode};

/// A vehicle driven by one agent along one leg's route.
///
/// Instead of a reference to the driver's plan, the vehicle keeps a shared
/// handle to the route and its own position in it, so link queues can move
/// it without looking anything up.  Owned by exactly one link queue at a
/// time; node transfer moves it, never copies it.
#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    pub agent:     AgentId,
    pub mode:      TransportMode,
    pub route:     Arc<[LinkId]>,
    /// Index into `route` of the link the vehicle occupies.
    pub route_pos: usize,
    /// Tick at which the vehicle reaches the buffer of its current link.
    pub exit_tick: Tick,
}

impl Vehicle {
    /// A vehicle positioned on the first link of `route`.
    pub fn new(agent: AgentId, mode: TransportMode, route: Arc<[LinkId]>) -> Self {
        Self { agent, mode, route, route_pos: 0, exit_tick: Tick::ZERO }
    }

    #[inline]
    pub fn current_link(&self) -> Option<LinkId> {
        self.route.get(self.route_pos).copied()
    }

    /// The link after the current one, or `None` on the final link.
    #[inline]
    pub fn next_link(&self) -> Option<LinkId> {
        self.route.get(self.route_pos + 1).copied()
    }

    #[inline]
    pub fn is_on_last_link(&self) -> bool {
        self.route_pos + 1 >= self.route.len()
    }
}
