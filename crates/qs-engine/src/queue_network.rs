//! All link queues of a run plus the set of links that currently hold
//! vehicles.
//!
//! Only active links are visited by the advance phase, and only the
//! downstream nodes of active links with a non-empty buffer are visited by
//! the node transfer phase.  A quiet network costs nothing per tick.

use qs_core::{LinkId, NodeId, SimConfig, Tick};
use qs_network::Network;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{CapacityExceeded, EngineError, EngineResult, LinkQueue, Vehicle};

pub struct QueueNetwork {
    /// Indexed by `LinkId`.
    links:     Vec<LinkQueue>,
    /// Links holding at least one vehicle, unordered.
    active:    Vec<LinkId>,
    is_active: Vec<bool>,
    /// Reused between ticks by `move_nodes`.
    nodes:     Vec<NodeId>,
}

impl QueueNetwork {
    /// One empty queue per network link.
    pub fn new(network: &Network, config: &SimConfig) -> Self {
        let links: Vec<LinkQueue> = LinkId::all(network.link_count())
            .map(|link| LinkQueue::for_link(network, link, config))
            .collect();
        debug!(
            links = links.len(),
            slots = links.iter().map(LinkQueue::slots).sum::<usize>(),
            "link queues ready"
        );
        Self {
            is_active: vec![false; links.len()],
            links,
            active: Vec::new(),
            nodes: Vec::new(),
        }
    }

    // ── Access ────────────────────────────────────────────────────────────

    #[inline]
    pub fn link(&self, id: LinkId) -> &LinkQueue {
        &self.links[id.index()]
    }

    #[inline]
    pub fn link_mut(&mut self, id: LinkId) -> &mut LinkQueue {
        &mut self.links[id.index()]
    }

    pub fn links(&self) -> &[LinkQueue] {
        &self.links
    }

    pub fn active_link_count(&self) -> usize {
        self.active.len()
    }

    /// Vehicles currently on any link.
    pub fn vehicles_in_network(&self) -> usize {
        self.active.iter().map(|&l| self.link(l).occupancy()).sum()
    }

    // ── Tick phases ───────────────────────────────────────────────────────

    /// Put a departing vehicle on the first link of its route.
    pub fn enter(&mut self, link: LinkId, vehicle: Vehicle, tick: Tick) -> Result<(), CapacityExceeded> {
        self.links[link.index()].enqueue_entering(vehicle, tick)?;
        self.activate(link);
        Ok(())
    }

    /// Promote every vehicle whose free-flow time is over into its link's
    /// buffer.  Returns the number promoted.
    #[cfg(not(feature = "parallel"))]
    pub fn advance(&mut self, tick: Tick) -> usize {
        let mut moved = 0;
        for &link in &self.active {
            moved += self.links[link.index()].advance(tick);
        }
        moved
    }

    /// Promote every vehicle whose free-flow time is over into its link's
    /// buffer.  Returns the number promoted.
    ///
    /// Links are independent in this phase, so they advance in parallel.
    #[cfg(feature = "parallel")]
    pub fn advance(&mut self, tick: Tick) -> usize {
        self.links
            .par_iter_mut()
            .filter(|l| l.in_transit_len() > 0)
            .map(|l| l.advance(tick))
            .sum()
    }

    /// Run the node mover on every node with buffered incoming vehicles,
    /// in ascending `NodeId`.
    ///
    /// Vehicles that finished their route are appended to `arrived`.
    /// Returns the number of vehicles that left a link.
    pub fn move_nodes<S: qs_events::EventSink>(
        &mut self,
        network: &Network,
        tick:    Tick,
        sink:    &mut S,
        arrived: &mut Vec<Vehicle>,
    ) -> EngineResult<usize> {
        let mut nodes = std::mem::take(&mut self.nodes);
        nodes.clear();
        nodes.extend(
            self.active
                .iter()
                .filter(|&&l| self.links[l.index()].buffer_len() > 0)
                .map(|&l| network.link_to(l)),
        );
        nodes.sort_unstable();
        nodes.dedup();

        let mut left = 0;
        let mut result: EngineResult<()> = Ok(());
        for &node in &nodes {
            match self.move_node(network, node, tick, sink, arrived) {
                Ok(n) => left += n,
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        self.nodes = nodes;
        result?;

        self.prune();
        Ok(left)
    }

    /// Fail if any link holds more vehicles than its storage capacity.
    pub fn check_storage(&self) -> EngineResult<()> {
        for &link in &self.active {
            let q = self.link(link);
            if q.occupancy() > q.slots() {
                return Err(EngineError::StorageOverflow {
                    link,
                    occupancy: q.occupancy(),
                    slots: q.slots(),
                });
            }
        }
        Ok(())
    }

    // ── Active set ────────────────────────────────────────────────────────

    #[inline]
    pub(crate) fn activate(&mut self, link: LinkId) {
        let flag = &mut self.is_active[link.index()];
        if !*flag {
            *flag = true;
            self.active.push(link);
        }
    }

    /// Drop links that have emptied out.
    fn prune(&mut self) {
        let links = &self.links;
        let is_active = &mut self.is_active;
        self.active.retain(|&l| {
            let keep = !links[l.index()].is_empty();
            if !keep {
                is_active[l.index()] = false;
            }
            keep
        });
    }
}
