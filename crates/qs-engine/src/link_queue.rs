//! Per-link queue state.
//!
//! # Layout
//!
//! ```text
//!   enqueue_entering ─▶ [ in_transit (by exit tick) ] ─advance─▶ [ buffer ] ─release_eligible─▶
//! ```
//!
//! Every vehicle on a link has the same free-flow travel time and enters at
//! a tick no earlier than the one before it, so appending to `in_transit`
//! keeps it sorted by exit tick with ties in entry order.  Both queues are
//! therefore plain FIFOs.
//!
//! Occupancy is `in_transit.len() + buffer.len()`.  Releasing a vehicle frees
//! its space immediately.

use std::collections::VecDeque;

use qs_core::{LinkId, SimConfig, Tick};
use qs_network::Network;

use crate::{CapacityExceeded, FlowCredit, Vehicle};

pub struct LinkQueue {
    id:              LinkId,
    free_flow_ticks: u64,
    /// Storage capacity in whole vehicles, at least 1.
    slots:           usize,
    in_transit:      VecDeque<Vehicle>,
    buffer:          VecDeque<Vehicle>,
    flow:            FlowCredit,
}

impl LinkQueue {
    pub fn new(id: LinkId, free_flow_ticks: u64, slots: usize, flow: FlowCredit) -> Self {
        Self {
            id,
            free_flow_ticks: free_flow_ticks.max(1),
            slots: slots.max(1),
            in_transit: VecDeque::new(),
            buffer: VecDeque::new(),
            flow,
        }
    }

    /// Derive travel time, storage, and flow rate for `link` under `config`.
    ///
    /// Storage is floored to whole vehicles, then raised so the link can hold
    /// at least one tick of outflow.
    pub fn for_link(network: &Network, link: LinkId, config: &SimConfig) -> Self {
        let per_tick = network.flow_capacity_per_sec(link, config.flow_cap_factor)
            * config.tick_secs as f64;
        let storage = network.storage_capacity(
            link,
            config.effective_vehicle_length_m,
            config.storage_cap_factor,
        );
        let slots = (storage.floor() as usize).max(per_tick.ceil() as usize);
        Self::new(
            link,
            network.free_flow_ticks(link),
            slots,
            FlowCredit::new(per_tick, config.tick_secs),
        )
    }

    // ── Queue operations ──────────────────────────────────────────────────

    /// Admit `vehicle` at `tick` if storage allows.
    ///
    /// On success the vehicle will reach the buffer at
    /// `tick + free_flow_ticks`.  On failure it is handed back untouched.
    pub fn enqueue_entering(&mut self, mut vehicle: Vehicle, tick: Tick) -> Result<(), CapacityExceeded> {
        debug_assert_eq!(vehicle.current_link(), Some(self.id));
        if !self.has_space() {
            return Err(CapacityExceeded { link: self.id, vehicle });
        }
        vehicle.exit_tick = tick + self.free_flow_ticks;
        self.in_transit.push_back(vehicle);
        Ok(())
    }

    /// Move every vehicle whose exit tick is `<= tick` into the buffer.
    ///
    /// Returns how many moved.  Calling again for the same tick moves none.
    pub fn advance(&mut self, tick: Tick) -> usize {
        let mut moved = 0;
        while self.in_transit.front().is_some_and(|v| v.exit_tick <= tick) {
            if let Some(v) = self.in_transit.pop_front() {
                self.buffer.push_back(v);
                moved += 1;
            }
        }
        moved
    }

    /// Pop the buffer head if flow credit allows one more vehicle this tick.
    ///
    /// The vehicle stops counting toward occupancy at once.  If the caller
    /// cannot place it, it must hand it back with
    /// [`return_to_head`](Self::return_to_head) and stop draining this link
    /// for the tick.
    pub fn release_eligible(&mut self, tick: Tick) -> Option<Vehicle> {
        self.flow.accrue(tick);
        if self.flow.has_vehicle() {
            if let Some(vehicle) = self.buffer.pop_front() {
                self.flow.debit();
                self.flow.settle(self.buffer.is_empty());
                return Some(vehicle);
            }
        }
        self.flow.settle(self.buffer.is_empty());
        None
    }

    /// Undo the last [`release_eligible`](Self::release_eligible).
    pub fn return_to_head(&mut self, vehicle: Vehicle) {
        self.flow.refund();
        self.buffer.push_front(vehicle);
        self.flow.settle(false);
    }

    // ── Inspection ────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> LinkId {
        self.id
    }

    #[inline]
    pub fn free_flow_ticks(&self) -> u64 {
        self.free_flow_ticks
    }

    #[inline]
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Vehicles in transit plus vehicles in the buffer.
    #[inline]
    pub fn occupancy(&self) -> usize {
        self.in_transit.len() + self.buffer.len()
    }

    #[inline]
    pub fn has_space(&self) -> bool {
        self.occupancy() < self.slots
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.in_transit.is_empty() && self.buffer.is_empty()
    }

    #[inline]
    pub fn in_transit_len(&self) -> usize {
        self.in_transit.len()
    }

    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Exit tick of the next vehicle to reach the buffer.
    pub fn next_exit_tick(&self) -> Option<Tick> {
        self.in_transit.front().map(|v| v.exit_tick)
    }

    pub fn flow(&self) -> &FlowCredit {
        &self.flow
    }

    /// Vehicles on the link, buffer head first.
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> + '_ {
        self.buffer.iter().chain(self.in_transit.iter())
    }
}
