//! Transfer of buffered vehicles across one node.
//!
//! Incoming links are drained in ascending `LinkId`, each until its flow
//! credit runs out or the head vehicle is refused downstream.  A refused
//! head stays at the front of its buffer and blocks the vehicles behind it;
//! this is how congestion spills back upstream.
//!
//! When two incoming links compete for the last free slot of the same
//! outgoing link, the lower link id always wins.  The order is reproducible
//! but not fair under sustained contention.

use qs_core::{NodeId, Tick};
use qs_events::{Event, EventSink};
use qs_network::Network;

use crate::{CapacityExceeded, EngineError, EngineResult, QueueNetwork, Vehicle};

impl QueueNetwork {
    /// Move vehicles across `node` for `tick`.
    ///
    /// Emits `LinkLeft` + `LinkEntered` per transfer and `LinkLeft` +
    /// `Arrival` per vehicle that ends its route on an incoming link.  The
    /// final link's exit always succeeds.  Returns the number of vehicles that
    /// left an incoming link.
    pub fn move_node<S: EventSink>(
        &mut self,
        network: &Network,
        node:    NodeId,
        tick:    Tick,
        sink:    &mut S,
        arrived: &mut Vec<Vehicle>,
    ) -> EngineResult<usize> {
        let mut left = 0;

        for &in_link in network.in_links(node) {
            while let Some(mut vehicle) = self.link_mut(in_link).release_eligible(tick) {
                let agent = vehicle.agent;

                let Some(out) = vehicle.next_link() else {
                    sink.emit(&Event::LinkLeft { tick, agent, link: in_link });
                    sink.emit(&Event::Arrival { tick, agent, link: in_link, mode: vehicle.mode });
                    arrived.push(vehicle);
                    left += 1;
                    continue;
                };

                if !network.contains_link(out) {
                    self.link_mut(in_link).return_to_head(vehicle);
                    return Err(EngineError::UnknownLink { agent, link: out });
                }
                if network.link_from(out) != node {
                    self.link_mut(in_link).return_to_head(vehicle);
                    return Err(EngineError::Misrouted { agent, from: in_link, to: out });
                }

                vehicle.route_pos += 1;
                match self.link_mut(out).enqueue_entering(vehicle, tick) {
                    Ok(()) => {
                        self.activate(out);
                        sink.emit(&Event::LinkLeft { tick, agent, link: in_link });
                        sink.emit(&Event::LinkEntered { tick, agent, link: out });
                        left += 1;
                    }
                    Err(CapacityExceeded { mut vehicle, .. }) => {
                        vehicle.route_pos -= 1;
                        self.link_mut(in_link).return_to_head(vehicle);
                        break;
                    }
                }
            }
        }

        Ok(left)
    }
}
