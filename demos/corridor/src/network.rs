//! The corridor road network.
//!
//! Five nodes on a straight line, 500 m apart, joined by one-way links in
//! both directions.  The third eastbound link narrows to a single lane.

use qs_core::{Coord, LinkId};
use qs_network::{LinkSpec, Network, NetworkBuilder, NetworkResult};

const NODES:        usize = 5;
const SPACING_M:    f64   = 500.0;
const SPEED_MPS:    f64   = 13.9; // ~50 km/h
const LANE_CAP_VPH: f64   = 900.0;
const BOTTLENECK:   usize = 2;

/// Eastbound links, west to east, then westbound links, east to west.
pub struct Corridor {
    pub network:   Network,
    pub eastbound: Vec<LinkId>,
    pub westbound: Vec<LinkId>,
}

impl Corridor {
    /// Home (the first eastbound link) to work (the last one).
    pub fn morning_route(&self) -> Vec<LinkId> {
        self.eastbound.clone()
    }

    /// Work back to home: turn around, drive west, then re-enter the home link.
    pub fn evening_route(&self) -> Vec<LinkId> {
        let mut route = Vec::with_capacity(self.westbound.len() + 2);
        route.extend(self.eastbound.last().copied());
        route.extend(self.westbound.iter().copied());
        route.extend(self.eastbound.first().copied());
        route
    }

    pub fn home(&self) -> LinkId {
        self.eastbound[0]
    }

    pub fn work(&self) -> LinkId {
        self.eastbound[self.eastbound.len() - 1]
    }
}

pub fn build_corridor() -> NetworkResult<Corridor> {
    let mut b = NetworkBuilder::new();
    let nodes: Vec<_> = (0..NODES)
        .map(|i| b.add_node(Coord::new(i as f64 * SPACING_M, 0.0)))
        .collect();

    let eastbound = nodes
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let lanes = if i == BOTTLENECK { 1.0 } else { 2.0 };
            b.add_link(w[0], w[1], LinkSpec::new(SPACING_M, SPEED_MPS, LANE_CAP_VPH * lanes, lanes))
        })
        .collect();
    let westbound = nodes
        .windows(2)
        .rev()
        .map(|w| b.add_link(w[1], w[0], LinkSpec::new(SPACING_M, SPEED_MPS, LANE_CAP_VPH * 2.0, 2.0)))
        .collect();

    Ok(Corridor { network: b.build()?, eastbound, westbound })
}
