//! Network representation and builder.
//!
//! # Data layout
//!
//! Link attributes are stored as parallel arrays indexed by `LinkId`
//! (structure of arrays).  Link ids are assigned in insertion order and never
//! renumbered, because plans refer to them.
//!
//! Adjacency uses **Compressed Sparse Row (CSR)** format in both directions.
//! Given a `NodeId n`, its incoming links occupy the slice:
//!
//! ```text
//! in_links[ node_in_start[n] .. node_in_start[n+1] ]
//! ```
//!
//! and likewise for `out_links` / `node_out_start`.  Within each slice the
//! links are in ascending `LinkId` order, which is the order the node mover
//! visits them in.

use qs_core::{Coord, LinkId, NodeId};

use crate::{NetworkError, NetworkResult};

#[cfg(feature = "fx-hash")]
type NameIndex<K> = rustc_hash::FxHashMap<String, K>;
#[cfg(not(feature = "fx-hash"))]
type NameIndex<K> = std::collections::HashMap<String, K>;

// ── LinkSpec ──────────────────────────────────────────────────────────────────

/// Physical and operational attributes of one directed link.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkSpec {
    /// Length in metres.
    pub length_m: f64,
    /// Free-flow speed in metres per second.
    pub freespeed_mps: f64,
    /// Flow capacity in vehicles per capacity period.
    pub capacity: f64,
    /// Number of effective lanes (storage multiplier).
    pub lanes: f64,
}

impl LinkSpec {
    pub fn new(length_m: f64, freespeed_mps: f64, capacity: f64, lanes: f64) -> Self {
        Self { length_m, freespeed_mps, capacity, lanes }
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// Directed graph of nodes and links, immutable for the duration of a run.
///
/// All arrays are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`NetworkBuilder`].
pub struct Network {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Position of each node.  Indexed by `NodeId`.
    pub node_coord: Vec<Coord>,

    /// CSR row pointer into `in_links`.  Length = `node_count + 1`.
    pub node_in_start: Vec<u32>,
    /// Incoming links, grouped by destination node.
    pub in_links: Vec<LinkId>,

    /// CSR row pointer into `out_links`.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,
    /// Outgoing links, grouped by origin node.
    pub out_links: Vec<LinkId>,

    // ── Link data (indexed by LinkId) ─────────────────────────────────────
    pub link_from: Vec<NodeId>,
    pub link_to: Vec<NodeId>,
    pub link_length_m: Vec<f64>,
    pub link_freespeed_mps: Vec<f64>,
    /// Vehicles per capacity period.
    pub link_capacity: Vec<f64>,
    pub link_lanes: Vec<f64>,
    /// Seconds over which `link_capacity` is denominated.
    pub link_capacity_period_secs: Vec<u32>,

    // ── External names ────────────────────────────────────────────────────
    node_names: Vec<Option<String>>,
    link_names: Vec<Option<String>>,
    node_index: NameIndex<NodeId>,
    link_index: NameIndex<LinkId>,
}

impl Network {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_coord.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_coord.is_empty()
    }

    #[inline]
    pub fn contains_link(&self, link: LinkId) -> bool {
        link.index() < self.link_count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Links ending at `node`, ascending by id.
    #[inline]
    pub fn in_links(&self, node: NodeId) -> &[LinkId] {
        let start = self.node_in_start[node.index()] as usize;
        let end   = self.node_in_start[node.index() + 1] as usize;
        &self.in_links[start..end]
    }

    /// Links starting at `node`, ascending by id.
    #[inline]
    pub fn out_links(&self, node: NodeId) -> &[LinkId] {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        &self.out_links[start..end]
    }

    #[inline]
    pub fn link_from(&self, link: LinkId) -> NodeId {
        self.link_from[link.index()]
    }

    #[inline]
    pub fn link_to(&self, link: LinkId) -> NodeId {
        self.link_to[link.index()]
    }

    /// `true` if a vehicle leaving `a` can enter `b` directly.
    #[inline]
    pub fn connects(&self, a: LinkId, b: LinkId) -> bool {
        self.link_to(a) == self.link_from(b)
    }

    // ── Derived link values ───────────────────────────────────────────────

    /// Free-flow traversal time in whole seconds, never less than one.
    pub fn free_flow_ticks(&self, link: LinkId) -> u64 {
        let i = link.index();
        let secs = (self.link_length_m[i] / self.link_freespeed_mps[i]).round();
        (secs as u64).max(1)
    }

    /// Vehicles per second that may leave `link`, scaled by `flow_cap_factor`.
    pub fn flow_capacity_per_sec(&self, link: LinkId, flow_cap_factor: f64) -> f64 {
        let i = link.index();
        self.link_capacity[i] / self.link_capacity_period_secs[i] as f64 * flow_cap_factor
    }

    /// Vehicle-equivalents `link` can hold, before any rounding.
    pub fn storage_capacity(
        &self,
        link: LinkId,
        effective_vehicle_length_m: f64,
        storage_cap_factor: f64,
    ) -> f64 {
        let i = link.index();
        self.link_length_m[i] * self.link_lanes[i] / effective_vehicle_length_m
            * storage_cap_factor
    }

    // ── Names ─────────────────────────────────────────────────────────────

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_index.get(name).copied()
    }

    pub fn link_by_name(&self, name: &str) -> Option<LinkId> {
        self.link_index.get(name).copied()
    }

    pub fn node_name(&self, node: NodeId) -> Option<&str> {
        self.node_names.get(node.index())?.as_deref()
    }

    pub fn link_name(&self, link: LinkId) -> Option<&str> {
        self.link_names.get(link.index())?.as_deref()
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use qs_core::Coord;
/// use qs_network::{LinkSpec, NetworkBuilder};
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_node(Coord::new(0.0, 0.0));
/// let c = b.add_node(Coord::new(1_000.0, 0.0));
/// let l = b.add_link(a, c, LinkSpec::new(1_000.0, 13.9, 1_800.0, 1.0));
/// let net = b.build().unwrap();
/// assert_eq!(net.link_count(), 1);
/// assert_eq!(net.free_flow_ticks(l), 72);
/// ```
pub struct NetworkBuilder {
    nodes:                Vec<Coord>,
    node_names:           Vec<Option<String>>,
    raw_links:            Vec<RawLink>,
    capacity_period_secs: u32,
}

struct RawLink {
    from:   NodeId,
    to:     NodeId,
    spec:   LinkSpec,
    period: u32,
    name:   Option<String>,
}

impl NetworkBuilder {
    /// A builder whose links count capacity per hour.
    pub fn new() -> Self {
        Self {
            nodes:                Vec::new(),
            node_names:           Vec::new(),
            raw_links:            Vec::new(),
            capacity_period_secs: 3_600,
        }
    }

    /// Pre-allocate for the expected number of nodes and links.
    pub fn with_capacity(nodes: usize, links: usize) -> Self {
        Self {
            nodes:      Vec::with_capacity(nodes),
            node_names: Vec::with_capacity(nodes),
            raw_links:  Vec::with_capacity(links),
            ..Self::new()
        }
    }

    /// Set the capacity period applied to links added from now on.
    pub fn capacity_period(&mut self, secs: u32) -> &mut Self {
        self.capacity_period_secs = secs;
        self
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, coord: Coord) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(coord);
        self.node_names.push(None);
        id
    }

    /// Add a node that can later be found with [`Network::node_by_name`].
    pub fn add_named_node(&mut self, name: impl Into<String>, coord: Coord) -> NodeId {
        let id = self.add_node(coord);
        self.node_names[id.index()] = Some(name.into());
        id
    }

    /// Add a **directed** link from `from` to `to` and return its `LinkId`
    /// (sequential from 0).
    pub fn add_link(&mut self, from: NodeId, to: NodeId, spec: LinkSpec) -> LinkId {
        let id = LinkId(self.raw_links.len() as u32);
        self.raw_links.push(RawLink {
            from,
            to,
            spec,
            period: self.capacity_period_secs,
            name: None,
        });
        id
    }

    /// Add a link that can later be found with [`Network::link_by_name`].
    pub fn add_named_link(
        &mut self,
        name: impl Into<String>,
        from: NodeId,
        to: NodeId,
        spec: LinkSpec,
    ) -> LinkId {
        let id = self.add_link(from, to, spec);
        self.raw_links[id.index()].name = Some(name.into());
        id
    }

    /// Add a link whose length is the straight-line distance between its
    /// end nodes.
    ///
    /// Unknown nodes are reported by [`build`](Self::build).
    pub fn add_link_between(
        &mut self,
        from: NodeId,
        to: NodeId,
        freespeed_mps: f64,
        capacity: f64,
        lanes: f64,
    ) -> LinkId {
        let length_m = match (self.nodes.get(from.index()), self.nodes.get(to.index())) {
            (Some(a), Some(b)) => a.distance(*b),
            _ => f64::NAN,
        };
        self.add_link(from, to, LinkSpec { length_m, freespeed_mps, capacity, lanes })
    }

    /// Position of a node added earlier.
    pub fn node_coord(&self, id: NodeId) -> Option<Coord> {
        self.nodes.get(id.index()).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn link_count(&self) -> usize { self.raw_links.len() }

    /// Validate every link and produce a [`Network`].
    ///
    /// Fails on unknown end nodes, non-positive attributes, a zero capacity
    /// period, or a name used twice.
    pub fn build(self) -> NetworkResult<Network> {
        let node_count = self.nodes.len();
        let link_count = self.raw_links.len();

        for (i, raw) in self.raw_links.iter().enumerate() {
            let link = LinkId(i as u32);
            for node in [raw.from, raw.to] {
                if node.index() >= node_count {
                    return Err(NetworkError::UnknownNode { link, node });
                }
            }
            for (attr, value) in [
                ("length", raw.spec.length_m),
                ("freespeed", raw.spec.freespeed_mps),
                ("capacity", raw.spec.capacity),
                ("lanes", raw.spec.lanes),
            ] {
                if !(value.is_finite() && value > 0.0) {
                    return Err(NetworkError::NonPositive { link, attr, value });
                }
            }
            if raw.period == 0 {
                return Err(NetworkError::ZeroCapacityPeriod);
            }
        }

        let mut node_index = NameIndex::default();
        for (i, name) in self.node_names.iter().enumerate() {
            let Some(name) = name else { continue };
            if node_index.insert(name.clone(), NodeId(i as u32)).is_some() {
                return Err(NetworkError::DuplicateName { kind: "node", name: name.clone() });
            }
        }
        let mut link_index = NameIndex::default();
        for (i, raw) in self.raw_links.iter().enumerate() {
            let Some(name) = &raw.name else { continue };
            if link_index.insert(name.clone(), LinkId(i as u32)).is_some() {
                return Err(NetworkError::DuplicateName { kind: "link", name: name.clone() });
            }
        }

        let link_from: Vec<NodeId> = self.raw_links.iter().map(|l| l.from).collect();
        let link_to:   Vec<NodeId> = self.raw_links.iter().map(|l| l.to).collect();
        let (node_out_start, out_links) = csr(node_count, &link_from);
        let (node_in_start, in_links)   = csr(node_count, &link_to);
        debug_assert_eq!(out_links.len(), link_count);

        Ok(Network {
            node_coord: self.nodes,
            node_in_start,
            in_links,
            node_out_start,
            out_links,
            link_from,
            link_to,
            link_length_m:             self.raw_links.iter().map(|l| l.spec.length_m).collect(),
            link_freespeed_mps:        self.raw_links.iter().map(|l| l.spec.freespeed_mps).collect(),
            link_capacity:             self.raw_links.iter().map(|l| l.spec.capacity).collect(),
            link_lanes:                self.raw_links.iter().map(|l| l.spec.lanes).collect(),
            link_capacity_period_secs: self.raw_links.iter().map(|l| l.period).collect(),
            node_names: self.node_names,
            link_names: self.raw_links.into_iter().map(|l| l.name).collect(),
            node_index,
            link_index,
        })
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Group link ids by `key[link]` into CSR form.
///
/// A counting sort: links are visited in ascending id order, so each row of
/// the result stays sorted by id.
fn csr(node_count: usize, key: &[NodeId]) -> (Vec<u32>, Vec<LinkId>) {
    let mut start = vec![0u32; node_count + 1];
    for node in key {
        start[node.index() + 1] += 1;
    }
    for i in 1..=node_count {
        start[i] += start[i - 1];
    }

    let mut fill: Vec<u32> = start[..node_count].to_vec();
    let mut links = vec![LinkId::INVALID; key.len()];
    for (i, node) in key.iter().enumerate() {
        let slot = &mut fill[node.index()];
        links[*slot as usize] = LinkId(i as u32);
        *slot += 1;
    }
    (start, links)
}
