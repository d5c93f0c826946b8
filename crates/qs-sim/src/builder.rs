//! Fluent builder for constructing a [`Sim`].

use std::collections::BTreeMap;

use qs_core::SimConfig;
use qs_engine::QueueNetwork;
use qs_events::EventKind;
use qs_network::Network;
use qs_plans::{AgentRuntime, DepartureQueue, Plan, validate_plans};
use tracing::debug;

use crate::{Sim, SimResult, StopHandle};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: horizon, step, capacity factors, vehicle length
/// - [`Network`]: from [`qs_network::NetworkBuilder`]
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                        |
/// |--------------------|--------------------------------|
/// | `.plans(v)`        | No agents                      |
/// | `.plan(p)`         | Appends one agent              |
/// | `.stop_handle(h)`  | A fresh, never-triggered handle |
///
/// Agent ids are positions in the plan list.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, network)
///     .plans(plans)
///     .build()?;
/// let summary = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:  SimConfig,
    network: Network,
    plans:   Vec<Plan>,
    stop:    Option<StopHandle>,
}

impl SimBuilder {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, network: Network) -> Self {
        Self { config, network, plans: Vec::new(), stop: None }
    }

    /// Replace the population; agent `i` follows `plans[i]`.
    pub fn plans(mut self, plans: Vec<Plan>) -> Self {
        self.plans = plans;
        self
    }

    /// Append one agent.
    pub fn plan(mut self, plan: Plan) -> Self {
        self.plans.push(plan);
        self
    }

    /// Share `handle` with the built `Sim` so it can be stopped from outside.
    pub fn stop_handle(mut self, handle: StopHandle) -> Self {
        self.stop = Some(handle);
        self
    }

    /// Validate the configuration and every plan, schedule first departures,
    /// and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        validate_plans(&self.plans, &self.network)?;

        let clock      = self.config.make_clock();
        let agents     = AgentRuntime::new(self.plans);
        let departures = DepartureQueue::from_runtime(&agents, &clock);
        let queues     = QueueNetwork::new(&self.network, &self.config);

        debug!(
            agents = agents.len(),
            links = self.network.link_count(),
            scheduled = departures.len(),
            "simulation built"
        );

        Ok(Sim {
            config:    self.config,
            clock,
            network:   self.network,
            queues,
            agents,
            departures,
            waiting:   BTreeMap::new(),
            arrived:   Vec::new(),
            stop:      self.stop.unwrap_or_default(),
            totals:    [0; EventKind::COUNT],
            ticks:     0,
            last_tick: None,
        })
    }
}
