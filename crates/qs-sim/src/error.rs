use qs_core::{AgentId, CoreError, LinkId, Tick};
use qs_engine::EngineError;
use qs_network::NetworkError;
use qs_plans::PlanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("plan error: {0}")]
    Plan(#[from] PlanError),

    /// A core contract broke mid-run.  The run is aborted.
    #[error("invariant broken at {tick}: {what}")]
    Invariant {
        tick:  Tick,
        link:  Option<LinkId>,
        agent: Option<AgentId>,
        what:  String,
    },
}

impl SimError {
    pub(crate) fn engine(tick: Tick, err: EngineError) -> Self {
        let (link, agent) = match &err {
            EngineError::StorageOverflow { link, .. } => (Some(*link), None),
            EngineError::UnknownLink { agent, link } => (Some(*link), Some(*agent)),
            EngineError::Misrouted { agent, from, .. } => (Some(*from), Some(*agent)),
        };
        SimError::Invariant { tick, link, agent, what: err.to_string() }
    }

    pub(crate) fn cursor(tick: Tick, agent: AgentId, link: Option<LinkId>, err: PlanError) -> Self {
        SimError::Invariant { tick, link, agent: Some(agent), what: err.to_string() }
    }
}

pub type SimResult<T> = Result<T, SimError>;
