use qs_core::{AgentId, LinkId};
use thiserror::Error;

use crate::Vehicle;

/// A link refused a vehicle because its storage is exhausted.
///
/// Expected under congestion.  The vehicle is handed back so the caller can
/// keep it where it was and retry on a later tick.
#[derive(Debug, Error)]
#[error("link {link} is full, {} must wait", .vehicle.agent)]
pub struct CapacityExceeded {
    pub link:    LinkId,
    pub vehicle: Vehicle,
}

/// Broken engine contracts.  Any of these aborts the run.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("link {link}: occupancy {occupancy} exceeds storage capacity {slots}")]
    StorageOverflow { link: LinkId, occupancy: usize, slots: usize },

    #[error("agent {agent} routed onto {link}, which is not in the network")]
    UnknownLink { agent: AgentId, link: LinkId },

    #[error("agent {agent} cannot move from {from} to {to}: links do not meet")]
    Misrouted { agent: AgentId, from: LinkId, to: LinkId },
}

pub type EngineResult<T> = Result<T, EngineError>;
