use thiserror::Error;

use qs_core::{AgentId, LinkId};

use crate::PlanCursor;

/// Errors produced by plan validation and cursor transitions.
///
/// Validation errors are configuration errors reported before the first
/// tick.  `InvalidTransition` means the caller drove a cursor out of order.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("agent {agent}: link {link} is not in the network")]
    UnknownLink { agent: AgentId, link: LinkId },

    #[error("agent {agent}, leg {leg}: route must start on {expected}, starts on {found}")]
    RouteStart { agent: AgentId, leg: usize, expected: LinkId, found: LinkId },

    #[error("agent {agent}, leg {leg}: route must end on {expected}, ends on {found}")]
    RouteEnd { agent: AgentId, leg: usize, expected: LinkId, found: LinkId },

    #[error("agent {agent}, leg {leg}: {from} does not lead into {to}")]
    Disconnected { agent: AgentId, leg: usize, from: LinkId, to: LinkId },

    #[error("agent {agent}, leg {leg}: empty route between different links")]
    EmptyRoute { agent: AgentId, leg: usize },

    #[error("agent {agent}: activity {activity} has no end time, duration, or planned departure")]
    NoEndTime { agent: AgentId, activity: usize },

    #[error("agent {agent}: cannot {action} from {cursor:?}")]
    InvalidTransition { agent: AgentId, action: &'static str, cursor: PlanCursor },
}

pub type PlanResult<T> = Result<T, PlanError>;
