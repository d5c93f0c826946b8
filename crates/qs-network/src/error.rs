//! Network construction error type.

use thiserror::Error;

use qs_core::{LinkId, NodeId};

/// Errors produced while building a `Network`.
///
/// All of them are configuration errors: they surface before the first
/// tick and abort the run.
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("link {link} references unknown node {node}")]
    UnknownNode { link: LinkId, node: NodeId },

    #[error("link {link}: {attr} must be positive, got {value}")]
    NonPositive { link: LinkId, attr: &'static str, value: f64 },

    #[error("duplicate {kind} name {name:?}")]
    DuplicateName { kind: &'static str, name: String },

    #[error("capacity period must be at least one second")]
    ZeroCapacityPeriod,
}

pub type NetworkResult<T> = Result<T, NetworkError>;
