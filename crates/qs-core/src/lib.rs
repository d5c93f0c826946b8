//! `qs-core`: foundational types for the `qsim` queue simulator.
//!
//! This crate is a dependency of every other `qs-*` crate.  It intentionally
//! has no `qs-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `LinkId`, `ActivityId`           |
//! | [`geo`]         | `Coord`, planar distance                              |
//! | [`time`]        | `Tick`, `SimClock`, `parse_time`                      |
//! | [`config`]      | `SimConfig` and its validation                        |
//! | [`transport`]   | `TransportMode` enum                                  |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;
pub mod transport;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{CoreError, CoreResult};
pub use geo::Coord;
pub use ids::{ActivityId, AgentId, LinkId, NodeId};
pub use time::{SimClock, Tick, parse_time};
pub use transport::TransportMode;
