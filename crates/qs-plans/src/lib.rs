//! `qs-plans`: agent plans and the runtime that walks them.
//!
//! # Crate layout
//!
//! | Module              | Contents                                               |
//! |---------------------|--------------------------------------------------------|
//! | [`plan`]            | `Activity`, `Leg`, `Plan`                              |
//! | [`validate`]        | `validate_plan`, `validate_plans` (against a `Network`) |
//! | [`cursor`]          | `PlanCursor`, `AgentRuntime`, `LegStart`, `NextActivity` |
//! | [`departure_queue`] | `DepartureQueue` (`BTreeMap<Tick, Vec<AgentId>>`)      |
//! | [`error`]           | `PlanError`, `PlanResult<T>`                           |
//!
//! # Activity end rules (summary)
//!
//! ```text
//! end_time and duration  → min(end_time, arrival + duration)
//! end_time only          → end_time
//! duration only          → arrival + duration
//! neither                → the next leg's planned departure
//! last activity          → never ends
//! ```
//!
//! The loop snaps end times onto its tick grid and never schedules a
//! departure earlier than the tick after arrival.

pub mod cursor;
pub mod departure_queue;
pub mod error;
pub mod plan;
pub mod validate;

#[cfg(test)]
mod tests;

pub use cursor::{AgentRuntime, LegStart, NextActivity, PlanCursor};
pub use departure_queue::DepartureQueue;
pub use error::{PlanError, PlanResult};
pub use plan::{Activity, Leg, Plan};
pub use validate::{validate_plan, validate_plans};
