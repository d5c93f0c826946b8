//! `qs-sim`: tick loop orchestrator for the queue simulation.
//!
//! # Tick loop
//!
//! ```text
//! for tick in start..=end (step tick_secs):
//!   ① Departures:  drain agents whose activity ends; emit ActivityEnd and
//!                   Departure; serve per-link backlogs in ascending LinkId,
//!                   each until its first link is full (LinkEntered).
//!   ② Advance:     promote vehicles whose free-flow time is over into
//!                   their link's buffer (parallel with `parallel`).
//!   ③ Transfer:    node mover per node with buffered inflow, ascending
//!                   NodeId (LinkLeft + LinkEntered, or LinkLeft + Arrival).
//!   ④ Arrivals:    start the next activity (ActivityStart) and schedule
//!                   its end in the departure queue.
//! after the last tick:
//!   Stuck for every agent still departing or travelling.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the advance phase on Rayon's thread pool.         |
//! | `fx-hash`  | FxHash for the network's name index.                   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use qs_core::SimConfig;
//! use qs_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), network)
//!     .plans(plans)
//!     .build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! println!("{} agents stuck", summary.stuck.len());
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod stop;
pub mod summary;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use stop::StopHandle;
pub use summary::{RunSummary, TickStats};
