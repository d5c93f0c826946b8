//! `qs-engine`: link queues and the node mover.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                    |
//! |-------------------|-------------------------------------------------------------|
//! | [`vehicle`]       | `Vehicle`: agent, mode, shared route, route position       |
//! | [`flow`]          | `FlowCredit`: fixed-point flow-capacity accumulator        |
//! | [`link_queue`]    | `LinkQueue`: in-transit queue, buffer, storage, flow       |
//! | [`node_mover`]    | `QueueNetwork::move_node`: per-node transfer               |
//! | [`queue_network`] | `QueueNetwork`: all queues plus the active-link set        |
//! | [`error`]         | `CapacityExceeded`, `EngineError`, `EngineResult<T>`        |
//!
//! # Movement model (queue per link)
//!
//! 1. A vehicle admitted to a link at tick `t` travels at free-flow speed and
//!    joins the link's buffer at `t + free_flow_ticks`.
//! 2. Each tick the buffer releases vehicles as flow credit allows.
//! 3. A released vehicle only leaves if the next link of its route has
//!    storage left; otherwise it returns to the buffer head and the link is
//!    done for the tick.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Runs the advance phase on Rayon's thread pool.           |

pub mod error;
pub mod flow;
pub mod link_queue;
pub mod node_mover;
pub mod queue_network;
pub mod vehicle;


pub use error::{CapacityExceeded, EngineError, EngineResult};
pub use flow::{CREDIT_SCALE, FlowCredit};
pub use link_queue::LinkQueue;
pub use queue_network::QueueNetwork;
pub use vehicle::Vehicle;
