//! `qs-network`: the directed road graph the queue engine runs on.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `Network` (SoA link arrays + CSR in/out adjacency), `NetworkBuilder`, `LinkSpec` |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `serde`   | Derives `Serialize`/`Deserialize` on `LinkSpec`.           |
//! | `fx-hash` | Uses `FxHashMap` for the node/link name index.             |

pub mod error;
pub mod network;


pub use error::{NetworkError, NetworkResult};
pub use network::{LinkSpec, Network, NetworkBuilder};
