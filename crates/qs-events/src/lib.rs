//! `qs-events`: the ordered event stream the engine produces.
//!
//! The engine only knows the [`EventSink`] trait.  Consumers either collect
//! the stream directly (`Vec<Event>`, [`EventLog`]) or register
//! [`EventHandler`]s with an [`EventBus`], which dispatches each event to the
//! handlers subscribed to its [`EventKind`].
//!
//! # Crate layout
//!
//! | Module    | Contents                                            |
//! |-----------|-----------------------------------------------------|
//! | [`event`] | `Event`, `EventKind`                                |
//! | [`bus`]   | `EventSink`, `EventHandler`, `EventBus`, `EventLog` |

pub mod bus;
pub mod event;

#[cfg(test)]
mod tests;

pub use bus::{EventBus, EventHandler, EventLog, EventSink, HandlerId};
pub use event::{Event, EventKind};
