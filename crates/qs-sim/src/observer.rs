//! Simulation observer trait for progress reporting and data collection.

use qs_core::Tick;
use qs_events::{Event, EventBus, EventLog, EventSink};

use crate::{RunSummary, TickStats};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] and
/// [`Sim::run_ticks`][crate::Sim::run_ticks].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
///         if tick.0 % 3600 == 0 {
///             println!("{tick}: {} vehicles on the network", stats.in_network);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for every event, in emission order.
    fn on_event(&mut self, _event: &Event) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &TickStats) {}

    /// Called once when `run` returns, after the `Stuck` events.
    fn on_sim_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

impl SimObserver for Vec<Event> {
    fn on_event(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

impl SimObserver for EventLog {
    fn on_event(&mut self, event: &Event) {
        self.emit(event);
    }
}

impl SimObserver for EventBus<'_> {
    fn on_event(&mut self, event: &Event) {
        self.emit(event);
    }

    fn on_sim_end(&mut self, _summary: &RunSummary) {
        self.finish();
    }
}

impl<O: SimObserver + ?Sized> SimObserver for &mut O {
    fn on_tick_start(&mut self, tick: Tick) {
        (**self).on_tick_start(tick);
    }

    fn on_event(&mut self, event: &Event) {
        (**self).on_event(event);
    }

    fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
        (**self).on_tick_end(tick, stats);
    }

    fn on_sim_end(&mut self, summary: &RunSummary) {
        (**self).on_sim_end(summary);
    }
}

/// Fan out to two observers, first `A` then `B`.
impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn on_tick_start(&mut self, tick: Tick) {
        self.0.on_tick_start(tick);
        self.1.on_tick_start(tick);
    }

    fn on_event(&mut self, event: &Event) {
        self.0.on_event(event);
        self.1.on_event(event);
    }

    fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
        self.0.on_tick_end(tick, stats);
        self.1.on_tick_end(tick, stats);
    }

    fn on_sim_end(&mut self, summary: &RunSummary) {
        self.0.on_sim_end(summary);
        self.1.on_sim_end(summary);
    }
}
