//! Emission and dispatch.

use crate::{Event, EventKind};

// ── EventSink ─────────────────────────────────────────────────────────────────

/// Anything the engine can emit events into.
///
/// Events arrive in non-decreasing tick order, each exactly once.
pub trait EventSink {
    fn emit(&mut self, event: &Event);
}

impl EventSink for Vec<Event> {
    #[inline]
    fn emit(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn emit(&mut self, event: &Event) {
        (**self).emit(event);
    }
}

// ── EventHandler ──────────────────────────────────────────────────────────────

/// A consumer registered with an [`EventBus`].
///
/// # Example: arrival counter
///
/// ```
/// use qs_events::{Event, EventBus, EventHandler, EventKind, EventSink};
/// use qs_core::{AgentId, LinkId, Tick, TransportMode};
///
/// #[derive(Default)]
/// struct Arrivals(usize);
///
/// impl EventHandler for Arrivals {
///     fn handle(&mut self, _event: &Event) {
///         self.0 += 1;
///     }
/// }
///
/// let mut arrivals = Arrivals::default();
/// {
///     let mut bus = EventBus::new();
///     bus.subscribe(&mut arrivals, &[EventKind::Arrival]);
///     bus.emit(&Event::Arrival {
///         tick: Tick(5), agent: AgentId(0), link: LinkId(1), mode: TransportMode::Car,
///     });
/// }
/// assert_eq!(arrivals.0, 1);
/// ```
pub trait EventHandler {
    /// Called once per event of a subscribed kind, in emission order.
    fn handle(&mut self, event: &Event);

    /// Called by [`EventBus::finish`] after the last event of a run.
    fn finish(&mut self) {}
}

// ── EventBus ──────────────────────────────────────────────────────────────────

/// Registration handle returned by [`EventBus::subscribe`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct HandlerId(pub usize);

/// Per-kind subscriber registry.
///
/// Handlers are borrowed for the bus's lifetime, so the caller keeps
/// ownership and reads results once the bus is dropped.  For each event,
/// subscribed handlers run in registration order.
pub struct EventBus<'a> {
    handlers: Vec<&'a mut dyn EventHandler>,
    /// `by_kind[k]` lists indices into `handlers`, ascending.
    by_kind:  [Vec<usize>; EventKind::COUNT],
    emitted:  u64,
}

impl<'a> EventBus<'a> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            by_kind:  Default::default(),
            emitted:  0,
        }
    }

    /// Register `handler` for the given kinds.
    ///
    /// Listing a kind twice has no extra effect.
    pub fn subscribe(&mut self, handler: &'a mut dyn EventHandler, kinds: &[EventKind]) -> HandlerId {
        let id = self.handlers.len();
        self.handlers.push(handler);
        for kind in kinds {
            let list = &mut self.by_kind[kind.index()];
            if !list.contains(&id) {
                list.push(id);
            }
        }
        HandlerId(id)
    }

    /// Register `handler` for every kind.
    pub fn subscribe_all(&mut self, handler: &'a mut dyn EventHandler) -> HandlerId {
        self.subscribe(handler, &EventKind::ALL)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Number of handlers that will see events of `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.by_kind[kind.index()].len()
    }

    /// Total events emitted through this bus.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Tell every handler that the stream is complete.
    pub fn finish(&mut self) {
        for handler in self.handlers.iter_mut() {
            handler.finish();
        }
    }
}

impl Default for EventBus<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus<'_> {
    fn emit(&mut self, event: &Event) {
        self.emitted += 1;
        for &i in &self.by_kind[event.kind().index()] {
            self.handlers[i].handle(event);
        }
    }
}

// ── EventLog ──────────────────────────────────────────────────────────────────

/// Records every event it sees.  Handy in tests and for small runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events of one kind, in emission order.
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(move |e| e.kind() == kind)
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn into_inner(self) -> Vec<Event> {
        self.events
    }
}

impl EventHandler for EventLog {
    fn handle(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}
