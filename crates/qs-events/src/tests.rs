//! Unit tests for qs-events.

#[cfg(test)]
mod helpers {
    use qs_core::{ActivityId, AgentId, LinkId, Tick, TransportMode};
    use crate::Event;

    /// One agent's complete single-link trip, in engine emission order.
    pub fn trip(agent: u32) -> Vec<Event> {
        let agent = AgentId(agent);
        vec![
            Event::ActivityEnd { tick: Tick(10), agent, link: LinkId(0), activity: ActivityId(0) },
            Event::Departure { tick: Tick(10), agent, link: LinkId(0), mode: TransportMode::Car },
            Event::LinkEntered { tick: Tick(10), agent, link: LinkId(0) },
            Event::LinkLeft { tick: Tick(20), agent, link: LinkId(0) },
            Event::LinkEntered { tick: Tick(20), agent, link: LinkId(1) },
            Event::LinkLeft { tick: Tick(30), agent, link: LinkId(1) },
            Event::Arrival { tick: Tick(30), agent, link: LinkId(1), mode: TransportMode::Car },
            Event::ActivityStart { tick: Tick(30), agent, link: LinkId(1), activity: ActivityId(1) },
        ]
    }
}

#[cfg(test)]
mod event {
    use qs_core::{AgentId, LinkId, Tick, TransportMode};
    use crate::{Event, EventKind};

    #[test]
    fn accessors() {
        let e = Event::Departure {
            tick: Tick(42),
            agent: AgentId(3),
            link: LinkId(7),
            mode: TransportMode::Bike,
        };
        assert_eq!(e.tick(), Tick(42));
        assert_eq!(e.agent(), AgentId(3));
        assert_eq!(e.link(), LinkId(7));
        assert_eq!(e.kind(), EventKind::Departure);
        assert_eq!(e.mode(), Some(TransportMode::Bike));
        assert_eq!(e.activity(), None);
    }

    #[test]
    fn kinds_are_dense() {
        for (i, kind) in EventKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn display() {
        let e = Event::LinkLeft { tick: Tick(3_661), agent: AgentId(1), link: LinkId(2) };
        assert_eq!(e.to_string(), "01:01:01 left link agent 1 link 2");
    }

    #[test]
    fn trip_ticks_are_non_decreasing() {
        let events = super::helpers::trip(0);
        assert!(events.windows(2).all(|w| w[0].tick() <= w[1].tick()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_is_internally_tagged() {
        let e = Event::Stuck { tick: Tick(9), agent: AgentId(1), link: LinkId(4) };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains(r#""type":"stuck""#), "{json}");
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}

#[cfg(test)]
mod bus {
    use crate::{Event, EventBus, EventHandler, EventKind, EventLog, EventSink};

    #[derive(Default)]
    struct Counter {
        seen:     usize,
        finished: bool,
    }

    impl EventHandler for Counter {
        fn handle(&mut self, _event: &Event) {
            self.seen += 1;
        }
        fn finish(&mut self) {
            self.finished = true;
        }
    }

    /// Appends its tag to a shared trace so dispatch order is observable.
    struct Tagger<'t> {
        tag:   char,
        trace: &'t std::cell::RefCell<String>,
    }

    impl EventHandler for Tagger<'_> {
        fn handle(&mut self, _event: &Event) {
            self.trace.borrow_mut().push(self.tag);
        }
    }

    #[test]
    fn dispatch_by_kind() {
        let mut links = Counter::default();
        let mut everything = EventLog::new();
        {
            let mut bus = EventBus::new();
            bus.subscribe(&mut links, &[EventKind::LinkEntered, EventKind::LinkLeft]);
            bus.subscribe_all(&mut everything);
            assert_eq!(bus.subscriber_count(EventKind::LinkLeft), 2);
            assert_eq!(bus.subscriber_count(EventKind::Arrival), 1);

            for e in super::helpers::trip(0) {
                bus.emit(&e);
            }
            assert_eq!(bus.emitted(), 8);
            bus.finish();
        }
        assert_eq!(links.seen, 4);
        assert!(links.finished);
        assert_eq!(everything.events(), super::helpers::trip(0).as_slice());
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let trace = std::cell::RefCell::new(String::new());
        let mut a = Tagger { tag: 'a', trace: &trace };
        let mut b = Tagger { tag: 'b', trace: &trace };
        {
            let mut bus = EventBus::new();
            bus.subscribe(&mut b, &[EventKind::Arrival]);
            bus.subscribe(&mut a, &[EventKind::Arrival, EventKind::Arrival]);
            for e in super::helpers::trip(0) {
                bus.emit(&e);
            }
        }
        assert_eq!(trace.into_inner(), "ba");
    }

    #[test]
    fn unsubscribed_kinds_are_dropped() {
        let mut bus = EventBus::new();
        for e in super::helpers::trip(1) {
            bus.emit(&e);
        }
        assert_eq!(bus.emitted(), 8);
        assert_eq!(bus.handler_count(), 0);
    }

    #[test]
    fn log_filters_by_kind() {
        let mut log = EventLog::new();
        for e in super::helpers::trip(0).iter().chain(super::helpers::trip(1).iter()) {
            log.emit(e);
        }
        assert_eq!(log.len(), 16);
        assert_eq!(log.count(EventKind::LinkEntered), 4);
        let arrivals: Vec<_> = log.of_kind(EventKind::Arrival).map(|e| e.agent().0).collect();
        assert_eq!(arrivals, vec![0, 1]);
    }

    #[test]
    fn vec_and_mut_ref_are_sinks() {
        fn drive<S: EventSink>(mut sink: S) {
            for e in super::helpers::trip(0) {
                sink.emit(&e);
            }
        }
        let mut events: Vec<Event> = Vec::new();
        drive(&mut events);
        assert_eq!(events.len(), 8);
    }
}
