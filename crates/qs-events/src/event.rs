//! Event types.
//!
//! Every event carries the tick it happened at.  Within one tick, events
//! appear in the engine's fixed processing order: departures, then node
//! transfers by ascending node and incoming link id, then arrivals.

use std::fmt;

use qs_core::{ActivityId, AgentId, LinkId, Tick, TransportMode};

/// Something that happened to one agent at one tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Event {
    /// The agent finished an activity located on `link`.
    ActivityEnd { tick: Tick, agent: AgentId, link: LinkId, activity: ActivityId },

    /// The agent starts a leg from `link`.  Entering the network may happen
    /// at a later tick if the first link is full.
    Departure { tick: Tick, agent: AgentId, link: LinkId, mode: TransportMode },

    /// The agent's vehicle was admitted to `link`.
    LinkEntered { tick: Tick, agent: AgentId, link: LinkId },

    /// The agent's vehicle left `link` through its downstream node.
    LinkLeft { tick: Tick, agent: AgentId, link: LinkId },

    /// The agent completed a leg on `link`.
    Arrival { tick: Tick, agent: AgentId, link: LinkId, mode: TransportMode },

    /// The agent begins an activity located on `link`.
    ActivityStart { tick: Tick, agent: AgentId, link: LinkId, activity: ActivityId },

    /// The run ended while the agent was still travelling or waiting to
    /// enter its first link.
    Stuck { tick: Tick, agent: AgentId, link: LinkId },
}

impl Event {
    #[inline]
    pub fn tick(&self) -> Tick {
        match *self {
            Event::ActivityEnd { tick, .. }
            | Event::Departure { tick, .. }
            | Event::LinkEntered { tick, .. }
            | Event::LinkLeft { tick, .. }
            | Event::Arrival { tick, .. }
            | Event::ActivityStart { tick, .. }
            | Event::Stuck { tick, .. } => tick,
        }
    }

    #[inline]
    pub fn agent(&self) -> AgentId {
        match *self {
            Event::ActivityEnd { agent, .. }
            | Event::Departure { agent, .. }
            | Event::LinkEntered { agent, .. }
            | Event::LinkLeft { agent, .. }
            | Event::Arrival { agent, .. }
            | Event::ActivityStart { agent, .. }
            | Event::Stuck { agent, .. } => agent,
        }
    }

    #[inline]
    pub fn link(&self) -> LinkId {
        match *self {
            Event::ActivityEnd { link, .. }
            | Event::Departure { link, .. }
            | Event::LinkEntered { link, .. }
            | Event::LinkLeft { link, .. }
            | Event::Arrival { link, .. }
            | Event::ActivityStart { link, .. }
            | Event::Stuck { link, .. } => link,
        }
    }

    #[inline]
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ActivityEnd { .. }   => EventKind::ActivityEnd,
            Event::Departure { .. }     => EventKind::Departure,
            Event::LinkEntered { .. }   => EventKind::LinkEntered,
            Event::LinkLeft { .. }      => EventKind::LinkLeft,
            Event::Arrival { .. }       => EventKind::Arrival,
            Event::ActivityStart { .. } => EventKind::ActivityStart,
            Event::Stuck { .. }         => EventKind::Stuck,
        }
    }

    /// Leg mode for departures and arrivals.
    pub fn mode(&self) -> Option<TransportMode> {
        match *self {
            Event::Departure { mode, .. } | Event::Arrival { mode, .. } => Some(mode),
            _ => None,
        }
    }

    /// Activity index for activity start and end events.
    pub fn activity(&self) -> Option<ActivityId> {
        match *self {
            Event::ActivityEnd { activity, .. } | Event::ActivityStart { activity, .. } => {
                Some(activity)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.tick(), self.kind(), self.agent(), self.link())
    }
}

// ── EventKind ─────────────────────────────────────────────────────────────────

/// Discriminant of [`Event`], used as the subscription key.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventKind {
    ActivityEnd,
    Departure,
    LinkEntered,
    LinkLeft,
    Arrival,
    ActivityStart,
    Stuck,
}

impl EventKind {
    pub const COUNT: usize = 7;

    pub const ALL: [EventKind; Self::COUNT] = [
        EventKind::ActivityEnd,
        EventKind::Departure,
        EventKind::LinkEntered,
        EventKind::LinkLeft,
        EventKind::Arrival,
        EventKind::ActivityStart,
        EventKind::Stuck,
    ];

    /// Dense index in `0..COUNT`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::ActivityEnd   => "actend",
            EventKind::Departure     => "departure",
            EventKind::LinkEntered   => "entered link",
            EventKind::LinkLeft      => "left link",
            EventKind::Arrival       => "arrival",
            EventKind::ActivityStart => "actstart",
            EventKind::Stuck         => "stuckAndAbort",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
