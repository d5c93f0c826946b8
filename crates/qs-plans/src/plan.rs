//! Core plan types: `Activity`, `Leg`, and `Plan`.
//!
//! # Plan shape
//!
//! A plan alternates activities and legs, starting and ending with an
//! activity:
//!
//! ```text
//! activity 0 ─ leg 0 ─ activity 1 ─ leg 1 ─ … ─ activity n
//! ```
//!
//! Leg `i` connects activity `i` to activity `i + 1`.  The constructor API
//! makes any other shape unrepresentable.
//!
//! # Routes
//!
//! A leg's route lists every link the vehicle occupies, from the link of the
//! origin activity to the link of the destination activity.  Routes are
//! shared (`Arc<[LinkId]>`) so that handing one to a vehicle never copies it.

use std::sync::Arc;

use qs_core::{ActivityId, LinkId, Tick, TransportMode};

// ── Activity ──────────────────────────────────────────────────────────────────

/// One stay at a location.
///
/// `activity_id` is application-defined (e.g. 0 = home, 1 = work).  The
/// engine only cares about the link and the end-time rules.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activity {
    /// Application-defined activity type identifier.
    pub activity_id: ActivityId,

    /// Link the activity takes place on.
    pub link: LinkId,

    /// Absolute time at which the activity ends.
    pub end_time: Option<Tick>,

    /// Planned duration in seconds, counted from arrival.
    pub duration_secs: Option<u64>,
}

impl Activity {
    /// An activity with no end rule.  Fine as the last activity of a plan.
    pub fn new(activity_id: ActivityId, link: LinkId) -> Self {
        Self { activity_id, link, end_time: None, duration_secs: None }
    }

    pub fn with_end_time(mut self, end: Tick) -> Self {
        self.end_time = Some(end);
        self
    }

    pub fn with_duration(mut self, secs: u64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// End time for an activity started at `start`.
    ///
    /// With both rules set the earlier one wins.  `None` if neither is set.
    pub fn end_after(&self, start: Tick) -> Option<Tick> {
        match (self.end_time, self.duration_secs) {
            (Some(end), Some(d)) => Some(end.min(start + d)),
            (Some(end), None)    => Some(end),
            (None, Some(d))      => Some(start + d),
            (None, None)         => None,
        }
    }
}

// ── Leg ───────────────────────────────────────────────────────────────────────

/// A trip between two consecutive activities.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    pub mode: TransportMode,

    /// Every link of the trip, origin activity link first.
    pub route: Arc<[LinkId]>,

    /// Planned departure, used when the preceding activity has no end rule
    /// of its own.
    pub departure_time: Option<Tick>,
}

impl Leg {
    pub fn new(mode: TransportMode, route: impl Into<Arc<[LinkId]>>) -> Self {
        Self { mode, route: route.into(), departure_time: None }
    }

    /// A car leg along `route`.
    pub fn car(route: impl Into<Arc<[LinkId]>>) -> Self {
        Self::new(TransportMode::Car, route)
    }

    pub fn with_departure_time(mut self, t: Tick) -> Self {
        self.departure_time = Some(t);
        self
    }

    /// `true` if the trip never enters the network: origin and destination
    /// share a link.
    pub fn stays_on_link(&self) -> bool {
        self.route.len() <= 1
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────────

/// One agent's day: alternating activities and legs.
///
/// # Example
///
/// ```
/// use qs_core::{ActivityId, LinkId, Tick};
/// use qs_plans::{Activity, Leg, Plan};
///
/// let home = ActivityId(0);
/// let work = ActivityId(1);
/// let plan = Plan::new(Activity::new(home, LinkId(0)).with_end_time(Tick::from_hms(7, 0, 0)))
///     .then(Leg::car(vec![LinkId(0), LinkId(1), LinkId(2)]),
///           Activity::new(work, LinkId(2)).with_duration(8 * 3_600))
///     .then(Leg::car(vec![LinkId(2), LinkId(3), LinkId(0)]),
///           Activity::new(home, LinkId(0)));
/// assert_eq!(plan.leg_count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    /// `activities.len() == legs.len() + 1`.
    activities: Vec<Activity>,
    legs:       Vec<Leg>,
}

impl Plan {
    /// A plan that starts (and, until extended, ends) with `first`.
    pub fn new(first: Activity) -> Self {
        Self { activities: vec![first], legs: Vec::new() }
    }

    /// Append a leg and the activity it leads to.
    pub fn then(mut self, leg: Leg, activity: Activity) -> Self {
        self.push(leg, activity);
        self
    }

    pub fn push(&mut self, leg: Leg, activity: Activity) {
        self.legs.push(leg);
        self.activities.push(activity);
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn activity(&self, index: usize) -> Option<&Activity> {
        self.activities.get(index)
    }

    pub fn leg(&self, index: usize) -> Option<&Leg> {
        self.legs.get(index)
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Index of the final activity, which never ends.
    pub fn last_activity(&self) -> usize {
        self.activities.len() - 1
    }

    /// When activity `index`, started at `start`, ends.
    ///
    /// Falls back to the planned departure of the following leg.  Always
    /// `None` for the last activity.
    pub fn activity_end(&self, index: usize, start: Tick) -> Option<Tick> {
        if index >= self.last_activity() {
            return None;
        }
        self.activities[index]
            .end_after(start)
            .or_else(|| self.legs[index].departure_time)
    }
}
