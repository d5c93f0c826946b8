//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick`: one tick is one
//! simulated second since midnight of the simulated day.  The loop does not
//! necessarily visit every tick; `SimClock` steps from `start` to `end`
//! (inclusive) in increments of `step` seconds.
//!
//! Using an integer tick as the canonical time unit means all schedule
//! arithmetic is exact (no floating-point drift) and comparisons are O(1).
//! Times past 24:00:00 are legal; a day's plans routinely spill over.

use std::fmt;

use crate::CoreError;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation time in whole seconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Construct from an `hh:mm:ss` triple.  Hours may exceed 23.
    #[inline]
    pub const fn from_hms(hours: u64, minutes: u64, seconds: u64) -> Tick {
        Tick(hours * 3_600 + minutes * 60 + seconds)
    }

    /// Return the tick `n` seconds after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Seconds elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }

    /// The hour-of-run bin this tick falls into (`0` for 00:00:00–00:59:59).
    #[inline]
    pub fn hour(self) -> u64 {
        self.0 / 3_600
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0 / 3_600;
        let m = (self.0 % 3_600) / 60;
        let s = self.0 % 60;
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

/// Parse `hh:mm:ss` (or `hh:mm`) into a [`Tick`].
///
/// Hours are unbounded so that `30:00:00` (6 a.m. the next day) parses.
pub fn parse_time(input: &str) -> Result<Tick, CoreError> {
    let err = |reason: &'static str| CoreError::Time { input: input.to_owned(), reason };

    let mut parts = input.trim().split(':');
    let mut field = |name: &'static str| -> Result<Option<u64>, CoreError> {
        match parts.next() {
            None => Ok(None),
            Some(p) => p.parse::<u64>().map(Some).map_err(|_| err(name)),
        }
    };

    let h = field("hours are not a number")?.ok_or_else(|| err("empty"))?;
    let m = field("minutes are not a number")?.ok_or_else(|| err("expected hh:mm[:ss]"))?;
    let s = field("seconds are not a number")?.unwrap_or(0);
    if parts.next().is_some() {
        return Err(err("too many fields"));
    }
    if m >= 60 || s >= 60 {
        return Err(err("minutes and seconds must be below 60"));
    }
    Ok(Tick::from_hms(h, m, s))
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Steps through `[start, end]` in fixed increments.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimClock {
    /// First visited tick.
    pub start: Tick,
    /// Last tick that may be visited (inclusive).
    pub end: Tick,
    /// Seconds advanced per step.  Always ≥ 1 for a validated config.
    pub step: u32,
    /// The tick the loop will process next.
    pub current: Tick,
}

impl SimClock {
    pub fn new(start: Tick, end: Tick, step: u32) -> Self {
        Self { start, end, step, current: start }
    }

    /// Advance the clock by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.current = self.current + self.step as u64;
    }

    /// `true` once the clock has moved past `end`.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.current > self.end
    }

    /// Number of steps from `current` to the end of the horizon (inclusive).
    pub fn remaining_steps(&self) -> u64 {
        if self.is_finished() {
            return 0;
        }
        (self.end - self.current) / self.step as u64 + 1
    }

    /// The first visited tick at or after `t`.
    ///
    /// Used to translate plan times (arbitrary seconds) onto the loop's grid.
    pub fn align_up(&self, t: Tick) -> Tick {
        if t <= self.start {
            return self.start;
        }
        let step = self.step as u64;
        let offset = (t - self.start).div_ceil(step) * step;
        self.start + offset
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}..={} step {}s]", self.current, self.start, self.end, self.step)
    }
}
