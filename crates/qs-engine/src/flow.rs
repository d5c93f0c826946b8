//! Flow-capacity accounting for one link.
//!
//! # Fixed-point credit
//!
//! Credit is counted in integer units, [`CREDIT_SCALE`] units per vehicle.
//! The per-tick rate is rounded **up** to a whole unit, so a link with
//! capacity `c` per hour offers at least `c` releases over any hour of
//! continuous demand, and floating-point drift cannot lose a vehicle over a
//! long run.
//!
//! # Cap policy
//!
//! With `r` the per-tick rate and `S` one vehicle:
//!
//! ```text
//! busy tick (buffer was non-empty):  credit = min(credit + r, S + r)
//! buffer runs empty:                 credit = min(credit, max(0, S - r))
//! first tick after k idle ticks:     credit = min(credit + (k-1)·r, max(0, S - r)) + r
//! ```
//!
//! The first busy tick after an idle period therefore offers exactly
//! `max(r, S)`: one vehicle on a slow link, one tick's worth on a fast one.
//! While the buffer head is blocked downstream, credit saturates at `S + r`,
//! which bounds releases over any window of `W` ticks by `ceil(r·W) + 1`.

use qs_core::Tick;

/// Credit units per vehicle.
pub const CREDIT_SCALE: u64 = 1_000_000_000;

/// Flow credit accumulator with lazy accrual.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowCredit {
    /// Units gained per visited tick.
    rate:      u64,
    credit:    u64,
    /// Seconds between visited ticks.
    step:      u64,
    /// Last tick `accrue` ran for; `None` before the first call.
    last:      Option<Tick>,
    /// The buffer was empty when the last update finished.
    idle:      bool,
}

impl FlowCredit {
    /// `per_tick` is the flow capacity in vehicles per visited tick;
    /// `step_secs` the spacing of visited ticks.
    pub fn new(per_tick: f64, step_secs: u32) -> Self {
        let rate = to_units(per_tick);
        Self {
            rate,
            credit: idle_cap(rate),
            step: step_secs.max(1) as u64,
            last: None,
            idle: true,
        }
    }

    /// Units gained per visited tick.
    #[inline]
    pub fn rate_units(&self) -> u64 {
        self.rate
    }

    /// Current credit in units.
    #[inline]
    pub fn credit_units(&self) -> u64 {
        self.credit
    }

    /// Flow capacity per visited tick, in vehicles.
    pub fn per_tick(&self) -> f64 {
        self.rate as f64 / CREDIT_SCALE as f64
    }

    /// `true` if at least one whole vehicle may leave.
    #[inline]
    pub fn has_vehicle(&self) -> bool {
        self.credit >= CREDIT_SCALE
    }

    /// Bring credit up to date for `now`.  A second call for the same tick
    /// does nothing.
    pub fn accrue(&mut self, now: Tick) {
        let ticks = match self.last {
            None => 1,
            Some(last) if now > last => (now - last) / self.step,
            Some(_) => return,
        };
        if ticks == 0 {
            return;
        }
        self.credit = if self.idle {
            let saved = self
                .credit
                .saturating_add((ticks - 1).saturating_mul(self.rate))
                .min(idle_cap(self.rate));
            saved + self.rate
        } else {
            self.credit
                .saturating_add(ticks.saturating_mul(self.rate))
                .min(CREDIT_SCALE + self.rate)
        };
        self.last = Some(now);
    }

    /// Spend one vehicle's worth.  Callers check [`has_vehicle`](Self::has_vehicle) first.
    #[inline]
    pub fn debit(&mut self) {
        debug_assert!(self.has_vehicle());
        self.credit -= CREDIT_SCALE;
    }

    /// Give back a debit whose vehicle could not move on.
    #[inline]
    pub fn refund(&mut self) {
        self.credit += CREDIT_SCALE;
    }

    /// Record whether the buffer is empty after this tick's releases.
    pub fn settle(&mut self, buffer_empty: bool) {
        if buffer_empty {
            self.credit = self.credit.min(idle_cap(self.rate));
        }
        self.idle = buffer_empty;
    }
}

/// Vehicles per tick to credit units, rounding up.
///
/// Products within a millionth of a unit of an integer are taken as exact so
/// that rates like `0.5` do not gain a spurious unit.
fn to_units(per_tick: f64) -> u64 {
    let scaled = per_tick * CREDIT_SCALE as f64;
    let nearest = scaled.round();
    if (scaled - nearest).abs() < 1e-6 {
        nearest as u64
    } else {
        scaled.ceil() as u64
    }
}

#[inline]
fn idle_cap(rate: u64) -> u64 {
    CREDIT_SCALE.saturating_sub(rate)
}
