//! Run configuration consumed once at simulation start.

use crate::{CoreError, SimClock, Tick};

/// Global scalars for one simulation run.
///
/// Typically built in code or deserialized from JSON by the application
/// crate (feature `serde`) and handed to `SimBuilder`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// First simulated second.
    pub start_time: Tick,

    /// Last simulated second (inclusive).
    pub end_time: Tick,

    /// Seconds per loop step.  Flow capacity per step scales with it.
    pub tick_secs: u32,

    /// Multiplier on every link's flow capacity (e.g. 0.1 for a 10 % sample).
    pub flow_cap_factor: f64,

    /// Multiplier on every link's storage capacity.
    pub storage_cap_factor: f64,

    /// Road space one vehicle occupies in a jam, in metres.
    pub effective_vehicle_length_m: f64,
}

impl Default for SimConfig {
    /// One full day at one-second resolution with unscaled capacities.
    fn default() -> Self {
        Self {
            start_time:                 Tick::ZERO,
            end_time:                   Tick::from_hms(24, 0, 0),
            tick_secs:                  1,
            flow_cap_factor:            1.0,
            storage_cap_factor:         1.0,
            effective_vehicle_length_m: 7.5,
        }
    }
}

impl SimConfig {
    /// Reject values the engine cannot run with.
    ///
    /// Called by `SimBuilder::build`; a failure aborts the run before the
    /// first tick.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.tick_secs == 0 {
            return Err(CoreError::Config("tick_secs must be at least 1".into()));
        }
        if self.end_time < self.start_time {
            return Err(CoreError::Config(format!(
                "end_time {} is before start_time {}",
                self.end_time, self.start_time
            )));
        }
        for (name, value) in [
            ("flow_cap_factor", self.flow_cap_factor),
            ("storage_cap_factor", self.storage_cap_factor),
            ("effective_vehicle_length_m", self.effective_vehicle_length_m),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CoreError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        Ok(())
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_time, self.end_time, self.tick_secs)
    }
}
