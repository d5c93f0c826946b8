//! Transportation mode carried on every leg and departure event.
//!
//! The queue engine only moves network modes; the mode travels with the
//! vehicle so that event consumers can split volumes by mode.

/// The means by which an agent travels a leg.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[non_exhaustive]
pub enum TransportMode {
    /// Private vehicle.
    #[default]
    Car,
    /// Bicycle sharing the road.
    Bike,
    /// Road-based public transport vehicle.
    Bus,
    /// Goods vehicle.
    Truck,
}

impl TransportMode {
    /// Human-readable label, useful for CSV/Parquet column values.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Car   => "car",
            TransportMode::Bike  => "bike",
            TransportMode::Bus   => "bus",
            TransportMode::Truck => "truck",
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
