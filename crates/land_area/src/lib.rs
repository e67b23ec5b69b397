//! Area of a plot of land from the points recorded while walking its
//! perimeter.
//!
//! A [`Walk`] collects position fixes from a [`LocationProvider`]. Once it is
//! stopped, the recorded [`Path`] is turned into square meters by
//! [`compute_area`] and converted into any [`AreaUnit`] for display.

pub mod area;
pub mod config;
pub mod export;
pub mod provider;
pub mod report;
pub mod walk;

pub use area::{compute_area, compute_area_with, AreaError, AreaMethod};
pub use config::{Config, ConfigError};
pub use export::{ExportError, CSV_HEADER};
pub use model::{AreaUnit, Fix, GeoPoint, Path};
pub use provider::{track, track_stream, track_until, LocationProvider, ReplayProvider};
pub use report::AreaReport;
pub use walk::{RecordedWalk, Walk, WalkError, WalkStatus};

/// Every unit an area can be shown in, in display order.
pub fn list_units() -> &'static [AreaUnit] {
    AreaUnit::ALL
}

/// Square meters to `unit`, at full precision.
pub fn convert(area_m2: f64, unit: AreaUnit) -> f64 {
    unit.from_square_meters(area_m2)
}

/// A value in `unit` back to square meters.
pub fn to_square_meters(value: f64, unit: AreaUnit) -> f64 {
    unit.to_square_meters(value)
}

pub fn label(unit: AreaUnit) -> &'static str {
    unit.label()
}
