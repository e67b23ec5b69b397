use std::fmt;

use indexmap::IndexMap;
use model::{AreaUnit, BoundingBox, Path};
use serde::Serialize;

use crate::area::{compute_area_with, AreaMethod, Result};

/// Everything a presentation layer shows after a walk: the area in square
/// meters and converted into each requested unit, in the requested order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaReport {
    pub point_count: usize,
    pub perimeter_m: f64,
    /// Extent of the walked points, for fitting a map view around the plot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
    pub method: AreaMethod,
    pub area_m2: f64,
    pub areas: IndexMap<AreaUnit, f64>,
}

impl AreaReport {
    pub fn new(path: &Path, method: AreaMethod, units: &[AreaUnit]) -> Result<Self> {
        let area_m2 = compute_area_with(path, method)?;
        let areas = units
            .iter()
            .map(|unit| (*unit, unit.from_square_meters(area_m2)))
            .collect();
        Ok(Self {
            point_count: path.len(),
            perimeter_m: path.perimeter_m(),
            bounds: path.bounding_box(),
            method,
            area_m2,
            areas,
        })
    }

    pub fn get(&self, unit: AreaUnit) -> Option<f64> {
        self.areas.get(&unit).copied()
    }
}

impl fmt::Display for AreaReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} points, perimeter {:.1} m ({})",
            self.point_count, self.perimeter_m, self.method
        )?;
        if let Some(bounds) = &self.bounds {
            writeln!(f, "within {} .. {}", bounds.south_west, bounds.north_east)?;
        }
        let width = self
            .areas
            .keys()
            .map(|unit| unit.label().len())
            .max()
            .unwrap_or(0);
        for (unit, value) in &self.areas {
            writeln!(f, "{:<width$}  {:.4}", unit.label(), value, width = width)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use model::{ExampleData, GeoPoint};

    use super::*;
    use crate::area::AreaError;

    #[test]
    fn converts_into_every_requested_unit() {
        let path = Path::example_data();
        let report =
            AreaReport::new(&path, AreaMethod::LocalProjection, AreaUnit::ALL).unwrap();
        assert_eq!(report.point_count, 4);
        assert_eq!(report.areas.len(), AreaUnit::ALL.len());
        assert_eq!(report.get(AreaUnit::SquareMeters), Some(report.area_m2));
        let hectares = report.get(AreaUnit::Hectares).unwrap();
        assert!((hectares - report.area_m2 / 10_000.0).abs() < 1e-12);
    }

    #[test]
    fn keeps_the_requested_order() {
        let path = Path::example_data();
        let units = [AreaUnit::Marla, AreaUnit::Acres];
        let report = AreaReport::new(&path, AreaMethod::default(), &units).unwrap();
        assert_eq!(report.areas.keys().copied().collect::<Vec<_>>(), units);
        assert_eq!(report.get(AreaUnit::Hectares), None);
    }

    #[test]
    fn insufficient_points_produce_no_report() {
        let path: Path = [GeoPoint::new(54.0, 10.0), GeoPoint::new(54.1, 10.0)]
            .into_iter()
            .collect();
        assert_eq!(
            AreaReport::new(&path, AreaMethod::default(), AreaUnit::ALL),
            Err(AreaError::InsufficientPoints { found: 2 })
        );
    }

    #[test]
    fn serializes_units_as_keys() {
        let report =
            AreaReport::new(&Path::example_data(), AreaMethod::default(), &[AreaUnit::Acres])
                .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["method"], "local-projection");
        assert!(json["areas"]["acres"].as_f64().unwrap() > 0.0);
        assert_eq!(json["pointCount"], 4);
        assert_eq!(json["bounds"]["southWest"]["latitude"], 54.285_50);
        assert_eq!(json["bounds"]["northEast"]["longitude"], 10.246_10);
    }

    #[test]
    fn bounds_enclose_the_walk() {
        let path = Path::example_data();
        let report = AreaReport::new(&path, AreaMethod::default(), &[]).unwrap();
        let bounds = report.bounds.unwrap();
        assert!(path.iter().all(|point| bounds.contains(point)));
        assert_eq!(bounds.south_west, GeoPoint::new(54.285_50, 10.243_20));
        assert_eq!(bounds.north_east, GeoPoint::new(54.286_95, 10.246_10));
    }

    #[test]
    fn display_lists_labels() {
        let report =
            AreaReport::new(&Path::example_data(), AreaMethod::default(), AreaUnit::ALL)
                .unwrap();
        let text = report.to_string();
        assert!(text.contains("Hectares"));
        assert!(text.contains("Kanal"));
    }
}
