use std::{error, fmt, result, str::FromStr};

use model::{GeoPoint, Path};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::{self, MIN_POLYGON_POINTS};

/// How latitude/longitude vertices are turned into square meters.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum AreaMethod {
    /// Equirectangular projection onto the plane tangent at the first point,
    /// then the shoelace formula. Meant for plots up to a few tens of
    /// hectares.
    #[default]
    LocalProjection,
    /// Spherical excess on a sphere with the WGS84 semi-major axis as radius.
    SphericalExcess,
}

impl AreaMethod {
    pub const ALL: &'static [AreaMethod] =
        &[AreaMethod::LocalProjection, AreaMethod::SphericalExcess];

    pub const fn name(self) -> &'static str {
        match self {
            AreaMethod::LocalProjection => "local-projection",
            AreaMethod::SphericalExcess => "spherical-excess",
        }
    }

    /// Area of the closed ring through `vertices` in square meters.
    ///
    /// # Panics
    ///
    /// Panics on fewer than three vertices. Use [`compute_area_with`] for a
    /// checked version.
    pub fn area(self, vertices: &[(f64, f64)]) -> f64 {
        match self {
            AreaMethod::LocalProjection => geo::local_projection_area(vertices),
            AreaMethod::SphericalExcess => geo::spherical_polygon_area(vertices),
        }
    }
}

impl fmt::Display for AreaMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AreaMethod {
    type Err = ParseAreaMethodError;

    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        AreaMethod::ALL
            .iter()
            .find(|method| method.name() == key)
            .copied()
            .ok_or_else(|| ParseAreaMethodError(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAreaMethodError(pub String);

impl error::Error for ParseAreaMethodError {}

impl fmt::Display for ParseAreaMethodError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unknown area method '{}' (expected one of: {})",
            self.0,
            AreaMethod::ALL
                .iter()
                .map(|method| method.name())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AreaError {
    /// The walk has fewer points than a polygon needs.
    InsufficientPoints { found: usize },
    /// A point is not a finite WGS84 position.
    InvalidPoint { index: usize, point: GeoPoint },
}

impl error::Error for AreaError {}

impl fmt::Display for AreaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AreaError::InsufficientPoints { found } => write!(
                f,
                "not enough points to calculate an area: need at least {}, got {}",
                MIN_POLYGON_POINTS, found
            ),
            AreaError::InvalidPoint { index, point } => {
                write!(f, "point #{} has an invalid position: {}", index + 1, point)
            }
        }
    }
}

pub type Result<T> = result::Result<T, AreaError>;

/// Enclosed area of the walk in square meters, using the default
/// [`AreaMethod`].
pub fn compute_area(path: &Path) -> Result<f64> {
    compute_area_with(path, AreaMethod::default())
}

/// Enclosed area of the walk in square meters. The last point is implicitly
/// connected back to the first.
///
/// Paths with fewer than three points are reported as
/// [`AreaError::InsufficientPoints`] without running the calculation, paths
/// containing a point outside the valid latitude/longitude range as
/// [`AreaError::InvalidPoint`].
pub fn compute_area_with(path: &Path, method: AreaMethod) -> Result<f64> {
    if path.len() < MIN_POLYGON_POINTS {
        log::warn!(
            "cannot calculate area from {} point(s), need at least {}",
            path.len(),
            MIN_POLYGON_POINTS
        );
        return Err(AreaError::InsufficientPoints { found: path.len() });
    }
    let invalid = path
        .iter()
        .enumerate()
        .find(|(_, point)| !point.is_valid());
    if let Some((index, point)) = invalid {
        log::warn!(
            "cannot calculate area, point #{} is invalid: {}",
            index + 1,
            point
        );
        return Err(AreaError::InvalidPoint {
            index,
            point: *point,
        });
    }
    let area = method.area(&path.vertices());
    log::debug!(
        "area of {} points using {}: {} m²",
        path.len(),
        method,
        area
    );
    Ok(area)
}

#[cfg(test)]
mod tests {
    use model::{ExampleData, GeoPoint};

    use super::*;

    fn path_of(points: &[(f64, f64)]) -> Path {
        points
            .iter()
            .map(|&(latitude, longitude)| GeoPoint::new(latitude, longitude))
            .collect()
    }

    #[test]
    fn small_square_near_equator() {
        let path = path_of(&[(0.0, 0.0), (0.0, 0.001), (0.001, 0.001), (0.001, 0.0)]);
        let expected = 12_392.0;
        for method in AreaMethod::ALL {
            let area = compute_area_with(&path, *method).unwrap();
            assert!(
                ((area - expected) / expected).abs() < 0.01,
                "{}: {}",
                method,
                area
            );
        }
    }

    #[test]
    fn two_points_are_not_enough() {
        let path = path_of(&[(0.0, 0.0), (0.0, 0.001)]);
        assert_eq!(
            compute_area(&path),
            Err(AreaError::InsufficientPoints { found: 2 })
        );
        assert_eq!(
            compute_area(&Path::new()),
            Err(AreaError::InsufficientPoints { found: 0 })
        );
    }

    #[test]
    fn methods_agree_on_a_field() {
        let path = Path::example_data();
        let projected = compute_area_with(&path, AreaMethod::LocalProjection).unwrap();
        let spherical = compute_area_with(&path, AreaMethod::SphericalExcess).unwrap();
        assert!(((projected - spherical) / projected).abs() < 0.001);
    }

    #[test]
    fn direction_of_the_walk_does_not_matter() {
        let path = Path::example_data();
        let forward = compute_area(&path).unwrap();
        let backward = compute_area(&path.reversed()).unwrap();
        assert!((forward - backward).abs() <= forward * 1e-9);
    }

    #[test]
    fn same_path_same_bits() {
        let path = Path::example_data();
        let first = compute_area(&path).unwrap();
        for _ in 0..10 {
            assert_eq!(compute_area(&path).unwrap().to_bits(), first.to_bits());
        }
    }

    #[test]
    fn walking_back_and_forth_encloses_nothing() {
        let path = path_of(&[(54.28, 10.24), (54.281, 10.241), (54.28, 10.24)]);
        assert!(compute_area(&path).unwrap() < 1e-6);
    }

    #[test]
    fn invalid_points_are_rejected() {
        let mut points = vec![
            GeoPoint::new(54.28, 10.24),
            GeoPoint::new(54.281, 10.241),
            GeoPoint::new(54.281, 10.24),
        ];
        for bad in [
            GeoPoint {
                latitude: f64::NAN,
                longitude: 10.24,
            },
            GeoPoint {
                latitude: 200.0,
                longitude: 10.24,
            },
            GeoPoint {
                latitude: 54.28,
                longitude: f64::INFINITY,
            },
        ] {
            points[1] = bad;
            let path = Path::from(points.clone());
            for method in AreaMethod::ALL {
                match compute_area_with(&path, *method) {
                    Err(AreaError::InvalidPoint { index, point }) => {
                        assert_eq!(index, 1);
                        assert_eq!(point.latitude.to_bits(), bad.latitude.to_bits());
                    }
                    other => panic!("{}: expected an invalid point, got {:?}", method, other),
                }
            }
        }
    }

    #[test]
    fn parses_method_names() {
        assert_eq!(
            "Spherical-Excess".parse::<AreaMethod>(),
            Ok(AreaMethod::SphericalExcess)
        );
        assert!("mercator".parse::<AreaMethod>().is_err());
    }
}
