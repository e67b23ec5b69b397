use std::{error, fmt};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ExampleData;

pub const LATITUDE_MAX: f64 = 90.0;
pub const LATITUDE_MIN: f64 = -90.0;
pub const LONGITUDE_MAX: f64 = 180.0;
pub const LONGITUDE_MIN: f64 = -180.0;

/// WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// # Panics
    ///
    /// Panics if the coordinate is out of range or not finite. Use
    /// [`GeoPoint::try_new`] for positions from outside the program.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        let point = Self {
            latitude,
            longitude,
        };
        assert!(point.is_valid(), "invalid coordinate: {}", point);
        point
    }

    pub fn try_new(latitude: f64, longitude: f64) -> Option<Self> {
        let point = Self {
            latitude,
            longitude,
        };
        point.is_valid().then_some(point)
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (LATITUDE_MIN..=LATITUDE_MAX).contains(&self.latitude)
            && (LONGITUDE_MIN..=LONGITUDE_MAX).contains(&self.longitude)
    }

    /// `(latitude, longitude)` as expected by `utility::geo`.
    pub fn to_tuple(self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        utility::geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

impl TryFrom<(f64, f64)> for GeoPoint {
    type Error = InvalidCoordinate;

    fn try_from((latitude, longitude): (f64, f64)) -> Result<Self, Self::Error> {
        Self::try_new(latitude, longitude).ok_or(InvalidCoordinate {
            latitude,
            longitude,
        })
    }
}

impl ExampleData for GeoPoint {
    fn example_data() -> Self {
        // Raisdorf station
        Self::new(54.280_972, 10.250_219)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl error::Error for InvalidCoordinate {}

impl fmt::Display for InvalidCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "coordinate out of range: latitude {} (expected {}..={}), longitude {} (expected {}..={})",
            self.latitude,
            LATITUDE_MIN,
            LATITUDE_MAX,
            self.longitude,
            LONGITUDE_MIN,
            LONGITUDE_MAX
        )
    }
}

/// A single sample delivered by a location provider while walking.
///
/// The accuracy radius is whatever the provider reported; it is passed
/// through for display and never enters the area computation.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    #[serde(flatten)]
    pub point: GeoPoint,
    pub accuracy_m: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

impl Fix {
    pub fn new(point: GeoPoint, accuracy_m: Option<f64>) -> Self {
        Self {
            point,
            accuracy_m,
            recorded_at: Utc::now(),
        }
    }

    pub fn at(point: GeoPoint, accuracy_m: Option<f64>, recorded_at: DateTime<Utc>) -> Self {
        Self {
            point,
            accuracy_m,
            recorded_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl BoundingBox {
    /// Smallest box around `points`, `None` if there are none. Walks across
    /// the antimeridian get a box spanning the whole globe in longitude.
    pub fn around<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<Self> {
        points.into_iter().fold(None, |bounds, point| {
            Some(match bounds {
                None => BoundingBox {
                    south_west: *point,
                    north_east: *point,
                },
                Some(BoundingBox {
                    south_west,
                    north_east,
                }) => BoundingBox {
                    south_west: GeoPoint {
                        latitude: south_west.latitude.min(point.latitude),
                        longitude: south_west.longitude.min(point.longitude),
                    },
                    north_east: GeoPoint {
                        latitude: north_east.latitude.max(point.latitude),
                        longitude: north_east.longitude.max(point.longitude),
                    },
                },
            })
        })
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&point.latitude)
            && (self.south_west.longitude..=self.north_east.longitude)
                .contains(&point.longitude)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(GeoPoint::try_new(90.0, 180.0).is_some());
        assert!(GeoPoint::try_new(-90.0, -180.0).is_some());
        assert!(GeoPoint::try_new(90.000_001, 0.0).is_none());
        assert!(GeoPoint::try_new(0.0, -180.5).is_none());
        assert!(GeoPoint::try_new(f64::NAN, 0.0).is_none());
        assert!(GeoPoint::try_from((0.0, f64::INFINITY)).is_err());
    }

    #[test]
    #[should_panic(expected = "invalid coordinate")]
    fn new_rejects_out_of_range_latitude() {
        GeoPoint::new(200.0, 10.0);
    }

    #[test]
    fn fix_serializes_flat() {
        let fix = Fix::at(
            GeoPoint::new(54.280_972, 10.250_219),
            None,
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        );
        let json = serde_json::to_value(fix).unwrap();
        assert_eq!(json["latitude"], 54.280_972);
        assert_eq!(json["longitude"], 10.250_219);
        assert!(json.get("accuracyM").is_none());

        let back: Fix = serde_json::from_value(json).unwrap();
        assert_eq!(back, fix);
    }

    #[test]
    fn bounding_box_around_points() {
        let points = [
            GeoPoint::new(54.1, 10.3),
            GeoPoint::new(54.3, 10.1),
            GeoPoint::new(54.2, 10.2),
        ];
        let bounds = BoundingBox::around(&points).unwrap();
        assert_eq!(bounds.south_west, GeoPoint::new(54.1, 10.1));
        assert_eq!(bounds.north_east, GeoPoint::new(54.3, 10.3));
        assert!(points.iter().all(|point| bounds.contains(point)));
        assert!(BoundingBox::around(std::iter::empty()).is_none());
    }
}
