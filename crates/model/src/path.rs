use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    point::{BoundingBox, GeoPoint},
    ExampleData,
};

/// The perimeter of one walk, in the order the points were recorded.
///
/// A path only grows by [`Path::push`]. Once a walk is stopped the path is
/// handed out by value and only read from then on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Path {
    points: Vec<GeoPoint>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: GeoPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&GeoPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&GeoPoint> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeoPoint> {
        self.points.iter()
    }

    /// The same walk in the opposite direction.
    pub fn reversed(&self) -> Self {
        self.points.iter().rev().copied().collect()
    }

    /// Vertices as `(latitude, longitude)` tuples.
    pub fn vertices(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|point| point.to_tuple()).collect()
    }

    /// Great circle length of the closed ring in meters, including the
    /// segment from the last point back to the first.
    pub fn perimeter_m(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.points
            .iter()
            .circular_tuple_windows()
            .map(|(a, b)| a.distance_to(b))
            .sum()
    }

    /// Length walked from the first to the last point, without closing.
    pub fn walked_distance_m(&self) -> f64 {
        self.points
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.distance_to(b))
            .sum()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::around(&self.points)
    }
}

impl FromIterator<GeoPoint> for Path {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<GeoPoint>> for Path {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a GeoPoint;
    type IntoIter = std::slice::Iter<'a, GeoPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl ExampleData for Path {
    fn example_data() -> Self {
        // a field north of Raisdorf, roughly 1.7 ha
        [
            (54.286_10, 10.243_20),
            (54.286_95, 10.244_05),
            (54.286_45, 10.246_10),
            (54.285_50, 10.245_30),
        ]
        .into_iter()
        .map(|(latitude, longitude)| GeoPoint::new(latitude, longitude))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_square() -> Path {
        [(0.0, 0.0), (0.0, 0.001), (0.001, 0.001), (0.001, 0.0)]
            .into_iter()
            .map(|(latitude, longitude)| GeoPoint::new(latitude, longitude))
            .collect()
    }

    #[test]
    fn keeps_insertion_order() {
        let mut path = Path::new();
        path.push(GeoPoint::new(1.0, 2.0));
        path.push(GeoPoint::new(3.0, 4.0));
        path.push(GeoPoint::new(1.0, 2.0));
        assert_eq!(path.len(), 3);
        assert_eq!(path.points()[1], GeoPoint::new(3.0, 4.0));
        assert_eq!(path.first(), path.last());
    }

    #[test]
    fn reversed_walks_backwards() {
        let path = small_square();
        let reversed = path.reversed();
        assert_eq!(reversed.first(), path.last());
        assert_eq!(reversed.reversed(), path);
    }

    #[test]
    fn perimeter_closes_the_ring() {
        let path = small_square();
        let side = GeoPoint::new(0.0, 0.0).distance_to(&GeoPoint::new(0.0, 0.001));
        assert!((path.perimeter_m() - 4.0 * side).abs() < 1e-3);
        assert!((path.walked_distance_m() - 3.0 * side).abs() < 1e-3);
    }

    #[test]
    fn perimeter_of_short_paths() {
        assert_eq!(Path::new().perimeter_m(), 0.0);
        let single: Path = [GeoPoint::new(54.0, 10.0)].into_iter().collect();
        assert_eq!(single.perimeter_m(), 0.0);
    }

    #[test]
    fn serializes_as_plain_list() {
        let path = small_square();
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(4));
        assert_eq!(json[2]["latitude"], 0.001);
    }
}
