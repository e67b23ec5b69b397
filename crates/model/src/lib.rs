pub mod path;
pub mod point;
pub mod unit;

pub use path::Path;
pub use point::{BoundingBox, Fix, GeoPoint, InvalidCoordinate};
pub use unit::{AreaUnit, ParseAreaUnitError};

pub trait ExampleData {
    fn example_data() -> Self;
}
