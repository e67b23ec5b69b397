use std::{error, fmt, str::FromStr};

use phf::phf_map;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Units an area can be displayed in.
///
/// Every variant has exactly one factor and one label; both are exhaustive
/// matches, so a new unit does not compile until it has them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum AreaUnit {
    SquareMeters,
    SquareFeet,
    SquareYards,
    Acres,
    Hectares,
    SquareKilometers,
    /// 20 marla, 505.857 m².
    Kanal,
    /// 272.25 square feet, 25.2929 m².
    Marla,
}

impl AreaUnit {
    /// All units in display order.
    pub const ALL: &'static [AreaUnit] = &[
        AreaUnit::SquareMeters,
        AreaUnit::SquareFeet,
        AreaUnit::SquareYards,
        AreaUnit::Acres,
        AreaUnit::Hectares,
        AreaUnit::SquareKilometers,
        AreaUnit::Kanal,
        AreaUnit::Marla,
    ];

    /// How many of this unit make up one square meter.
    pub const fn factor(self) -> f64 {
        match self {
            AreaUnit::SquareMeters => 1.0,
            AreaUnit::SquareFeet => 10.7639,
            AreaUnit::SquareYards => 1.19599,
            AreaUnit::Acres => 0.000247105,
            AreaUnit::Hectares => 0.0001,
            AreaUnit::SquareKilometers => 0.000001,
            AreaUnit::Kanal => 0.00197684,
            AreaUnit::Marla => 0.0395369,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AreaUnit::SquareMeters => "Square Meters",
            AreaUnit::SquareFeet => "Square Feet",
            AreaUnit::SquareYards => "Square Yards",
            AreaUnit::Acres => "Acres",
            AreaUnit::Hectares => "Hectares",
            AreaUnit::SquareKilometers => "Square Kilometers",
            AreaUnit::Kanal => "Kanal",
            AreaUnit::Marla => "Marla",
        }
    }

    /// Short identifier, also accepted by [`AreaUnit::from_str`].
    pub const fn symbol(self) -> &'static str {
        match self {
            AreaUnit::SquareMeters => "sqm",
            AreaUnit::SquareFeet => "sqft",
            AreaUnit::SquareYards => "sqyd",
            AreaUnit::Acres => "acres",
            AreaUnit::Hectares => "hectares",
            AreaUnit::SquareKilometers => "sqkm",
            AreaUnit::Kanal => "kanal",
            AreaUnit::Marla => "marla",
        }
    }

    /// Square meters to this unit. Full precision, rounding is up to whoever
    /// displays the value.
    pub fn from_square_meters(self, square_meters: f64) -> f64 {
        square_meters * self.factor()
    }

    /// A value in this unit back to square meters.
    pub fn to_square_meters(self, value: f64) -> f64 {
        value / self.factor()
    }
}

impl fmt::Display for AreaUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// identifiers and common spellings, all lower case
static UNIT_TABLE: phf::Map<&'static str, AreaUnit> = phf_map! {
    "sqm" => AreaUnit::SquareMeters,
    "m2" => AreaUnit::SquareMeters,
    "m²" => AreaUnit::SquareMeters,
    "square-meters" => AreaUnit::SquareMeters,
    "square_meters" => AreaUnit::SquareMeters,
    "sqft" => AreaUnit::SquareFeet,
    "ft2" => AreaUnit::SquareFeet,
    "square-feet" => AreaUnit::SquareFeet,
    "square_feet" => AreaUnit::SquareFeet,
    "sqyd" => AreaUnit::SquareYards,
    "yd2" => AreaUnit::SquareYards,
    "square-yards" => AreaUnit::SquareYards,
    "square_yards" => AreaUnit::SquareYards,
    "acres" => AreaUnit::Acres,
    "acre" => AreaUnit::Acres,
    "ac" => AreaUnit::Acres,
    "hectares" => AreaUnit::Hectares,
    "hectare" => AreaUnit::Hectares,
    "ha" => AreaUnit::Hectares,
    "sqkm" => AreaUnit::SquareKilometers,
    "km2" => AreaUnit::SquareKilometers,
    "square-kilometers" => AreaUnit::SquareKilometers,
    "square_kilometers" => AreaUnit::SquareKilometers,
    "kanal" => AreaUnit::Kanal,
    "marla" => AreaUnit::Marla,
};

impl FromStr for AreaUnit {
    type Err = ParseAreaUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        UNIT_TABLE
            .get(key.as_str())
            .copied()
            .ok_or_else(|| ParseAreaUnitError(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAreaUnitError(pub String);

impl error::Error for ParseAreaUnitError {}

impl fmt::Display for ParseAreaUnitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let known = AreaUnit::ALL
            .iter()
            .map(|unit| unit.symbol())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "unknown area unit '{}' (known: {})", self.0, known)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn table_is_complete() {
        let units = AreaUnit::ALL.iter().collect::<HashSet<_>>();
        assert_eq!(units.len(), AreaUnit::ALL.len());
        for unit in AreaUnit::ALL {
            assert!(unit.factor() > 0.0);
            assert!(!unit.label().is_empty());
        }
    }

    #[test]
    fn round_trip_through_every_unit() {
        let area = 12_392.138_7;
        for unit in AreaUnit::ALL {
            let back = unit.to_square_meters(unit.from_square_meters(area));
            assert!(
                (back - area).abs() <= area * 1e-12,
                "{} did not round trip: {}",
                unit,
                back
            );
        }
    }

    #[test]
    fn thousand_square_meters_in_acres() {
        let acres = AreaUnit::Acres.from_square_meters(1000.0);
        assert!((acres - 0.247105).abs() < 1e-12);
    }

    #[test]
    fn kanal_is_twenty_marla() {
        let area = 10_000.0;
        let kanal = AreaUnit::Kanal.from_square_meters(area);
        let marla = AreaUnit::Marla.from_square_meters(area);
        assert!((marla / kanal - 20.0).abs() < 1e-3);
    }

    #[test]
    fn symbols_parse_back() {
        for unit in AreaUnit::ALL {
            assert_eq!(unit.symbol().parse::<AreaUnit>(), Ok(*unit));
        }
        assert_eq!(" HA ".parse::<AreaUnit>(), Ok(AreaUnit::Hectares));
        assert_eq!("square-feet".parse::<AreaUnit>(), Ok(AreaUnit::SquareFeet));
    }

    #[test]
    fn unknown_symbol_is_an_error() {
        let error = "bigha".parse::<AreaUnit>().unwrap_err();
        assert_eq!(error, ParseAreaUnitError("bigha".to_owned()));
        assert!(error.to_string().contains("marla"));
    }

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&AreaUnit::SquareKilometers).unwrap();
        assert_eq!(json, "\"square-kilometers\"");
    }
}
