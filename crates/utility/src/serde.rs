/// Coordinates as decimal text for interchange files.
///
/// Values are written with at least [`MIN_DECIMALS`] fractional digits and
/// otherwise with the shortest representation that parses back to the exact
/// same `f64`, so a write/read cycle never loses precision.
pub mod coordinate {
    use serde::{de::Error as DeError, Deserialize, Deserializer, Serializer};

    pub const MIN_DECIMALS: usize = 6;

    pub fn format(value: f64) -> String {
        let shortest = format!("{}", value);
        let decimals = shortest
            .split_once('.')
            .map(|(_, fraction)| fraction.len())
            .unwrap_or(0);
        if decimals >= MIN_DECIMALS {
            shortest
        } else {
            format!("{:.*}", MIN_DECIMALS, value)
        }
    }

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let value: f64 = s.trim().parse().map_err(D::Error::custom)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(D::Error::custom(format!("coordinate is not finite: {}", s)))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn pads_short_values() {
            assert_eq!(format(54.0), "54.000000");
            assert_eq!(format(-0.5), "-0.500000");
            assert_eq!(format(10.1228), "10.122800");
        }

        #[test]
        fn keeps_every_significant_digit() {
            let value = 54.323_312_345_678_9;
            assert_eq!(format(value).parse::<f64>().unwrap(), value);
            assert_eq!(format(0.1 + 0.2), "0.30000000000000004");
        }
    }
}
