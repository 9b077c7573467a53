pub mod numeric {
    use std::fmt;

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub const SENTINEL: &str = "None";

    /// A numeric observation after rounding, or the sentinel when the raw
    /// value could not be read as a number.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Reading {
        Value(i64),
        Missing,
    }

    impl Reading {
        pub fn is_missing(&self) -> bool {
            matches!(self, Reading::Missing)
        }
    }

    impl fmt::Display for Reading {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Reading::Value(v) => write!(f, "{v}"),
                Reading::Missing => f.write_str(SENTINEL),
            }
        }
    }

    /// Reads a loosely typed JSON value as a finite number. Numeric strings
    /// are accepted; everything else (null, "", text, objects) is `None`.
    pub fn coerce(raw: &Value) -> Option<f64> {
        let value = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Rounds half up, the way the dashboard always has (2.5 -> 3, -2.5 -> -2).
    pub fn round(value: Option<f64>) -> Reading {
        match value {
            Some(v) => Reading::Value((v + 0.5).floor() as i64),
            None => Reading::Missing,
        }
    }

    /// The value and unit text of one rendered row. The unit is dropped
    /// alongside the sentinel.
    pub fn with_units(reading: Reading, units: &str) -> String {
        if reading.is_missing() || units.is_empty() {
            reading.to_string()
        } else {
            format!("{reading} {units}")
        }
    }

    pub fn lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(coerce))
    }

    #[test]
    fn test_round() {
        assert_eq!(round(Some(12.4)), Reading::Value(12));
        assert_eq!(round(Some(12.5)), Reading::Value(13));
        assert_eq!(round(Some(0.0)), Reading::Value(0));
        assert_eq!(round(Some(-3.6)), Reading::Value(-4));
        assert_eq!(round(Some(-2.5)), Reading::Value(-2));
        assert_eq!(round(None), Reading::Missing);
    }

    #[test]
    fn test_coerce() {
        use serde_json::json;

        assert_eq!(coerce(&json!(71.6)), Some(71.6));
        assert_eq!(coerce(&json!("-4.2")), Some(-4.2));
        assert_eq!(coerce(&json!(0)), Some(0.0));
        assert_eq!(coerce(&json!(null)), None);
        assert_eq!(coerce(&json!("")), None);
        assert_eq!(coerce(&json!("calm")), None);
        assert_eq!(coerce(&json!("NaN")), None);
        assert_eq!(coerce(&json!([1])), None);
    }

    #[test]
    fn test_with_units() {
        assert_eq!(with_units(Reading::Value(72), "F"), "72 F");
        assert_eq!(with_units(Reading::Value(0), "kt"), "0 kt");
        assert_eq!(with_units(Reading::Value(-7), "F"), "-7 F");
        assert_eq!(with_units(Reading::Missing, "F"), "None");
        assert_eq!(with_units(Reading::Value(40), ""), "40");
    }
}

pub mod beaufort {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub const NOT_AVAILABLE: &str = "wi-na.svg";
    const PREFIX: &str = "wi-wind-beaufort-";

    /// Numbers are truncated; strings are read up to the first non-digit, so
    /// "3" and "12 kt" both work. Anything else is not a scale value.
    pub fn coerce(raw: &Value) -> Option<i64> {
        match raw {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64)),
            Value::String(s) => leading_integer(s),
            _ => None,
        }
    }

    fn leading_integer(s: &str) -> Option<i64> {
        let s = s.trim_start();
        let (sign, digits) = match s.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, s.strip_prefix('+').unwrap_or(s)),
        };
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        digits[..end].parse::<i64>().ok().map(|n| sign * n)
    }

    pub fn icon(scale: Option<i64>) -> String {
        match scale {
            Some(n) => format!("{PREFIX}{n}.svg"),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    pub fn lenient<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(coerce))
    }

    #[test]
    fn test_beaufort_icon() {
        use serde_json::json;

        assert_eq!(icon(coerce(&json!(0))), "wi-wind-beaufort-0.svg");
        assert_eq!(icon(coerce(&json!("3"))), "wi-wind-beaufort-3.svg");
        assert_eq!(icon(coerce(&json!(4.8))), "wi-wind-beaufort-4.svg");
        assert_eq!(icon(coerce(&json!("12 kt"))), "wi-wind-beaufort-12.svg");
        assert_eq!(icon(coerce(&json!("gale"))), NOT_AVAILABLE);
        assert_eq!(icon(coerce(&json!(""))), NOT_AVAILABLE);
        assert_eq!(icon(coerce(&json!(null))), NOT_AVAILABLE);
    }
}

pub mod pressure {
    use super::numeric::SENTINEL;

    /// Pressure always carries two decimals; the units go with the sentinel.
    pub fn format(value: Option<f64>, units: &str) -> String {
        match value {
            Some(v) if units.is_empty() => format!("{v:.2}"),
            Some(v) => format!("{v:.2} {units}"),
            None => SENTINEL.to_string(),
        }
    }

    #[test]
    fn test_pressure_format() {
        assert_eq!(format(Some(29.921), "inHg"), "29.92 inHg");
        assert_eq!(format(Some(1013.0), "mb"), "1013.00 mb");
        assert_eq!(format(Some(30.0), ""), "30.00");
        assert_eq!(format(None, "mb"), "None");
    }
}

pub mod direction {
    const COMPASS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    pub fn degree_to_compass<'a>(deg: f64) -> &'a str {
        let deg = (deg % 360.0) + 360.0;
        let val = (deg / 22.5 + 0.5) as usize;
        let idx = val % 16;
        COMPASS[idx]
    }

    /// The compass icon points north at rest; the arrow shows where the wind
    /// blows to, so it is turned half a circle from the source direction.
    pub fn compass_rotation(deg: f64) -> f64 {
        deg - 180.0
    }

    #[test]
    fn test_degree_to_compass() {
        assert_eq!(degree_to_compass(0.0), "N");
        assert_eq!(degree_to_compass(90.0), "E");
        assert_eq!(degree_to_compass(180.0), "S");
        assert_eq!(degree_to_compass(200.0), "SSW");
        assert_eq!(degree_to_compass(270.0), "W");
        assert_eq!(degree_to_compass(360.0), "N");
        assert_eq!(degree_to_compass(-45.0), "NW");
    }

    #[test]
    fn test_compass_rotation() {
        assert_eq!(compass_rotation(270.0), 90.0);
        assert_eq!(compass_rotation(0.0), -180.0);
        assert_eq!(compass_rotation(22.5), -157.5);
    }
}
