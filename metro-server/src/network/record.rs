//! Raw edge records and their validation.

use crate::domain::ParseError;

/// Number of fields in an edge row: station A, station B, distance.
pub const EDGE_FIELDS: usize = 3;

/// Longest distance accepted for a single edge, in kilometres.
pub const MAX_EDGE_KM: f64 = 10_000.0;

/// Why an edge row was rejected.
///
/// A rejected row is skipped; the build continues with the remaining rows.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataFormatError {
    /// Row does not have exactly three fields
    #[error("expected 3 fields, found {found}")]
    FieldCount { found: usize },

    /// Distance field is not a finite number
    #[error("distance {value:?} is not a number")]
    InvalidDistance { value: String },

    /// Distance field is below zero
    #[error("distance {value} is negative")]
    NegativeDistance { value: f64 },

    /// Distance field is larger than any real segment
    #[error("distance {value} exceeds {MAX_EDGE_KM} km")]
    TooLong { value: f64 },

    /// One of the station names violates the naming grammar
    #[error("bad station name {name:?}: {source}")]
    StationName {
        name: String,
        #[source]
        source: ParseError,
    },
}

/// A well-formed edge between two raw station names.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub station_a: String,
    pub station_b: String,
    pub distance_km: f64,
}

impl EdgeRecord {
    /// Create a record from already-typed values.
    pub fn new(station_a: impl Into<String>, station_b: impl Into<String>, distance_km: f64) -> Self {
        Self {
            station_a: station_a.into(),
            station_b: station_b.into(),
            distance_km,
        }
    }

    /// Validate a raw row of text fields.
    ///
    /// Fields are trimmed. Station names are not checked against the naming
    /// grammar here; that happens when the record is added to a snapshot.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, DataFormatError> {
        let [a, b, distance] = fields else {
            return Err(DataFormatError::FieldCount {
                found: fields.len(),
            });
        };

        let distance = distance.as_ref().trim();
        let distance_km = parse_distance(distance)?;

        Ok(Self::new(a.as_ref().trim(), b.as_ref().trim(), distance_km))
    }
}

/// Parse a distance as a finite, non-negative number of kilometres.
pub fn parse_distance(value: &str) -> Result<f64, DataFormatError> {
    let distance: f64 = value.parse().map_err(|_| DataFormatError::InvalidDistance {
        value: value.to_string(),
    })?;
    check_distance(distance)
}

/// Reject distances that are negative, absurdly long or not finite.
pub fn check_distance(distance: f64) -> Result<f64, DataFormatError> {
    if !distance.is_finite() {
        return Err(DataFormatError::InvalidDistance {
            value: distance.to_string(),
        });
    }
    if distance < 0.0 {
        return Err(DataFormatError::NegativeDistance { value: distance });
    }
    if distance > MAX_EDGE_KM {
        return Err(DataFormatError::TooLong { value: distance });
    }
    Ok(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_row() {
        let record = EdgeRecord::from_fields(&["Shahdara_red", " Welcome_red ", " 1.2"]).unwrap();
        assert_eq!(record, EdgeRecord::new("Shahdara_red", "Welcome_red", 1.2));
    }

    #[test]
    fn zero_distance_is_accepted() {
        assert_eq!(parse_distance("0"), Ok(0.0));
    }

    #[test]
    fn reject_wrong_field_count() {
        assert_eq!(
            EdgeRecord::from_fields(&["A_red", "B_red"]),
            Err(DataFormatError::FieldCount { found: 2 })
        );
        assert_eq!(
            EdgeRecord::from_fields(&["A_red", "B_red", "1", "extra"]),
            Err(DataFormatError::FieldCount { found: 4 })
        );
    }

    #[test]
    fn reject_non_numeric_distance() {
        assert!(matches!(
            EdgeRecord::from_fields(&["A_red", "B_red", "far"]),
            Err(DataFormatError::InvalidDistance { .. })
        ));
    }

    #[test]
    fn reject_non_finite_distance() {
        assert!(parse_distance("NaN").is_err());
        assert!(parse_distance("inf").is_err());
    }

    #[test]
    fn reject_negative_distance() {
        assert_eq!(
            parse_distance("-2.5"),
            Err(DataFormatError::NegativeDistance { value: -2.5 })
        );
    }

    #[test]
    fn reject_overlong_distance() {
        assert_eq!(
            parse_distance("1e300"),
            Err(DataFormatError::TooLong { value: 1e300 })
        );
        assert!(parse_distance("10000").is_ok());
    }

    #[test]
    fn error_display() {
        let err = DataFormatError::FieldCount { found: 2 };
        assert_eq!(err.to_string(), "expected 3 fields, found 2");

        let err = DataFormatError::InvalidDistance {
            value: "far".into(),
        };
        assert_eq!(err.to_string(), "distance \"far\" is not a number");
    }
}
