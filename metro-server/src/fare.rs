//! Distance-based fare calculation.

use serde::{Deserialize, Serialize};

/// Error in a fare band configuration.
///
/// Raised when the table is built at startup, never at query time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No bands at all
    #[error("fare table has no bands")]
    EmptyBands,

    /// A bound is negative or not a finite number
    #[error("fare band {index} has an invalid distance bound")]
    InvalidBound { index: usize },

    /// Bounds are not strictly ascending
    #[error("fare band {index} is not above the previous band")]
    Unsorted { index: usize },

    /// An unbounded band appears before the end of the table
    #[error("fare band {index} is unbounded but is not the last band")]
    UnboundedBandNotLast { index: usize },

    /// The last band has a finite bound
    #[error("last fare band must be unbounded")]
    BoundedFinalBand,

    /// A band is cheaper than the one before it
    #[error("fare band {index} is cheaper than the previous band")]
    DecreasingFare { index: usize },
}

/// One fare rule: trips up to `max_distance` km cost `fare`.
///
/// `max_distance` of `None` means the band is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareBand {
    pub max_distance: Option<f64>,
    pub fare: u32,
}

impl FareBand {
    pub fn up_to(max_distance: f64, fare: u32) -> Self {
        Self {
            max_distance: Some(max_distance),
            fare,
        }
    }

    pub fn unbounded(fare: u32) -> Self {
        Self {
            max_distance: None,
            fare,
        }
    }

    fn covers(&self, distance: f64) -> bool {
        self.max_distance.is_none_or(|max| distance <= max)
    }
}

/// Validated, ordered fare bands.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FareTable {
    bands: Vec<FareBand>,
}

impl FareTable {
    /// Validate and build a fare table.
    ///
    /// Bounds must be finite, non-negative and strictly ascending, fares must
    /// not decrease, and only the last band may (and must) be unbounded.
    pub fn new(bands: Vec<FareBand>) -> Result<Self, ConfigError> {
        let last = bands.len().checked_sub(1).ok_or(ConfigError::EmptyBands)?;

        let mut previous: Option<&FareBand> = None;
        for (index, band) in bands.iter().enumerate() {
            match band.max_distance {
                Some(max) if !max.is_finite() || max < 0.0 => {
                    return Err(ConfigError::InvalidBound { index });
                }
                None if index != last => {
                    return Err(ConfigError::UnboundedBandNotLast { index });
                }
                _ => {}
            }

            if let Some(prev) = previous {
                if let (Some(prev_max), Some(max)) = (prev.max_distance, band.max_distance) {
                    if max <= prev_max {
                        return Err(ConfigError::Unsorted { index });
                    }
                }
                if band.fare < prev.fare {
                    return Err(ConfigError::DecreasingFare { index });
                }
            }
            previous = Some(band);
        }

        if bands[last].max_distance.is_some() {
            return Err(ConfigError::BoundedFinalBand);
        }

        Ok(Self { bands })
    }

    /// Delhi Metro fare slabs.
    pub fn delhi_metro() -> Self {
        Self {
            bands: vec![
                FareBand::up_to(2.0, 11),
                FareBand::up_to(5.0, 20),
                FareBand::up_to(12.0, 30),
                FareBand::up_to(21.0, 43),
                FareBand::up_to(32.0, 54),
                FareBand::unbounded(64),
            ],
        }
    }

    /// Parse bands from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self, FareFileError> {
        let bands: Vec<FareBand> = serde_json::from_str(json)?;
        Ok(Self::new(bands)?)
    }

    /// Fare for a trip of `distance` km.
    ///
    /// A zero-length trip is free.
    pub fn calculate(&self, distance: f64) -> u32 {
        if distance <= 0.0 {
            return 0;
        }
        self.bands
            .iter()
            .find(|band| band.covers(distance))
            .or(self.bands.last())
            .map_or(0, |band| band.fare)
    }

    pub fn bands(&self) -> &[FareBand] {
        &self.bands
    }
}

impl Default for FareTable {
    fn default() -> Self {
        Self::delhi_metro()
    }
}

/// Error loading a fare table from JSON.
#[derive(Debug, thiserror::Error)]
pub enum FareFileError {
    #[error("invalid fare JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
