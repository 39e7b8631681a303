//! Coordinate input form state.
//!
//! Holds the raw text of the two coordinate pairs, their error flags, and
//! the open/closed state of each pair's info dialog. Validation happens
//! only on submit.

use super::region::{Coordinate, Preset, Region, RegionQuery};

/// Text fields for one coordinate pair.
#[derive(Default, Clone, Debug)]
pub struct CoordinateField {
    pub ra_text: String,
    pub dec_text: String,
    /// Set by the last validation pass when either value was missing.
    pub error: bool,
    /// Whether the info dialog for this pair is open.
    pub info_open: bool,
}

impl CoordinateField {
    /// Parse both values, returning `None` if either is missing.
    pub fn parse(&self) -> Option<Coordinate> {
        let ra = parse_degrees(&self.ra_text)?;
        let dec = parse_degrees(&self.dec_text)?;
        Some(Coordinate::new(ra, dec))
    }

    fn fill(&mut self, coordinate: Coordinate) {
        self.ra_text = coordinate.ra.to_string();
        self.dec_text = coordinate.dec.to_string();
        self.error = false;
    }
}

/// A value is present when it parses as a finite number.
fn parse_degrees(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// State for the coordinate input group.
#[derive(Default, Clone, Debug)]
pub struct RegionInputState {
    pub first: CoordinateField,
    pub second: CoordinateField,
}

impl RegionInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate both pairs and build a manual query.
    ///
    /// Error flags are recomputed for both pairs on every call. Returns
    /// `None` (and emits nothing) if any value is missing.
    pub fn submit(&mut self) -> Option<RegionQuery> {
        let first = self.first.parse();
        let second = self.second.parse();

        self.first.error = first.is_none();
        self.second.error = second.is_none();

        match (first, second) {
            (Some(first), Some(second)) => Some(RegionQuery::manual(Region::new(first, second))),
            _ => {
                log::debug!(
                    "Region input invalid (first: {}, second: {})",
                    self.first.error,
                    self.second.error
                );
                None
            }
        }
    }

    /// Select a preset region. Skips validation and fills the fields.
    pub fn select_preset(&mut self, preset: &Preset) -> RegionQuery {
        self.first.fill(preset.region.first);
        self.second.fill(preset.region.second);
        preset.query()
    }
}
