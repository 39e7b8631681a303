//! Sky region data types and the built-in preset regions.

/// An equatorial coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Right ascension (degrees)
    pub ra: f64,
    /// Declination (degrees)
    pub dec: f64,
}

impl Coordinate {
    pub const fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }
}

/// Rectangular sky area defined by two opposite corners.
///
/// Corner order carries no meaning for the query, but it is preserved as
/// entered so query strings read `ra1/dec1` from the first corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub first: Coordinate,
    pub second: Coordinate,
}

impl Region {
    pub const fn new(first: Coordinate, second: Coordinate) -> Self {
        Self { first, second }
    }
}

/// Preset id sent for manually entered regions.
pub const MANUAL_PRESET_ID: u32 = 0;

/// A region submitted for classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionQuery {
    pub region: Region,
    /// Selects a demo response on the service side; 0 for manual entry.
    pub preset_id: u32,
}

impl RegionQuery {
    pub fn manual(region: Region) -> Self {
        Self {
            region,
            preset_id: MANUAL_PRESET_ID,
        }
    }

    /// Heading for the query view: the preset name, or both corners.
    pub fn title(&self) -> String {
        if let Some(preset) = Preset::all().iter().find(|p| p.id == self.preset_id) {
            return preset.name.to_string();
        }
        let Region { first, second } = self.region;
        format!(
            "α {} δ {} / α {} δ {}",
            first.ra, first.dec, second.ra, second.dec
        )
    }
}

/// A named, hard-coded example region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub id: u32,
    pub name: &'static str,
    pub region: Region,
}

impl Preset {
    pub fn query(&self) -> RegionQuery {
        RegionQuery {
            region: self.region,
            preset_id: self.id,
        }
    }

    pub fn all() -> &'static [Preset] {
        PRESETS
    }
}

static PRESETS: &[Preset] = &[
    Preset {
        id: 1,
        name: "Quinteto de Stephan",
        region: Region::new(
            Coordinate::new(339.06204, 33.99082),
            Coordinate::new(338.95632, 33.9296),
        ),
    },
    Preset {
        id: 2,
        name: "UGC 01962",
        region: Region::new(
            Coordinate::new(37.24124, 0.37942),
            Coordinate::new(37.21113, 0.3584),
        ),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_ids_are_unique_and_nonzero() {
        let ids: Vec<u32> = Preset::all().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(!ids.contains(&MANUAL_PRESET_ID));
    }

    #[test]
    fn test_preset_query_carries_id() {
        let stephan = &Preset::all()[0];
        let query = stephan.query();
        assert_eq!(query.preset_id, 1);
        assert_eq!(query.region.first, Coordinate::new(339.06204, 33.99082));
    }

    #[test]
    fn test_title_names_preset() {
        assert_eq!(Preset::all()[1].query().title(), "UGC 01962");
    }

    #[test]
    fn test_title_lists_manual_corners() {
        let region = Region::new(Coordinate::new(10.5, -3.0), Coordinate::new(11.0, 0.25));
        assert_eq!(
            RegionQuery::manual(region).title(),
            "α 10.5 δ -3 / α 11 δ 0.25"
        );
    }

    #[test]
    fn test_manual_query_uses_zero() {
        let region = Region::new(Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0));
        assert_eq!(RegionQuery::manual(region).preset_id, 0);
    }
}
