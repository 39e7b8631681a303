//! Endpoint URL construction for the classification service.

use crate::state::region::RegionQuery;

/// Query parameter appended to every image request.
pub const CACHE_BUST_PARAM: &str = "no-cache-str";

/// Builds URLs for the two service endpoints from a configured base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    base: String,
}

impl ServiceEndpoints {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// `GET {base}/image-url?...` resolves the raw survey image location.
    pub fn image_url_lookup(&self, query: &RegionQuery) -> String {
        format!("{}/image-url?{}", self.base, corner_params(query))
    }

    /// `GET {base}/?...&mock=N` returns the classified image bytes.
    pub fn classified_image(&self, query: &RegionQuery) -> String {
        format!(
            "{}/?{}&mock={}",
            self.base,
            corner_params(query),
            query.preset_id
        )
    }
}

fn corner_params(query: &RegionQuery) -> String {
    let region = &query.region;
    format!(
        "ra1={}&dec1={}&ra2={}&dec2={}",
        region.first.ra, region.first.dec, region.second.ra, region.second.dec
    )
}

/// Appends a strictly increasing timestamp parameter to image URLs.
///
/// The value is the current time in milliseconds, bumped past the last
/// issued value when two requests land in the same millisecond.
#[derive(Debug, Default)]
pub struct CacheBuster {
    last_issued: u64,
}

impl CacheBuster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, url: &str, now_ms: u64) -> String {
        let stamp = now_ms.max(self.last_issued + 1);
        self.last_issued = stamp;

        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{url}{separator}{CACHE_BUST_PARAM}={stamp}")
    }
}

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::region::{Coordinate, Preset, Region};

    fn endpoints() -> ServiceEndpoints {
        ServiceEndpoints::new("http://localhost:5000/")
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let query = Preset::all()[0].query();
        assert!(endpoints()
            .image_url_lookup(&query)
            .starts_with("http://localhost:5000/image-url?"));
    }

    #[test]
    fn test_stephan_preset_classified_url() {
        let query = Preset::all()[0].query();
        let url = endpoints().classified_image(&query);
        assert_eq!(
            url,
            "http://localhost:5000/?ra1=339.06204&dec1=33.99082&ra2=338.95632&dec2=33.9296&mock=1"
        );
    }

    #[test]
    fn test_ugc_preset_uses_mock_two() {
        let query = Preset::all()[1].query();
        let url = endpoints().classified_image(&query);
        assert!(url.contains("ra1=37.24124&dec1=0.37942&ra2=37.21113&dec2=0.3584"));
        assert!(url.ends_with("&mock=2"));
    }

    #[test]
    fn test_manual_query_defaults_mock_zero() {
        let region = Region::new(
            Coordinate::new(179.75077, -0.45269),
            Coordinate::new(179.75475, -0.44709),
        );
        let url = endpoints().classified_image(&RegionQuery::manual(region));
        assert!(url.ends_with("ra1=179.75077&dec1=-0.45269&ra2=179.75475&dec2=-0.44709&mock=0"));
    }

    #[test]
    fn test_image_url_lookup_preserves_corner_order() {
        let region = Region::new(Coordinate::new(2.0, 3.5), Coordinate::new(1.0, 0.25));
        let url = endpoints().image_url_lookup(&RegionQuery::manual(region));
        assert_eq!(
            url,
            "http://localhost:5000/image-url?ra1=2&dec1=3.5&ra2=1&dec2=0.25"
        );
    }

    #[test]
    fn test_cache_buster_separator() {
        let mut buster = CacheBuster::new();
        assert_eq!(
            buster.apply("http://x/img.png", 1000),
            "http://x/img.png?no-cache-str=1000"
        );
        assert_eq!(
            buster.apply("http://x/?ra1=1", 2000),
            "http://x/?ra1=1&no-cache-str=2000"
        );
    }

    #[test]
    fn test_cache_buster_is_strictly_increasing() {
        let mut buster = CacheBuster::new();
        let a = buster.apply("http://x/img.png", 500);
        let b = buster.apply("http://x/img.png", 500);
        let c = buster.apply("http://x/img.png", 400);
        assert_ne!(a, b);
        assert!(b.ends_with("=501"));
        assert!(c.ends_with("=502"));
    }
}
