//! Proximity and affinity scoring for feed candidates.
//!
//! Two signals per candidate: great-circle distance from viewer to
//! author, and the gap between their sport ratings. Each maps to a
//! score where lower is better; unknown signals take a fixed penalty
//! instead of an infinity that would poison the blend.
//!
//! The distance scale is piecewise so short range keeps resolution:
//! a 2 km difference matters at neighborhood scale and is noise at
//! 500 km.

use social_schema::GeoPoint;
use std::collections::BTreeMap;

/// Score assigned when the viewer/author distance is unknown.
pub const UNKNOWN_LOCATION_SCORE: f64 = 1000.0;
/// Score assigned when viewer and author share no rated sport.
pub const UNKNOWN_RATING_SCORE: f64 = 100.0;
/// Weight of the location component in the combined score.
pub const LOCATION_WEIGHT: f64 = 0.7;
/// Weight of the rating component in the combined score.
pub const RATING_WEIGHT: f64 = 0.3;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle (haversine) distance between two points, in km.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Map a distance to a location score.
///
/// 0–10 km maps linearly onto 0–100, 10–50 km onto 100–300, 50–200 km
/// onto 300–600, and beyond 200 km the score grows one point per km
/// until it caps at the unknown-distance penalty.
pub fn location_score(distance_km: Option<f64>) -> f64 {
    let Some(d) = distance_km else {
        return UNKNOWN_LOCATION_SCORE;
    };
    if d <= 10.0 {
        d * 10.0
    } else if d <= 50.0 {
        100.0 + (d - 10.0) * 5.0
    } else if d <= 200.0 {
        300.0 + (d - 50.0) * 2.0
    } else {
        (600.0 + (d - 200.0)).min(UNKNOWN_LOCATION_SCORE)
    }
}

/// Mean absolute rating difference across sports rated by both
/// players; `None` when they share no rated sport.
pub fn rating_affinity(
    viewer: &BTreeMap<String, f64>,
    author: &BTreeMap<String, f64>,
) -> Option<f64> {
    let mut sum = 0.0;
    let mut shared = 0usize;
    for (sport, rating) in viewer {
        if let Some(other) = author.get(sport) {
            sum += (rating - other).abs();
            shared += 1;
        }
    }
    if shared == 0 {
        None
    } else {
        Some(sum / shared as f64)
    }
}

/// Map a rating affinity to a score; unknown affinity takes the fixed
/// penalty.
pub fn rating_score(affinity: Option<f64>) -> f64 {
    affinity.map_or(UNKNOWN_RATING_SCORE, |a| a * 10.0)
}

/// Blend the two components; lower totals rank first.
pub fn combined_score(location: f64, rating: f64) -> f64 {
    LOCATION_WEIGHT * location + RATING_WEIGHT * rating
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries
            .iter()
            .map(|(sport, rating)| (sport.to_string(), *rating))
            .collect()
    }

    #[test]
    fn haversine_matches_known_distances() {
        // One degree of latitude is ~111.2 km.
        let origin = GeoPoint { lat: 0.0, lon: 0.0 };
        let north = GeoPoint { lat: 1.0, lon: 0.0 };
        let d = haversine_km(origin, north);
        assert!((d - 111.2).abs() < 0.5, "got {d}");

        assert_eq!(haversine_km(origin, origin), 0.0);
    }

    #[test]
    fn location_scale_is_continuous_at_breakpoints() {
        assert_eq!(location_score(Some(0.0)), 0.0);
        assert_eq!(location_score(Some(10.0)), 100.0);
        assert_eq!(location_score(Some(50.0)), 300.0);
        assert_eq!(location_score(Some(200.0)), 600.0);
        assert_eq!(location_score(Some(300.0)), 700.0);
    }

    #[test]
    fn location_scale_caps_at_penalty() {
        assert_eq!(location_score(Some(2000.0)), UNKNOWN_LOCATION_SCORE);
        assert_eq!(location_score(None), UNKNOWN_LOCATION_SCORE);
    }

    #[test]
    fn short_range_keeps_resolution() {
        // 1.4 km scores ~14: neighborhood-scale differences stay
        // visible in the score.
        let score = location_score(Some(1.4));
        assert!((score - 14.0).abs() < 1e-9);
    }

    #[test]
    fn affinity_averages_shared_sports_only() {
        let viewer = ratings(&[("tennis", 4.0), ("padel", 2.0), ("squash", 5.0)]);
        let author = ratings(&[("tennis", 3.0), ("padel", 4.0), ("soccer", 1.0)]);
        // |4-3| and |2-4| average to 1.5; squash and soccer ignored.
        assert_eq!(rating_affinity(&viewer, &author), Some(1.5));
    }

    #[test]
    fn affinity_is_unknown_without_shared_sports() {
        let viewer = ratings(&[("tennis", 4.0)]);
        let author = ratings(&[("soccer", 4.0)]);
        assert_eq!(rating_affinity(&viewer, &author), None);
        assert_eq!(rating_score(None), UNKNOWN_RATING_SCORE);
    }

    #[test]
    fn combined_score_weights_location_heavier() {
        let total = combined_score(14.0, 100.0);
        assert!((total - 39.8).abs() < 1e-9);
    }
}
