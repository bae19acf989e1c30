//! Distance and radius tests.
//!
//! Used for "has the player walked into this POI's trigger radius". This is
//! a separate primitive from [`crate::geofence::contains`] and shares no
//! state with it.

use frontier_types::{Coordinate, PointOfInterest};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters (haversine).
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Whether `point` is within `radius_m` meters of `center` (inclusive).
///
/// A negative radius matches nothing.
pub fn within_radius(point: Coordinate, center: Coordinate, radius_m: f64) -> bool {
    radius_m >= 0.0 && distance_meters(point, center) <= radius_m
}

/// POIs within `radius_m` of `player`, nearest first, paired with their
/// distance.
pub fn nearby_pois(
    player: Coordinate,
    pois: &[PointOfInterest],
    radius_m: f64,
) -> Vec<(&PointOfInterest, f64)> {
    let mut hits: Vec<(&PointOfInterest, f64)> = pois
        .iter()
        .map(|poi| (poi, distance_meters(player, poi.coordinate)))
        .filter(|(_, d)| radius_m >= 0.0 && *d <= radius_m)
        .collect();
    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    hits
}

#[cfg(test)]
mod tests {
    use frontier_types::{PoiId, PoiStatus, PoiType};

    use super::*;

    fn poi_at(name: &str, coordinate: Coordinate) -> PointOfInterest {
        PointOfInterest {
            id: PoiId::new(),
            name: String::from(name),
            poi_type: PoiType::Supermarket,
            coordinate,
            status: PoiStatus::Undiscovered,
            danger_level: 1,
            last_looted_at: None,
        }
    }

    #[test]
    fn zero_distance_to_self() {
        let p = Coordinate::new(31.23, 121.47);
        assert!(distance_meters(p, p).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = distance_meters(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(31.230, 121.470);
        let b = Coordinate::new(31.235, 121.475);
        assert!((distance_meters(a, b) - distance_meters(b, a)).abs() < 1e-6);
    }

    #[test]
    fn radius_is_inclusive_and_rejects_negative() {
        let a = Coordinate::new(10.0, 10.0);
        assert!(within_radius(a, a, 0.0));
        assert!(!within_radius(a, a, -1.0));
        let b = Coordinate::new(10.0005, 10.0);
        assert!(within_radius(b, a, 100.0));
        assert!(!within_radius(b, a, 10.0));
    }

    #[test]
    fn nearby_pois_sorted_by_distance() {
        let player = Coordinate::new(31.2300, 121.4700);
        let pois = vec![
            poi_at("far", Coordinate::new(31.2310, 121.4700)),
            poi_at("near", Coordinate::new(31.2302, 121.4700)),
            poi_at("out", Coordinate::new(31.2400, 121.4700)),
        ];
        let hits = nearby_pois(player, &pois, 150.0);
        let names: Vec<&str> = hits.iter().map(|(p, _)| p.name.as_str()).collect();
        assert_eq!(names, vec!["near", "far"]);
    }
}
