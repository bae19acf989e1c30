//! Polygon containment.
//!
//! Even-odd ray casting on the flat (longitude, latitude) plane. No
//! projection correction is applied, which is fine for territories of a few
//! square kilometers but not for continent-sized shapes.
//!
//! Unrelated to [`crate::proximity`]: POI triggers use
//! a distance threshold, building placement uses containment.

use frontier_types::Coordinate;

/// Minimum vertex count for a testable polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Whether `point` lies inside the closed polygon described by `polygon`.
///
/// The polygon is implicitly closed (last vertex connects to the first).
/// Polygons with fewer than three vertices contain nothing.
pub fn contains(point: Coordinate, polygon: &[Coordinate]) -> bool {
    if polygon.len() < MIN_POLYGON_VERTICES {
        return false;
    }
    let Some(mut previous) = polygon.last() else {
        return false;
    };

    let (x, y) = (point.longitude, point.latitude);
    let mut inside = false;

    for current in polygon {
        let (xi, yi) = (current.longitude, current.latitude);
        let (xj, yj) = (previous.longitude, previous.latitude);

        // The straddle check guarantees yj != yi, so the division is safe.
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        previous = current;
    }

    inside
}
