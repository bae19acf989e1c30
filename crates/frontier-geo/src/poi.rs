//! Point-of-interest lifecycle.
//!
//! Status only moves forward: `Undiscovered -> Discovered -> HasResources
//! | Looted`. `Dangerous` can be layered onto a discovered site and does not
//! stop scavenging. A looted site stays looted until the backend resets it.

use chrono::{DateTime, Utc};

use frontier_types::{Coordinate, PoiId, PoiStatus, PoiType, PointOfInterest};

use crate::error::GeoError;

/// Lowest danger rating.
pub const MIN_DANGER_LEVEL: u8 = 1;

/// Highest danger rating.
pub const MAX_DANGER_LEVEL: u8 = 5;

/// Clamp any integer danger rating into `1..=5`.
pub fn clamp_danger(level: i64) -> u8 {
    let clamped = level.clamp(i64::from(MIN_DANGER_LEVEL), i64::from(MAX_DANGER_LEVEL));
    u8::try_from(clamped).unwrap_or(MAX_DANGER_LEVEL)
}

/// Create an undiscovered POI with a clamped danger level.
pub fn new_poi(
    name: &str,
    poi_type: PoiType,
    coordinate: Coordinate,
    danger_level: i64,
) -> PointOfInterest {
    PointOfInterest {
        id: PoiId::new(),
        name: String::from(name),
        poi_type,
        coordinate,
        status: PoiStatus::Undiscovered,
        danger_level: clamp_danger(danger_level),
        last_looted_at: None,
    }
}

/// Update the danger level, clamping into range.
pub fn set_danger_level(poi: &mut PointOfInterest, level: i64) {
    poi.danger_level = clamp_danger(level);
}

/// Whether the POI can currently be scavenged.
pub const fn can_scavenge(poi: &PointOfInterest) -> bool {
    matches!(
        poi.status,
        PoiStatus::Discovered | PoiStatus::HasResources | PoiStatus::Dangerous
    )
}

/// Mark a POI as seen.
///
/// Returns `true` if this call discovered it, `false` if it was already
/// past `Undiscovered`. Re-entering a trigger radius is not an error.
pub fn discover(poi: &mut PointOfInterest) -> bool {
    if poi.status == PoiStatus::Undiscovered {
        poi.status = PoiStatus::Discovered;
        tracing::debug!(poi = %poi.id, name = %poi.name, "poi discovered");
        true
    } else {
        false
    }
}

/// Record that a discovered POI holds loot.
///
/// # Errors
///
/// Returns [`GeoError::InvalidPoiTransition`] unless the POI is discovered
/// (or already marked).
pub fn mark_resources(poi: &mut PointOfInterest) -> Result<(), GeoError> {
    match poi.status {
        PoiStatus::Discovered => {
            poi.status = PoiStatus::HasResources;
            Ok(())
        }
        PoiStatus::HasResources => Ok(()),
        from => Err(transition_error(poi.id, from, PoiStatus::HasResources)),
    }
}

/// Flag a discovered POI as dangerous.
///
/// # Errors
///
/// Returns [`GeoError::InvalidPoiTransition`] for undiscovered or looted POIs.
pub fn mark_dangerous(poi: &mut PointOfInterest) -> Result<(), GeoError> {
    match poi.status {
        PoiStatus::Discovered | PoiStatus::HasResources => {
            poi.status = PoiStatus::Dangerous;
            Ok(())
        }
        PoiStatus::Dangerous => Ok(()),
        from => Err(transition_error(poi.id, from, PoiStatus::Dangerous)),
    }
}

/// Mark a POI as scavenged.
///
/// # Errors
///
/// Returns [`GeoError::InvalidPoiTransition`] if the POI is undiscovered or
/// already looted.
pub fn mark_looted(poi: &mut PointOfInterest, now: DateTime<Utc>) -> Result<(), GeoError> {
    if !can_scavenge(poi) {
        return Err(transition_error(poi.id, poi.status, PoiStatus::Looted));
    }
    poi.status = PoiStatus::Looted;
    poi.last_looted_at = Some(now);
    tracing::debug!(poi = %poi.id, "poi looted");
    Ok(())
}

const fn transition_error(poi: PoiId, from: PoiStatus, to: PoiStatus) -> GeoError {
    GeoError::InvalidPoiTransition { poi, from, to }
}
