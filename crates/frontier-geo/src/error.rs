//! Error types for the `frontier-geo` crate.
//!
//! Pure geometry never fails: a degenerate polygon simply contains nothing.
//! These errors cover territory construction and POI state changes.

use frontier_types::{PoiId, PoiStatus, TerritoryId, UserId};

/// Errors that can occur during territory and POI operations.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// A claim walk produced too few distinct vertices to form a polygon.
    #[error("territory needs at least {required} points, got {actual}")]
    TooFewPoints {
        /// Minimum vertex count.
        required: u32,
        /// Vertices supplied after removing the closing point.
        actual: u32,
    },

    /// The enclosed area is outside the allowed range.
    #[error("territory area {area_m2:.1} m2 outside allowed range {min_m2:.1}..={max_m2:.1} m2")]
    AreaOutOfRange {
        /// Computed area.
        area_m2: f64,
        /// Smallest allowed area.
        min_m2: f64,
        /// Largest allowed area.
        max_m2: f64,
    },

    /// A territory name was empty after trimming.
    #[error("territory name must not be empty")]
    EmptyName,

    /// No territory with this id exists in the registry.
    #[error("territory not found: {0}")]
    TerritoryNotFound(TerritoryId),

    /// Someone other than the owner tried to modify a territory.
    #[error("user {user} does not own territory {territory}")]
    NotOwner {
        /// The territory.
        territory: TerritoryId,
        /// The user attempting the change.
        user: UserId,
    },

    /// A POI status change that the lifecycle does not allow.
    #[error("POI {poi} cannot move from {from:?} to {to:?}")]
    InvalidPoiTransition {
        /// The POI.
        poi: PoiId,
        /// Current status.
        from: PoiStatus,
        /// Requested status.
        to: PoiStatus,
    },
}
