//! Error types for exploration and building placement.

use frontier_geo::GeoError;
use frontier_types::{PoiId, PoiStatus, TerritoryId, UserId};

/// Errors raised by the exploration session and POI scavenging.
#[derive(Debug, thiserror::Error)]
pub enum ExplorationError {
    /// `start` was called while a session is running.
    #[error("an exploration session is already running")]
    AlreadyExploring,

    /// A fix or `finish` arrived with no running session.
    #[error("no exploration session is running")]
    NotExploring,

    /// The player is not standing at the POI.
    #[error("poi {poi} is {distance_m:.0} m away, limit {radius_m:.0} m")]
    TooFarFromPoi {
        /// The POI.
        poi: PoiId,
        /// Current distance.
        distance_m: f64,
        /// Allowed radius.
        radius_m: f64,
    },

    /// The POI's status does not allow scavenging.
    #[error("poi {poi} cannot be scavenged while {status:?}")]
    NotScavengeable {
        /// The POI.
        poi: PoiId,
        /// Its status.
        status: PoiStatus,
    },

    /// A POI status transition failed.
    #[error(transparent)]
    Poi(#[from] GeoError),
}

/// Why a building cannot go where it was placed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildingError {
    /// The user does not own the territory.
    #[error("user {user} does not own territory {territory}")]
    NotOwner {
        /// The territory.
        territory: TerritoryId,
        /// The user attempting to build.
        user: UserId,
    },

    /// The point lies outside the territory boundary.
    #[error("location is outside territory {territory}")]
    LocationInvalid {
        /// The territory.
        territory: TerritoryId,
    },
}
