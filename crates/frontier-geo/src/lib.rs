//! Geofencing, proximity, territories, and points of interest for Frontier.
//!
//! Everything in this crate works on data already loaded into memory. The
//! two spatial primitives are kept apart: polygon containment
//! answers "is this inside my territory", radius proximity answers "is the
//! player standing at this POI".
//!
//! # Modules
//!
//! - [`error`] -- Error types for territory and POI operations.
//! - [`geofence`] -- Even-odd ray-casting point-in-polygon test.
//! - [`poi`] -- POI status lifecycle and danger clamping.
//! - [`proximity`] -- Haversine distance, radius test, nearby POI query.
//! - [`territory`] -- Territory construction from a claim walk, area,
//!   and the [`TerritoryRegistry`].

pub mod error;
pub mod geofence;
pub mod poi;
pub mod proximity;
pub mod territory;

// Re-export primary types at crate root.
pub use error::GeoError;
pub use geofence::contains;
pub use proximity::{distance_meters, nearby_pois, within_radius};
pub use territory::{
    TerritoryConfig, TerritoryRegistry, bounding_box, build_territory, polygon_area_m2,
    territory_contains,
};
