//! Territory claim walks.
//!
//! The player walks the boundary of the area they want; each position
//! report becomes a vertex unless it is within `min_spacing_m` of the
//! previous one. Completing the walk turns the vertices into a
//! [`Territory`].

use chrono::{DateTime, Utc};

use frontier_geo::{GeoError, TerritoryConfig, build_territory, distance_meters};
use frontier_types::{Coordinate, Territory, UserId};

/// An in-progress claim walk.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimTracker {
    owner_id: UserId,
    started_at: DateTime<Utc>,
    min_spacing_m: f64,
    path: Vec<Coordinate>,
    walked_m: f64,
}

impl ClaimTracker {
    /// Begin a claim walk.
    pub const fn new(owner_id: UserId, started_at: DateTime<Utc>, min_spacing_m: f64) -> Self {
        Self {
            owner_id,
            started_at,
            min_spacing_m,
            path: Vec::new(),
            walked_m: 0.0,
        }
    }

    /// Record a position. Returns `true` if it became a vertex.
    pub fn add_point(&mut self, point: Coordinate) -> bool {
        if let Some(last) = self.path.last() {
            let step = distance_meters(*last, point);
            if step < self.min_spacing_m {
                return false;
            }
            self.walked_m += step;
        }
        self.path.push(point);
        true
    }

    /// Vertices so far.
    pub fn points(&self) -> &[Coordinate] {
        &self.path
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether no vertex has been recorded.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Length of the walked boundary in meters, not counting closure.
    pub const fn walked_m(&self) -> f64 {
        self.walked_m
    }

    /// When the walk began.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Finish the walk and build the territory.
    ///
    /// # Errors
    ///
    /// As [`build_territory`]: too few points, blank name, or area out of
    /// range. The tracker is consumed either way; start a new walk to retry.
    pub fn complete(
        self,
        name: &str,
        now: DateTime<Utc>,
        config: &TerritoryConfig,
    ) -> Result<Territory, GeoError> {
        let territory = build_territory(self.owner_id, name, &self.path, now, config)?;
        tracing::info!(
            territory = %territory.id,
            user = %territory.owner_id,
            area_m2 = territory.area_m2,
            points = territory.point_count,
            "territory claimed"
        );
        Ok(territory)
    }
}
