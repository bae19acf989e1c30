//! Territory construction and bookkeeping.
//!
//! A territory is created when a player finishes walking a closed loop. The
//! walk becomes the polygon boundary, its area is computed on a local flat
//! projection, and the result is kept in a [`TerritoryRegistry`] until the
//! owner renames or deletes it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use frontier_types::{Coordinate, Territory, TerritoryId, UserId};

use crate::error::GeoError;
use crate::geofence;
use crate::proximity::{self, EARTH_RADIUS_M};

/// Two vertices closer than this are treated as the same point when
/// detecting an explicit closing vertex.
const CLOSURE_TOLERANCE_M: f64 = 0.5;

/// Limits applied when turning a claim walk into a territory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritoryConfig {
    /// Minimum number of boundary vertices.
    #[serde(default = "default_min_points")]
    pub min_points: u32,
    /// Smallest claimable area in square meters.
    #[serde(default = "default_min_area_m2")]
    pub min_area_m2: f64,
    /// Largest claimable area in square meters.
    #[serde(default = "default_max_area_m2")]
    pub max_area_m2: f64,
}

impl Default for TerritoryConfig {
    fn default() -> Self {
        Self {
            min_points: default_min_points(),
            min_area_m2: default_min_area_m2(),
            max_area_m2: default_max_area_m2(),
        }
    }
}

const fn default_min_points() -> u32 {
    3
}

const fn default_min_area_m2() -> f64 {
    100.0
}

const fn default_max_area_m2() -> f64 {
    5_000_000.0
}

/// Area of the implicitly closed polygon in square meters.
///
/// Projects onto a plane tangent at the mean latitude (equirectangular) and
/// applies the shoelace formula. Fewer than three vertices have zero area.
pub fn polygon_area_m2(path: &[Coordinate]) -> f64 {
    if path.len() < geofence::MIN_POLYGON_VERTICES {
        return 0.0;
    }
    let Some(mut previous) = path.last() else {
        return 0.0;
    };

    let mean_lat = path.iter().map(|c| c.latitude).sum::<f64>() / count_f64(path.len());
    let x_scale = EARTH_RADIUS_M * mean_lat.to_radians().cos();
    let project = |c: &Coordinate| {
        (
            c.longitude.to_radians() * x_scale,
            c.latitude.to_radians() * EARTH_RADIUS_M,
        )
    };

    let mut twice_area = 0.0;
    for current in path {
        let (x0, y0) = project(previous);
        let (x1, y1) = project(current);
        twice_area += x0 * y1 - x1 * y0;
        previous = current;
    }
    (twice_area / 2.0).abs()
}

/// `usize` vertex counts are tiny; the conversion is exact in practice.
#[allow(clippy::cast_precision_loss)]
const fn count_f64(n: usize) -> f64 {
    n as f64
}

/// Axis-aligned bounds of a path as `(south_west, north_east)`.
///
/// Returns `None` for an empty path.
pub fn bounding_box(path: &[Coordinate]) -> Option<(Coordinate, Coordinate)> {
    let first = path.first()?;
    let mut min = *first;
    let mut max = *first;
    for c in path {
        min.latitude = min.latitude.min(c.latitude);
        min.longitude = min.longitude.min(c.longitude);
        max.latitude = max.latitude.max(c.latitude);
        max.longitude = max.longitude.max(c.longitude);
    }
    Some((min, max))
}

/// Build a territory from a completed claim walk.
///
/// An explicit closing vertex (last point back on the first) is dropped
/// since closure is implicit.
///
/// # Errors
///
/// Returns [`GeoError::TooFewPoints`] if fewer than `min_points` distinct
/// vertices remain, [`GeoError::EmptyName`] for a blank name, and
/// [`GeoError::AreaOutOfRange`] if the enclosed area is outside the limits.
pub fn build_territory(
    owner_id: UserId,
    name: &str,
    walk: &[Coordinate],
    created_at: DateTime<Utc>,
    config: &TerritoryConfig,
) -> Result<Territory, GeoError> {
    let mut path = walk.to_vec();
    let explicitly_closed = match (path.first(), path.last()) {
        (Some(first), Some(last)) if path.len() > 1 => {
            proximity::distance_meters(*first, *last) < CLOSURE_TOLERANCE_M
        }
        _ => false,
    };
    if explicitly_closed {
        path.pop();
    }

    let point_count = u32::try_from(path.len()).unwrap_or(u32::MAX);
    let required = config
        .min_points
        .max(u32::try_from(geofence::MIN_POLYGON_VERTICES).unwrap_or(3));
    if point_count < required {
        return Err(GeoError::TooFewPoints {
            required,
            actual: point_count,
        });
    }

    let name = validated_name(name)?;

    let area_m2 = polygon_area_m2(&path);
    if area_m2 < config.min_area_m2 || area_m2 > config.max_area_m2 {
        return Err(GeoError::AreaOutOfRange {
            area_m2,
            min_m2: config.min_area_m2,
            max_m2: config.max_area_m2,
        });
    }

    Ok(Territory {
        id: TerritoryId::new(),
        owner_id,
        name,
        path,
        area_m2,
        point_count,
        created_at,
    })
}

/// Whether a point lies inside the territory boundary.
pub fn territory_contains(territory: &Territory, point: Coordinate) -> bool {
    geofence::contains(point, &territory.path)
}

fn validated_name(name: &str) -> Result<String, GeoError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GeoError::EmptyName);
    }
    Ok(String::from(trimmed))
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// All territories known to the client, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct TerritoryRegistry {
    territories: BTreeMap<TerritoryId, Territory>,
}

impl TerritoryRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            territories: BTreeMap::new(),
        }
    }

    /// Add a territory, replacing any with the same id.
    pub fn insert(&mut self, territory: Territory) {
        tracing::info!(
            territory = %territory.id,
            owner = %territory.owner_id,
            area_m2 = territory.area_m2,
            points = territory.point_count,
            "territory registered"
        );
        self.territories.insert(territory.id, territory);
    }

    /// Look up a territory by id.
    pub fn get(&self, id: TerritoryId) -> Option<&Territory> {
        self.territories.get(&id)
    }

    /// Number of territories held.
    pub fn len(&self) -> usize {
        self.territories.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    /// Territories owned by `owner`.
    pub fn owned_by(&self, owner: UserId) -> impl Iterator<Item = &Territory> {
        self.territories
            .values()
            .filter(move |t| t.owner_id == owner)
    }

    /// Total claimed area of `owner` in square meters.
    pub fn total_area_m2(&self, owner: UserId) -> f64 {
        self.owned_by(owner).map(|t| t.area_m2).sum()
    }

    /// First territory containing `point`, if any.
    pub fn find_containing(&self, point: Coordinate) -> Option<&Territory> {
        self.territories
            .values()
            .find(|t| territory_contains(t, point))
    }

    /// Rename a territory. Only the owner may rename.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::TerritoryNotFound`], [`GeoError::NotOwner`], or
    /// [`GeoError::EmptyName`].
    pub fn rename(&mut self, id: TerritoryId, user: UserId, new_name: &str) -> Result<(), GeoError> {
        let territory = self
            .territories
            .get_mut(&id)
            .ok_or(GeoError::TerritoryNotFound(id))?;
        if territory.owner_id != user {
            return Err(GeoError::NotOwner {
                territory: id,
                user,
            });
        }
        territory.name = validated_name(new_name)?;
        tracing::debug!(territory = %id, name = %territory.name, "territory renamed");
        Ok(())
    }

    /// Delete a territory. Only the owner may delete; this is irreversible.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::TerritoryNotFound`] or [`GeoError::NotOwner`].
    pub fn delete(&mut self, id: TerritoryId, user: UserId) -> Result<Territory, GeoError> {
        let owner = self
            .territories
            .get(&id)
            .map(|t| t.owner_id)
            .ok_or(GeoError::TerritoryNotFound(id))?;
        if owner != user {
            return Err(GeoError::NotOwner {
                territory: id,
                user,
            });
        }
        let removed = self
            .territories
            .remove(&id)
            .ok_or(GeoError::TerritoryNotFound(id))?;
        tracing::info!(territory = %id, owner = %user, "territory deleted");
        Ok(removed)
    }
}
