//! Building placement checks.

use frontier_geo::territory_contains;
use frontier_types::{Coordinate, Territory, UserId};

use crate::error::BuildingError;

/// Check that `user` may place a building at `point` inside `territory`.
///
/// Ownership is checked before position.
pub fn validate_placement(
    territory: &Territory,
    user: UserId,
    point: Coordinate,
) -> Result<(), BuildingError> {
    if territory.owner_id != user {
        return Err(BuildingError::NotOwner {
            territory: territory.id,
            user,
        });
    }
    if !territory_contains(territory, point) {
        return Err(BuildingError::LocationInvalid {
            territory: territory.id,
        });
    }
    Ok(())
}
