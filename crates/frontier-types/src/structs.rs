//! Core entity structs: map geometry, points of interest, items, inventory
//! stacks, and trade records.
//!
//! These are plain data. Behavior lives in the crates that own each concern
//! (`frontier-geo`, `frontier-inventory`, `frontier-trade`), which keeps this
//! crate free of business rules and wire-format mapping.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ItemCategory, ItemQuality, PoiStatus, PoiType, Rarity, TradeStatus};
use crate::ids::{ItemId, PoiId, TerritoryId, TradeHistoryId, TradeOfferId, UserId};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coordinate {
    /// Latitude, positive north.
    pub latitude: f64,
    /// Longitude, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single position report from the location provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LocationFix {
    /// Where the device was.
    pub coordinate: Coordinate,
    /// When the fix was taken.
    pub timestamp: DateTime<Utc>,
}

/// A player-owned closed polygon on the map.
///
/// Closure is implicit: the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Territory {
    /// Unique territory identifier.
    pub id: TerritoryId,
    /// The player who walked the boundary.
    pub owner_id: UserId,
    /// Display name, editable by the owner.
    pub name: String,
    /// Boundary vertices in walk order.
    pub path: Vec<Coordinate>,
    /// Enclosed area in square meters.
    pub area_m2: f64,
    /// Number of boundary vertices.
    pub point_count: u32,
    /// When the claim was completed.
    pub created_at: DateTime<Utc>,
}

/// A scavengeable location on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PointOfInterest {
    /// Unique POI identifier.
    pub id: PoiId,
    /// Display name.
    pub name: String,
    /// Place category.
    pub poi_type: PoiType,
    /// Map position.
    pub coordinate: Coordinate,
    /// Discovery and loot status.
    pub status: PoiStatus,
    /// Hazard rating, always within 1..=5.
    pub danger_level: u8,
    /// When the player last scavenged it.
    pub last_looted_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Static catalog entry for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ItemDefinition {
    /// Catalog key.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Broad category.
    pub category: ItemCategory,
    /// Weight of one unit in kilograms.
    #[ts(as = "String")]
    pub weight: Decimal,
    /// Volume of one unit in liters.
    #[ts(as = "String")]
    pub volume: Decimal,
    /// Rarity band the loot roller files this item under.
    pub rarity: Rarity,
    /// Whether units merge into a single stack.
    pub stackable: bool,
    /// Maximum units per stack. Ignored for non-stackable items, which hold
    /// one unit per stack.
    pub max_stack: u32,
}

/// A quantity of one item type held by one user.
///
/// `quantity` is never zero: empty stacks are removed, not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InventoryStack {
    /// Catalog key.
    pub item_id: ItemId,
    /// Units in this stack.
    pub quantity: u32,
    /// Optional condition. Part of the stack key.
    pub quality: Option<ItemQuality>,
}

/// An item produced by a loot roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ObtainedItem {
    /// Catalog key.
    pub item_id: ItemId,
    /// Units obtained.
    pub quantity: u32,
    /// Condition, if the roll assigned one.
    pub quality: Option<ItemQuality>,
    /// Band the roll landed in.
    pub rarity: Rarity,
}

// ---------------------------------------------------------------------------
// Trading
// ---------------------------------------------------------------------------

/// One line of a trade offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TradeItem {
    /// Catalog key.
    pub item_id: ItemId,
    /// Units to exchange. Must be positive.
    pub quantity: u32,
    /// Condition; `None` only matches unqualified stacks.
    pub quality: Option<ItemQuality>,
}

impl TradeItem {
    /// Create an unqualified trade line.
    pub fn new(item_id: impl Into<ItemId>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            quality: None,
        }
    }
}

/// A player-to-player exchange proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TradeOffer {
    /// Unique offer identifier.
    pub id: TradeOfferId,
    /// The player who posted the offer.
    pub owner_id: UserId,
    /// What the owner gives.
    pub offering_items: Vec<TradeItem>,
    /// What the owner wants back.
    pub requesting_items: Vec<TradeItem>,
    /// Lifecycle status.
    pub status: TradeStatus,
    /// Free-text note from the owner.
    pub message: Option<String>,
    /// When the offer was posted.
    pub created_at: DateTime<Utc>,
    /// After this instant an active offer counts as expired.
    pub expires_at: DateTime<Utc>,
    /// Who accepted the offer, once completed.
    pub completed_by_user_id: Option<UserId>,
    /// When the offer was accepted.
    pub completed_at: Option<DateTime<Utc>>,
}

/// The items that changed hands in a completed trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TradeExchange {
    /// Items the seller (offer owner) handed over.
    pub seller_gave: Vec<TradeItem>,
    /// Items the buyer (accepter) handed over.
    pub buyer_gave: Vec<TradeItem>,
}

/// Immutable record of a completed trade. Only the ratings are filled in
/// later, each at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TradeHistory {
    /// Unique record identifier.
    pub id: TradeHistoryId,
    /// The offer that was completed.
    pub offer_id: TradeOfferId,
    /// Offer owner.
    pub seller_id: UserId,
    /// Offer accepter.
    pub buyer_id: UserId,
    /// Snapshot of the exchanged items.
    pub items_exchanged: TradeExchange,
    /// Completion instant.
    pub completed_at: DateTime<Utc>,
    /// Rating the seller gave the buyer (1..=5).
    pub seller_rating: Option<u8>,
    /// Rating the buyer gave the seller (1..=5).
    pub buyer_rating: Option<u8>,
    /// Comment accompanying the seller's rating.
    pub seller_comment: Option<String>,
    /// Comment accompanying the buyer's rating.
    pub buyer_comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn item_definition_roundtrips_through_json() {
        let def = ItemDefinition {
            id: ItemId::from("water_bottle"),
            name: String::from("Water bottle"),
            category: ItemCategory::Water,
            weight: dec!(0.5),
            volume: dec!(0.6),
            rarity: Rarity::Common,
            stackable: true,
            max_stack: 20,
        };
        let json = serde_json::to_string(&def).unwrap_or_default();
        let back: Result<ItemDefinition, _> = serde_json::from_str(&json);
        assert_eq!(back.ok(), Some(def));
    }

    #[test]
    fn trade_item_defaults_to_no_quality() {
        let line = TradeItem::new("wood", 3);
        assert_eq!(line.item_id.as_str(), "wood");
        assert_eq!(line.quantity, 3);
        assert!(line.quality.is_none());
    }
}
