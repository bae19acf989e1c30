//! Enumeration types shared across the Frontier crates.
//!
//! Variants serialize in `snake_case` to match the backend column values
//! (`"has_resources"`, `"diamond"`, ...).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Points of interest
// ---------------------------------------------------------------------------

/// Discovery and loot status of a point of interest.
///
/// Progresses forward only: `Undiscovered -> Discovered -> HasResources |
/// Looted`. `Dangerous` is an overlay entered from a discovered state; a
/// dangerous site can still be scavenged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PoiStatus {
    /// Not yet seen by the player.
    Undiscovered,
    /// Seen but not yet surveyed.
    Discovered,
    /// Surveyed and known to hold loot.
    HasResources,
    /// Already scavenged; yields nothing until reset by the backend.
    Looted,
    /// Flagged as hazardous.
    Dangerous,
}

/// Category of a point of interest, mirroring the map's place types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PoiType {
    /// Grocery or convenience store.
    Supermarket,
    /// Hospital or clinic.
    Hospital,
    /// Pharmacy.
    Pharmacy,
    /// Fuel station.
    GasStation,
    /// Restaurant or cafe.
    Restaurant,
    /// Factory or warehouse.
    Factory,
    /// Police station.
    PoliceStation,
    /// Residential building.
    Residential,
    /// Anything else.
    Other,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Rarity band of an item. Also the band a loot roll lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Rarity {
    /// Everyday salvage.
    Common,
    /// Uncommon finds.
    Rare,
    /// The best loot in a tier.
    Epic,
}

impl Rarity {
    /// All bands from lowest to highest.
    pub const ALL: [Self; 3] = [Self::Common, Self::Rare, Self::Epic];
}

/// Condition of an individual item. Stacks are keyed by `(item, quality)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ItemQuality {
    /// Barely usable.
    Broken,
    /// Used, still working.
    Worn,
    /// Standard condition.
    Normal,
    /// Better than average.
    Good,
    /// As new.
    Pristine,
}

/// Broad item category used by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ItemCategory {
    /// Drinkable water.
    Water,
    /// Edible food.
    Food,
    /// Medical supplies.
    Medical,
    /// Raw building material.
    Material,
    /// Tools and equipment.
    Tool,
    /// Weapons.
    Weapon,
    /// Anything else.
    Misc,
}

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

/// Loot-quality bracket derived from walked distance.
///
/// Ordered: `None < Bronze < Silver < Gold < Diamond`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RewardTier {
    /// Walked too little for any reward.
    None,
    /// 200 m and up.
    Bronze,
    /// 500 m and up.
    Silver,
    /// 1 km and up.
    Gold,
    /// 2 km and up.
    Diamond,
}

impl RewardTier {
    /// All tiers from lowest to highest.
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::Bronze,
        Self::Silver,
        Self::Gold,
        Self::Diamond,
    ];
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Subscription level of a player; determines inventory slot capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SubscriptionTier {
    /// No subscription.
    Free,
    /// Mid tier.
    Plus,
    /// Top tier.
    Pro,
}

impl SubscriptionTier {
    /// Default number of inventory slots for the tier (100/200/300).
    pub const fn default_capacity(self) -> u32 {
        match self {
            Self::Free => 100,
            Self::Plus => 200,
            Self::Pro => 300,
        }
    }
}

// ---------------------------------------------------------------------------
// Trading
// ---------------------------------------------------------------------------

/// Lifecycle status of a trade offer.
///
/// `Active` is the only non-terminal state; no transition leaves a terminal
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TradeStatus {
    /// Open for acceptance.
    Active,
    /// Accepted and swapped.
    Completed,
    /// Withdrawn by the owner.
    Cancelled,
    /// Passed its expiry time without being accepted.
    Expired,
}

impl TradeStatus {
    /// Whether the status is final.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}
