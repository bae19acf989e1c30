//! Shared type definitions for the Frontier territory and scavenging core.
//!
//! This crate is the single source of truth for the domain model used
//! across the workspace. Types flow downstream to `TypeScript` via `ts-rs`
//! for the map client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers for rows and catalog items
//! - [`enums`] -- Status, rarity, tier, and subscription enumerations
//! - [`structs`] -- Geometry, POIs, items, stacks, and trade records

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    ItemCategory, ItemQuality, PoiStatus, PoiType, Rarity, RewardTier, SubscriptionTier,
    TradeStatus,
};
pub use ids::{ItemId, PoiId, TerritoryId, TradeHistoryId, TradeOfferId, UserId};
pub use structs::{
    Coordinate, InventoryStack, ItemDefinition, LocationFix, ObtainedItem, PointOfInterest,
    Territory, TradeExchange, TradeHistory, TradeItem, TradeOffer,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the map client.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::UserId::export_all();
        let _ = crate::ids::TerritoryId::export_all();
        let _ = crate::ids::PoiId::export_all();
        let _ = crate::ids::TradeOfferId::export_all();
        let _ = crate::ids::TradeHistoryId::export_all();
        let _ = crate::ids::ItemId::export_all();

        // Enums
        let _ = crate::enums::PoiStatus::export_all();
        let _ = crate::enums::PoiType::export_all();
        let _ = crate::enums::Rarity::export_all();
        let _ = crate::enums::ItemQuality::export_all();
        let _ = crate::enums::ItemCategory::export_all();
        let _ = crate::enums::RewardTier::export_all();
        let _ = crate::enums::SubscriptionTier::export_all();
        let _ = crate::enums::TradeStatus::export_all();

        // Structs
        let _ = crate::structs::Coordinate::export_all();
        let _ = crate::structs::LocationFix::export_all();
        let _ = crate::structs::Territory::export_all();
        let _ = crate::structs::PointOfInterest::export_all();
        let _ = crate::structs::ItemDefinition::export_all();
        let _ = crate::structs::InventoryStack::export_all();
        let _ = crate::structs::ObtainedItem::export_all();
        let _ = crate::structs::TradeItem::export_all();
        let _ = crate::structs::TradeOffer::export_all();
        let _ = crate::structs::TradeExchange::export_all();
        let _ = crate::structs::TradeHistory::export_all();
    }
}
