//! Static item catalog.
//!
//! Loaded once at startup and shared read-only. Stack limits and weights
//! are looked up here on every inventory mutation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use frontier_types::{ItemCategory, ItemDefinition, ItemId, Rarity};

use crate::error::InventoryError;

/// Item definitions keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCatalog {
    items: BTreeMap<ItemId, ItemDefinition>,
}

impl ItemCatalog {
    /// Create an empty catalog.
    pub const fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Build a catalog from definitions. Later duplicates replace earlier ones.
    pub fn from_definitions(definitions: impl IntoIterator<Item = ItemDefinition>) -> Self {
        let mut catalog = Self::new();
        for def in definitions {
            catalog.insert(def);
        }
        catalog
    }

    /// Add or replace a definition.
    pub fn insert(&mut self, definition: ItemDefinition) {
        self.items.insert(definition.id.clone(), definition);
    }

    /// Look up a definition.
    pub fn get(&self, id: &ItemId) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// Look up a definition, failing for unknown ids.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::UnknownItem`] if the id is not cataloged.
    pub fn require(&self, id: &ItemId) -> Result<&ItemDefinition, InventoryError> {
        self.items
            .get(id)
            .ok_or_else(|| InventoryError::UnknownItem(id.clone()))
    }

    /// Iterate definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The built-in survival catalog used by the demo and tests.
    pub fn starter() -> Self {
        Self::from_definitions([
            item("water_bottle", "Water bottle", ItemCategory::Water, 50, 60, Rarity::Common, 20),
            item("canned_food", "Canned food", ItemCategory::Food, 40, 30, Rarity::Common, 20),
            item("wood", "Wood", ItemCategory::Material, 150, 200, Rarity::Common, 50),
            item("scrap_metal", "Scrap metal", ItemCategory::Material, 200, 100, Rarity::Common, 50),
            item("bandage", "Bandage", ItemCategory::Medical, 5, 10, Rarity::Rare, 30),
            item("rope", "Rope", ItemCategory::Tool, 80, 120, Rarity::Rare, 10),
            item("battery", "Battery", ItemCategory::Misc, 10, 5, Rarity::Rare, 40),
            item("first_aid_kit", "First aid kit", ItemCategory::Medical, 60, 150, Rarity::Epic, 5),
            unique("flashlight", "Flashlight", ItemCategory::Tool, 30, 40, Rarity::Rare),
            unique("crowbar", "Crowbar", ItemCategory::Weapon, 250, 90, Rarity::Epic),
        ])
    }
}

/// Units a single stack of this item may hold. Non-stackable items hold one.
pub fn stack_limit(definition: &ItemDefinition) -> u32 {
    if definition.stackable {
        definition.max_stack.max(1)
    } else {
        1
    }
}

/// Weight and volume are given in hundredths (kg and liters).
fn item(
    id: &str,
    name: &str,
    category: ItemCategory,
    weight_centi: i64,
    volume_centi: i64,
    rarity: Rarity,
    max_stack: u32,
) -> ItemDefinition {
    ItemDefinition {
        id: ItemId::from(id),
        name: String::from(name),
        category,
        weight: Decimal::new(weight_centi, 2),
        volume: Decimal::new(volume_centi, 2),
        rarity,
        stackable: true,
        max_stack,
    }
}

fn unique(
    id: &str,
    name: &str,
    category: ItemCategory,
    weight_centi: i64,
    volume_centi: i64,
    rarity: Rarity,
) -> ItemDefinition {
    ItemDefinition {
        stackable: false,
        max_stack: 1,
        ..item(id, name, category, weight_centi, volume_centi, rarity, 1)
    }
}
