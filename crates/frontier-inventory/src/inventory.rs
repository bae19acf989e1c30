//! Per-user item stacks with slot capacity.
//!
//! Stacks are keyed by `(item_id, quality)`. A stackable item fills
//! existing stacks up to its `max_stack` and spills into new stacks with
//! the same key; a non-stackable item takes one slot per unit. The number
//! of stacks never exceeds the user's capacity.
//!
//! Adds are partial-success: whatever fits is applied and the rest is
//! reported in [`InventoryError::CapacityExceeded`]. Removals are
//! all-or-nothing. A stack that reaches zero is deleted.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use frontier_types::{InventoryStack, ItemId, ItemQuality, TradeItem, UserId};

use crate::catalog::{self, ItemCatalog};
use crate::error::InventoryError;

/// How far short an inventory falls of a required item line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemShortfall {
    /// The missing item.
    pub item_id: ItemId,
    /// Stack quality key.
    pub quality: Option<ItemQuality>,
    /// Units required in total.
    pub required: u32,
    /// Units held.
    pub available: u32,
}

impl ItemShortfall {
    /// Units missing.
    pub const fn missing(&self) -> u32 {
        self.required.saturating_sub(self.available)
    }
}

/// One user's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    owner_id: UserId,
    capacity: u32,
    stacks: Vec<InventoryStack>,
}

impl Inventory {
    /// Create an empty inventory with `capacity` slots.
    pub const fn new(owner_id: UserId, capacity: u32) -> Self {
        Self {
            owner_id,
            capacity,
            stacks: Vec::new(),
        }
    }

    /// The owning user.
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Maximum number of stacks.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Change the slot capacity. Existing stacks are kept even if they
    /// now exceed the limit; only new stacks are refused.
    pub const fn set_capacity(&mut self, capacity: u32) {
        self.capacity = capacity;
    }

    /// All stacks in insertion order.
    pub fn stacks(&self) -> &[InventoryStack] {
        &self.stacks
    }

    /// Number of stacks (occupied slots).
    pub fn item_type_count(&self) -> u32 {
        u32::try_from(self.stacks.len()).unwrap_or(u32::MAX)
    }

    /// Slots still free.
    pub fn free_slots(&self) -> u32 {
        self.capacity.saturating_sub(self.item_type_count())
    }

    /// Total units held under one `(item, quality)` key.
    pub fn quantity_of(&self, item_id: &ItemId, quality: Option<ItemQuality>) -> u32 {
        self.stacks
            .iter()
            .filter(|s| s.item_id == *item_id && s.quality == quality)
            .fold(0_u32, |acc, s| acc.saturating_add(s.quantity))
    }

    /// Add `quantity` units, filling existing stacks first.
    ///
    /// Returns the last stack that received units.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::ZeroQuantity`] for a zero quantity.
    /// - [`InventoryError::UnknownItem`] if the item is not cataloged.
    /// - [`InventoryError::CapacityExceeded`] if a new stack was needed and
    ///   no slot was free. Units applied before that point are kept.
    pub fn add_item(
        &mut self,
        catalog: &ItemCatalog,
        item_id: &ItemId,
        quantity: u32,
        quality: Option<ItemQuality>,
    ) -> Result<InventoryStack, InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::ZeroQuantity);
        }
        let definition = catalog.require(item_id)?;
        let limit = catalog::stack_limit(definition);

        let mut remaining = quantity;
        let mut last_touched: Option<usize> = None;

        if definition.stackable {
            for (idx, stack) in self.stacks.iter_mut().enumerate() {
                if remaining == 0 {
                    break;
                }
                if stack.item_id != *item_id || stack.quality != quality {
                    continue;
                }
                let moved = limit.saturating_sub(stack.quantity).min(remaining);
                if moved > 0 {
                    stack.quantity = stack.quantity.saturating_add(moved);
                    remaining = remaining.saturating_sub(moved);
                    last_touched = Some(idx);
                    tracing::debug!(item = %item_id, moved, "merged into existing stack");
                }
            }
        }

        while remaining > 0 {
            if self.item_type_count() >= self.capacity {
                let added = quantity.saturating_sub(remaining);
                tracing::warn!(
                    user = %self.owner_id,
                    item = %item_id,
                    added,
                    remaining,
                    capacity = self.capacity,
                    "inventory full"
                );
                return Err(InventoryError::CapacityExceeded {
                    item_id: item_id.clone(),
                    added,
                    remaining,
                    capacity: self.capacity,
                });
            }
            let moved = limit.min(remaining);
            self.stacks.push(InventoryStack {
                item_id: item_id.clone(),
                quantity: moved,
                quality,
            });
            remaining = remaining.saturating_sub(moved);
            last_touched = Some(self.stacks.len().saturating_sub(1));
        }

        last_touched
            .and_then(|idx| self.stacks.get(idx))
            .cloned()
            .ok_or(InventoryError::Internal("add_item touched no stack"))
    }

    /// Remove `quantity` units, draining the most recently filled stacks
    /// first. Stacks that reach zero are deleted.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::ZeroQuantity`] for a zero quantity.
    /// - [`InventoryError::InsufficientQuantity`] if fewer units are held;
    ///   the inventory is left unchanged.
    pub fn remove_item(
        &mut self,
        item_id: &ItemId,
        quantity: u32,
        quality: Option<ItemQuality>,
    ) -> Result<(), InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::ZeroQuantity);
        }
        let available = self.quantity_of(item_id, quality);
        if available < quantity {
            return Err(InventoryError::InsufficientQuantity {
                item_id: item_id.clone(),
                quality,
                requested: quantity,
                available,
            });
        }

        let mut remaining = quantity;
        for stack in self.stacks.iter_mut().rev() {
            if remaining == 0 {
                break;
            }
            if stack.item_id != *item_id || stack.quality != quality {
                continue;
            }
            let taken = stack.quantity.min(remaining);
            stack.quantity = stack.quantity.saturating_sub(taken);
            remaining = remaining.saturating_sub(taken);
        }
        self.stacks.retain(|s| s.quantity > 0);

        tracing::debug!(user = %self.owner_id, item = %item_id, quantity, "items removed");
        Ok(())
    }

    /// Sum of `weight x quantity` over all stacks. Recomputed on every call.
    ///
    /// Items missing from the catalog weigh nothing.
    pub fn total_weight(&self, catalog: &ItemCatalog) -> Decimal {
        self.sum_over_stacks(catalog, |def| def.weight)
    }

    /// Sum of `volume x quantity` over all stacks.
    pub fn total_volume(&self, catalog: &ItemCatalog) -> Decimal {
        self.sum_over_stacks(catalog, |def| def.volume)
    }

    fn sum_over_stacks(
        &self,
        catalog: &ItemCatalog,
        per_unit: impl Fn(&frontier_types::ItemDefinition) -> Decimal,
    ) -> Decimal {
        self.stacks.iter().fold(Decimal::ZERO, |acc, stack| {
            let Some(def) = catalog.get(&stack.item_id) else {
                return acc;
            };
            per_unit(def)
                .checked_mul(Decimal::from(stack.quantity))
                .and_then(|line| acc.checked_add(line))
                .unwrap_or(Decimal::MAX)
        })
    }

    /// Lines of `required` this inventory cannot cover.
    ///
    /// Lines with the same `(item, quality)` key are summed first, so an
    /// offer listing the same item twice needs both quantities.
    pub fn shortfall(&self, required: &[TradeItem]) -> Vec<ItemShortfall> {
        aggregate(required)
            .into_iter()
            .filter_map(|((item_id, quality), needed)| {
                let available = self.quantity_of(&item_id, quality);
                (available < needed).then_some(ItemShortfall {
                    item_id,
                    quality,
                    required: needed,
                    available,
                })
            })
            .collect()
    }

    /// Whether every line of `required` is covered.
    pub fn has_items(&self, required: &[TradeItem]) -> bool {
        self.shortfall(required).is_empty()
    }
}

/// Sum trade lines by stack key.
pub fn aggregate(items: &[TradeItem]) -> BTreeMap<(ItemId, Option<ItemQuality>), u32> {
    let mut totals = BTreeMap::new();
    for line in items {
        let entry = totals
            .entry((line.item_id.clone(), line.quality))
            .or_insert(0_u32);
        *entry = entry.saturating_add(line.quantity);
    }
    totals
}
