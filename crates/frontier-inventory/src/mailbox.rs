//! Claiming mailbox attachments into an inventory.
//!
//! A claim applies as much of each attachment as fits and returns the rest
//! to the mailbox. It never fails as a whole because of capacity.

use serde::{Deserialize, Serialize};

use frontier_types::{ItemId, ItemQuality};

use crate::catalog::ItemCatalog;
use crate::error::InventoryError;
use crate::inventory::Inventory;

/// One attachment waiting in a user's mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailItem {
    /// Catalog key.
    pub item_id: ItemId,
    /// Units attached.
    pub quantity: u32,
    /// Optional condition.
    pub quality: Option<ItemQuality>,
}

impl MailItem {
    /// Create an unqualified attachment.
    pub fn new(item_id: impl Into<ItemId>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            quality: None,
        }
    }

    fn part(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

/// Outcome of a mailbox claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimResult {
    /// Attachments (or parts of them) moved into the inventory.
    pub claimed_items: Vec<MailItem>,
    /// Attachments (or parts of them) left in the mailbox.
    pub remaining_items: Vec<MailItem>,
    /// Total units claimed.
    pub claimed_count: u32,
    /// Total units left behind.
    pub remaining_count: u32,
    /// Slots the claim newly occupied.
    pub space_used: u32,
}

impl ClaimResult {
    /// Whether everything was claimed.
    pub fn is_complete(&self) -> bool {
        self.remaining_items.is_empty()
    }
}

/// Move `items` into `inventory`, keeping whatever does not fit.
///
/// Unknown items and zero quantities are left in the mailbox untouched.
pub fn claim_mail(inventory: &mut Inventory, catalog: &ItemCatalog, items: &[MailItem]) -> ClaimResult {
    let slots_before = inventory.item_type_count();
    let mut result = ClaimResult::default();

    for item in items {
        let outcome = inventory.add_item(catalog, &item.item_id, item.quantity, item.quality);
        let (claimed, remaining) = match outcome {
            Ok(_) => (item.quantity, 0),
            Err(InventoryError::CapacityExceeded {
                added, remaining, ..
            }) => (added, remaining),
            Err(err) => {
                tracing::debug!(item = %item.item_id, error = %err, "mail attachment skipped");
                result.remaining_items.push(item.clone());
                result.remaining_count = result.remaining_count.saturating_add(item.quantity);
                continue;
            }
        };
        if claimed > 0 {
            result.claimed_items.push(item.part(claimed));
            result.claimed_count = result.claimed_count.saturating_add(claimed);
        }
        if remaining > 0 {
            result.remaining_items.push(item.part(remaining));
            result.remaining_count = result.remaining_count.saturating_add(remaining);
        }
    }

    result.space_used = inventory.item_type_count().saturating_sub(slots_before);
    tracing::info!(
        user = %inventory.owner_id(),
        claimed = result.claimed_count,
        remaining = result.remaining_count,
        space_used = result.space_used,
        "mail claimed"
    );
    result
}
