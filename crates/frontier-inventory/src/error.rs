//! Error types for the `frontier-inventory` crate.
//!
//! Capacity failures carry how much was applied before the limit was hit:
//! adds are partial-success, removals are all-or-nothing.

use frontier_types::{ItemId, ItemQuality, UserId};

/// Errors that can occur during inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// No free slot remained for a new stack. `added` units were applied
    /// and stay in the inventory; `remaining` units did not fit.
    #[error("inventory full ({capacity} slots): added {added} of {item_id}, {remaining} did not fit")]
    CapacityExceeded {
        /// The item being added.
        item_id: ItemId,
        /// Units that were applied before the limit.
        added: u32,
        /// Units that did not fit.
        remaining: u32,
        /// The slot capacity that was hit.
        capacity: u32,
    },

    /// Attempted to remove more than the inventory holds.
    #[error("insufficient {item_id} ({quality:?}): wanted {requested}, have {available}")]
    InsufficientQuantity {
        /// The item being removed.
        item_id: ItemId,
        /// Stack quality key.
        quality: Option<ItemQuality>,
        /// Units requested.
        requested: u32,
        /// Units held.
        available: u32,
    },

    /// The item id is not in the catalog.
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    /// Add or remove was called with a zero quantity.
    #[error("quantity must be positive")]
    ZeroQuantity,

    /// No inventory is open for the user.
    #[error("no inventory for user {0}")]
    InventoryNotFound(UserId),

    /// The same user was passed twice to a two-party lock.
    #[error("cannot lock inventory of {0} twice")]
    SameUser(UserId),

    /// An internal invariant was violated. Should not occur.
    #[error("internal inventory error: {0}")]
    Internal(&'static str),
}
