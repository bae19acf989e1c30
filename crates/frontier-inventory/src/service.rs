//! Shared inventory service.
//!
//! Holds one [`Inventory`] per user behind its own `tokio::sync::Mutex`, so
//! unrelated users never contend. Operations touching two users go through
//! [`InventoryService::lock_pair`], which always locks the lower user id
//! first; two concurrent pair-locks over the same users cannot deadlock.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use frontier_types::{
    InventoryStack, ItemId, ItemQuality, ObtainedItem, SubscriptionTier, UserId,
};

use crate::catalog::ItemCatalog;
use crate::error::InventoryError;
use crate::inventory::Inventory;
use crate::mailbox::{self, ClaimResult, MailItem};

/// Slot capacity per subscription tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Capacity for free accounts.
    #[serde(default = "default_free")]
    pub free_capacity: u32,
    /// Capacity for Plus subscribers.
    #[serde(default = "default_plus")]
    pub plus_capacity: u32,
    /// Capacity for Pro subscribers.
    #[serde(default = "default_pro")]
    pub pro_capacity: u32,
}

impl InventoryConfig {
    /// Slot capacity for a tier.
    pub const fn capacity_for(&self, tier: SubscriptionTier) -> u32 {
        match tier {
            SubscriptionTier::Free => self.free_capacity,
            SubscriptionTier::Plus => self.plus_capacity,
            SubscriptionTier::Pro => self.pro_capacity,
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            free_capacity: default_free(),
            plus_capacity: default_plus(),
            pro_capacity: default_pro(),
        }
    }
}

const fn default_free() -> u32 {
    SubscriptionTier::Free.default_capacity()
}

const fn default_plus() -> u32 {
    SubscriptionTier::Plus.default_capacity()
}

const fn default_pro() -> u32 {
    SubscriptionTier::Pro.default_capacity()
}

/// Per-user inventories behind per-user locks.
#[derive(Debug)]
pub struct InventoryService {
    catalog: Arc<ItemCatalog>,
    config: InventoryConfig,
    inventories: RwLock<BTreeMap<UserId, Arc<Mutex<Inventory>>>>,
}

impl InventoryService {
    /// Create a service over a shared catalog.
    pub fn new(catalog: Arc<ItemCatalog>, config: InventoryConfig) -> Self {
        Self {
            catalog,
            config,
            inventories: RwLock::new(BTreeMap::new()),
        }
    }

    /// The item catalog.
    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Open an empty inventory sized for `tier`. An already open inventory
    /// is kept as is.
    pub async fn open_inventory(&self, user: UserId, tier: SubscriptionTier) {
        let capacity = self.config.capacity_for(tier);
        let mut inventories = self.inventories.write().await;
        inventories.entry(user).or_insert_with(|| {
            tracing::info!(user = %user, capacity, "inventory opened");
            Arc::new(Mutex::new(Inventory::new(user, capacity)))
        });
    }

    /// The lock handle for one user's inventory.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InventoryNotFound`] if none is open.
    pub async fn handle(&self, user: UserId) -> Result<Arc<Mutex<Inventory>>, InventoryError> {
        self.inventories
            .read()
            .await
            .get(&user)
            .cloned()
            .ok_or(InventoryError::InventoryNotFound(user))
    }

    /// Resize a user's inventory for a new subscription tier. Stacks over
    /// the new limit are kept.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InventoryNotFound`] if none is open.
    pub async fn set_subscription(
        &self,
        user: UserId,
        tier: SubscriptionTier,
    ) -> Result<u32, InventoryError> {
        let capacity = self.config.capacity_for(tier);
        let handle = self.handle(user).await?;
        let mut inventory = handle.lock().await;
        inventory.set_capacity(capacity);
        tracing::info!(user = %user, ?tier, capacity, "subscription changed");
        Ok(capacity)
    }

    /// See [`Inventory::add_item`].
    ///
    /// # Errors
    ///
    /// As [`Inventory::add_item`], plus
    /// [`InventoryError::InventoryNotFound`].
    pub async fn add_item(
        &self,
        user: UserId,
        item_id: &ItemId,
        quantity: u32,
        quality: Option<ItemQuality>,
    ) -> Result<InventoryStack, InventoryError> {
        let handle = self.handle(user).await?;
        let mut inventory = handle.lock().await;
        inventory.add_item(&self.catalog, item_id, quantity, quality)
    }

    /// See [`Inventory::remove_item`].
    ///
    /// # Errors
    ///
    /// As [`Inventory::remove_item`], plus
    /// [`InventoryError::InventoryNotFound`].
    pub async fn remove_item(
        &self,
        user: UserId,
        item_id: &ItemId,
        quantity: u32,
        quality: Option<ItemQuality>,
    ) -> Result<(), InventoryError> {
        let handle = self.handle(user).await?;
        let mut inventory = handle.lock().await;
        inventory.remove_item(item_id, quantity, quality)
    }

    /// Current carried weight.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InventoryNotFound`] if none is open.
    pub async fn total_weight(&self, user: UserId) -> Result<Decimal, InventoryError> {
        let handle = self.handle(user).await?;
        let inventory = handle.lock().await;
        Ok(inventory.total_weight(&self.catalog))
    }

    /// Occupied slots.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InventoryNotFound`] if none is open.
    pub async fn item_type_count(&self, user: UserId) -> Result<u32, InventoryError> {
        let handle = self.handle(user).await?;
        let inventory = handle.lock().await;
        Ok(inventory.item_type_count())
    }

    /// A copy of the user's inventory.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InventoryNotFound`] if none is open.
    pub async fn snapshot(&self, user: UserId) -> Result<Inventory, InventoryError> {
        let handle = self.handle(user).await?;
        let inventory = handle.lock().await;
        Ok(inventory.clone())
    }

    /// Claim mailbox attachments. See [`mailbox::claim_mail`].
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InventoryNotFound`] if none is open.
    pub async fn claim_mail(
        &self,
        user: UserId,
        items: &[MailItem],
    ) -> Result<ClaimResult, InventoryError> {
        let handle = self.handle(user).await?;
        let mut inventory = handle.lock().await;
        Ok(mailbox::claim_mail(&mut inventory, &self.catalog, items))
    }

    /// Deliver rolled loot with the same partial-success rule as mail.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InventoryNotFound`] if none is open.
    pub async fn apply_loot(
        &self,
        user: UserId,
        loot: &[ObtainedItem],
    ) -> Result<ClaimResult, InventoryError> {
        let items: Vec<MailItem> = loot
            .iter()
            .map(|item| MailItem {
                item_id: item.item_id.clone(),
                quantity: item.quantity,
                quality: item.quality,
            })
            .collect();
        self.claim_mail(user, &items).await
    }

    /// Lock two users' inventories, lower user id first.
    ///
    /// Guards are returned in argument order: `(first, second)`.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::SameUser`] if both ids are equal.
    /// - [`InventoryError::InventoryNotFound`] if either is not open.
    pub async fn lock_pair(
        &self,
        first: UserId,
        second: UserId,
    ) -> Result<(OwnedMutexGuard<Inventory>, OwnedMutexGuard<Inventory>), InventoryError> {
        if first == second {
            return Err(InventoryError::SameUser(first));
        }
        let first_handle = self.handle(first).await?;
        let second_handle = self.handle(second).await?;

        if first < second {
            let a = first_handle.lock_owned().await;
            let b = second_handle.lock_owned().await;
            Ok((a, b))
        } else {
            let b = second_handle.lock_owned().await;
            let a = first_handle.lock_owned().await;
            Ok((a, b))
        }
    }
}
