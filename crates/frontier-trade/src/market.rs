//! The trade market service.
//!
//! Offers live behind one `tokio::sync::Mutex` each. Acceptance holds the
//! offer's lock for the whole operation, so of two concurrent accepts on
//! the same offer exactly one sees it active. Inventories are then locked
//! through [`InventoryService::lock_pair`] (lower user id first) and the
//! swap is committed only if it succeeds in full.
//!
//! Lock order is always offer, then inventories, then history. Nothing
//! holds a later lock while waiting for an earlier one.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use frontier_inventory::InventoryService;
use frontier_types::{
    TradeHistory, TradeHistoryId, TradeItem, TradeOffer, TradeOfferId, TradeStatus, UserId,
};

use crate::error::TradeError;
use crate::history;
use crate::offer::{self, TradeConfig};

/// Fields of a new offer, as submitted by its owner.
#[derive(Debug, Clone)]
pub struct OfferRequest {
    /// What the owner gives.
    pub offering_items: Vec<TradeItem>,
    /// What the owner wants back.
    pub requesting_items: Vec<TradeItem>,
    /// Validity in hours; `None` uses the configured default.
    pub validity_hours: Option<u32>,
    /// Optional note.
    pub message: Option<String>,
}

/// Offer book, acceptance, and trade history.
///
/// Offers in a terminal state and all history records are retained for the
/// life of the market; `sweep_expired` marks offers, it never evicts them.
#[derive(Debug)]
pub struct TradeMarket {
    inventories: Arc<InventoryService>,
    config: TradeConfig,
    offers: RwLock<BTreeMap<TradeOfferId, Arc<Mutex<TradeOffer>>>>,
    history: RwLock<BTreeMap<TradeHistoryId, TradeHistory>>,
}

impl TradeMarket {
    /// Create an empty market over a shared inventory service.
    pub fn new(inventories: Arc<InventoryService>, config: TradeConfig) -> Self {
        Self {
            inventories,
            config,
            offers: RwLock::new(BTreeMap::new()),
            history: RwLock::new(BTreeMap::new()),
        }
    }

    /// The inventory service trades settle against.
    pub fn inventories(&self) -> &InventoryService {
        &self.inventories
    }

    /// Post a new offer.
    ///
    /// The owner must hold the offered items now; they stay in the owner's
    /// inventory until the offer is accepted.
    pub async fn create_offer(
        &self,
        owner: UserId,
        request: OfferRequest,
        now: DateTime<Utc>,
    ) -> Result<TradeOffer, TradeError> {
        let offer = offer::new_offer(
            owner,
            request.offering_items,
            request.requesting_items,
            request.validity_hours,
            request.message,
            now,
            &self.config,
        )?;

        let inventory = self.inventories.snapshot(owner).await?;
        let missing = inventory.shortfall(&offer.offering_items);
        if !missing.is_empty() {
            tracing::warn!(user = %owner, lines = missing.len(), "offer refused: items not held");
            return Err(TradeError::InsufficientItems { missing });
        }

        self.offers
            .write()
            .await
            .insert(offer.id, Arc::new(Mutex::new(offer.clone())));
        tracing::info!(
            offer = %offer.id,
            user = %owner,
            expires_at = %offer.expires_at,
            "offer created"
        );
        Ok(offer)
    }

    async fn offer_handle(&self, offer_id: TradeOfferId) -> Result<Arc<Mutex<TradeOffer>>, TradeError> {
        self.offers
            .read()
            .await
            .get(&offer_id)
            .cloned()
            .ok_or(TradeError::OfferNotFound(offer_id))
    }

    async fn all_handles(&self) -> Vec<Arc<Mutex<TradeOffer>>> {
        self.offers.read().await.values().cloned().collect()
    }

    /// A copy of one offer as stored.
    pub async fn get_offer(&self, offer_id: TradeOfferId) -> Result<TradeOffer, TradeError> {
        let handle = self.offer_handle(offer_id).await?;
        let offer = handle.lock().await;
        Ok(offer.clone())
    }

    /// Withdraw an active offer.
    pub async fn cancel_offer(
        &self,
        offer_id: TradeOfferId,
        user: UserId,
        now: DateTime<Utc>,
    ) -> Result<TradeOffer, TradeError> {
        let handle = self.offer_handle(offer_id).await?;
        let mut offer = handle.lock().await;
        offer::cancel(&mut offer, user, now)?;
        Ok(offer.clone())
    }

    /// Offers open for acceptance at `now`, newest first.
    ///
    /// Lazily expired offers are hidden. With a `viewer`, that user's own
    /// offers are hidden too.
    pub async fn list_active(&self, now: DateTime<Utc>, viewer: Option<UserId>) -> Vec<TradeOffer> {
        let mut open = Vec::new();
        for handle in self.all_handles().await {
            let offer = handle.lock().await;
            if offer::effective_status(&offer, now) != TradeStatus::Active {
                continue;
            }
            if viewer == Some(offer.owner_id) {
                continue;
            }
            open.push(offer.clone());
        }
        sort_newest_first(&mut open);
        open
    }

    /// Every offer posted by `owner`, newest first, with lazy expiry
    /// applied to the returned status.
    pub async fn offers_by(&self, owner: UserId, now: DateTime<Utc>) -> Vec<TradeOffer> {
        let mut mine = Vec::new();
        for handle in self.all_handles().await {
            let offer = handle.lock().await;
            if offer.owner_id == owner {
                let mut copy = offer.clone();
                copy.status = offer::effective_status(&offer, now);
                mine.push(copy);
            }
        }
        sort_newest_first(&mut mine);
        mine
    }

    /// Mark every active offer past its expiry as expired.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<TradeOfferId> {
        let mut expired = Vec::new();
        for handle in self.all_handles().await {
            let mut offer = handle.lock().await;
            if offer::mark_expired_if_due(&mut offer, now) {
                expired.push(offer.id);
            }
        }
        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "expired offers swept");
        }
        expired
    }

    /// Accept an offer and swap the items.
    ///
    /// Either both inventories change and the offer completes with a new
    /// history record, or nothing changes.
    pub async fn accept_offer(
        &self,
        offer_id: TradeOfferId,
        accepter: UserId,
        now: DateTime<Utc>,
    ) -> Result<TradeHistory, TradeError> {
        let handle = self.offer_handle(offer_id).await?;
        let mut offer = handle.lock().await;

        if let Err(err) = offer::check_open(&offer, accepter, now) {
            offer::mark_expired_if_due(&mut offer, now);
            tracing::warn!(offer = %offer_id, user = %accepter, error = %err, "accept refused");
            return Err(err);
        }

        let (mut owner_inv, mut accepter_inv) =
            self.inventories.lock_pair(offer.owner_id, accepter).await?;

        offer::can_accept(&offer, accepter, &accepter_inv, now)?;
        if let Err(err) = offer::execute_swap(
            &offer,
            &mut owner_inv,
            &mut accepter_inv,
            self.inventories.catalog(),
        ) {
            tracing::warn!(offer = %offer_id, user = %accepter, error = %err, "swap aborted");
            return Err(err);
        }
        drop(owner_inv);
        drop(accepter_inv);

        let record = offer::complete(&mut offer, accepter, now);
        self.history.write().await.insert(record.id, record.clone());
        tracing::info!(
            offer = %offer_id,
            history = %record.id,
            seller = %record.seller_id,
            buyer = %record.buyer_id,
            "offer completed"
        );
        Ok(record)
    }

    /// Rate the other party of a completed trade.
    pub async fn rate_trade(
        &self,
        history_id: TradeHistoryId,
        rater: UserId,
        rating: u8,
        comment: Option<String>,
    ) -> Result<TradeHistory, TradeError> {
        let mut records = self.history.write().await;
        let record = records
            .get_mut(&history_id)
            .ok_or(TradeError::HistoryNotFound(history_id))?;
        history::rate(record, rater, rating, comment)?;
        Ok(record.clone())
    }

    /// One history record.
    pub async fn get_history(&self, history_id: TradeHistoryId) -> Result<TradeHistory, TradeError> {
        self.history
            .read()
            .await
            .get(&history_id)
            .cloned()
            .ok_or(TradeError::HistoryNotFound(history_id))
    }

    /// Trades `user` took part in, newest first.
    pub async fn history_for(&self, user: UserId) -> Vec<TradeHistory> {
        let mut records: Vec<TradeHistory> = self
            .history
            .read()
            .await
            .values()
            .filter(|h| history::is_participant(h, user))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at).then(b.id.cmp(&a.id)));
        records
    }
}

fn sort_newest_first(offers: &mut [TradeOffer]) {
    offers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}
