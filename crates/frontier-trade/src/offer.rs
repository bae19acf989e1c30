//! Trade offer state machine.
//!
//! ```text
//! active -> completed | cancelled | expired
//! ```
//!
//! Every terminal state is final. An active offer whose `expires_at` has
//! passed counts as expired on read even before it is marked, and
//! acceptance always re-checks expiry against the caller's clock.
//!
//! The swap itself is computed on copies of both inventories and only
//! written back when every removal and addition succeeded.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use frontier_inventory::{Inventory, ItemCatalog};
use frontier_types::{
    TradeExchange, TradeHistory, TradeHistoryId, TradeItem, TradeOffer, TradeOfferId,
    TradeStatus, UserId,
};

use crate::error::TradeError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Offer validity limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeConfig {
    /// Validity used when the owner does not choose one.
    #[serde(default = "default_expiry_hours")]
    pub default_expiry_hours: u32,
    /// Longest validity an owner may choose.
    #[serde(default = "max_expiry_hours")]
    pub max_expiry_hours: u32,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            default_expiry_hours: default_expiry_hours(),
            max_expiry_hours: max_expiry_hours(),
        }
    }
}

const fn default_expiry_hours() -> u32 {
    24
}

const fn max_expiry_hours() -> u32 {
    168
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Check one side of an offer: at least one line, every quantity positive.
pub fn validate_lines(items: &[TradeItem]) -> Result<(), TradeError> {
    if items.is_empty() {
        return Err(TradeError::EmptyOffer);
    }
    if let Some(line) = items.iter().find(|line| line.quantity == 0) {
        return Err(TradeError::InvalidQuantity(line.item_id.clone()));
    }
    Ok(())
}

/// Build a new active offer.
///
/// `validity_hours` of `None` uses the configured default. Whether the
/// owner holds the offered items is checked by the caller, which has the
/// inventory.
pub fn new_offer(
    owner_id: UserId,
    offering_items: Vec<TradeItem>,
    requesting_items: Vec<TradeItem>,
    validity_hours: Option<u32>,
    message: Option<String>,
    now: DateTime<Utc>,
    config: &TradeConfig,
) -> Result<TradeOffer, TradeError> {
    validate_lines(&offering_items)?;
    validate_lines(&requesting_items)?;

    let hours = validity_hours.unwrap_or(config.default_expiry_hours);
    if hours == 0 || hours > config.max_expiry_hours {
        return Err(TradeError::InvalidExpiry {
            hours,
            max: config.max_expiry_hours,
        });
    }
    let expires_at = now
        .checked_add_signed(Duration::hours(i64::from(hours)))
        .ok_or(TradeError::InvalidExpiry {
            hours,
            max: config.max_expiry_hours,
        })?;

    let message = message
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty());

    Ok(TradeOffer {
        id: TradeOfferId::new(),
        owner_id,
        offering_items,
        requesting_items,
        status: TradeStatus::Active,
        message,
        created_at: now,
        expires_at,
        completed_by_user_id: None,
        completed_at: None,
    })
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Active but past its expiry time.
pub fn is_expired(offer: &TradeOffer, now: DateTime<Utc>) -> bool {
    offer.status == TradeStatus::Active && now > offer.expires_at
}

/// The status a reader should see at `now`.
pub fn effective_status(offer: &TradeOffer, now: DateTime<Utc>) -> TradeStatus {
    if is_expired(offer, now) {
        TradeStatus::Expired
    } else {
        offer.status
    }
}

/// Persist lazy expiry. Returns `true` if the offer was just marked.
pub fn mark_expired_if_due(offer: &mut TradeOffer, now: DateTime<Utc>) -> bool {
    if is_expired(offer, now) {
        offer.status = TradeStatus::Expired;
        tracing::info!(offer = %offer.id, "offer expired");
        true
    } else {
        false
    }
}

/// Whether `accepter` may accept the offer at `now`, ignoring inventories.
///
/// Checks run in this order: self-acceptance, terminal status, expiry.
pub fn check_open(offer: &TradeOffer, accepter: UserId, now: DateTime<Utc>) -> Result<(), TradeError> {
    if accepter == offer.owner_id {
        return Err(TradeError::CannotAcceptOwnOffer);
    }
    match offer.status {
        TradeStatus::Active => {}
        TradeStatus::Expired => {
            return Err(TradeError::OfferExpired {
                offer: offer.id,
                expired_at: offer.expires_at,
            });
        }
        status @ (TradeStatus::Completed | TradeStatus::Cancelled) => {
            return Err(TradeError::InvalidOfferState {
                offer: offer.id,
                status,
            });
        }
    }
    if now > offer.expires_at {
        return Err(TradeError::OfferExpired {
            offer: offer.id,
            expired_at: offer.expires_at,
        });
    }
    Ok(())
}

/// Full acceptance check: [`check_open`], then whether the accepter's
/// inventory covers the requested items.
pub fn can_accept(
    offer: &TradeOffer,
    accepter: UserId,
    accepter_inventory: &Inventory,
    now: DateTime<Utc>,
) -> Result<(), TradeError> {
    check_open(offer, accepter, now)?;
    let missing = accepter_inventory.shortfall(&offer.requesting_items);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(TradeError::InsufficientItems { missing })
    }
}

/// Withdraw an active offer. Only the owner may cancel.
pub fn cancel(offer: &mut TradeOffer, user: UserId, now: DateTime<Utc>) -> Result<(), TradeError> {
    if user != offer.owner_id {
        return Err(TradeError::NotParticipant(user));
    }
    if mark_expired_if_due(offer, now) {
        return Err(TradeError::OfferExpired {
            offer: offer.id,
            expired_at: offer.expires_at,
        });
    }
    if offer.status != TradeStatus::Active {
        return Err(TradeError::InvalidOfferState {
            offer: offer.id,
            status: offer.status,
        });
    }
    offer.status = TradeStatus::Cancelled;
    tracing::info!(offer = %offer.id, user = %user, "offer cancelled");
    Ok(())
}

// ---------------------------------------------------------------------------
// Swap
// ---------------------------------------------------------------------------

/// Move `offering_items` from owner to accepter and `requesting_items` back.
///
/// Both inventories are left untouched unless the whole swap succeeds.
pub fn execute_swap(
    offer: &TradeOffer,
    owner: &mut Inventory,
    accepter: &mut Inventory,
    catalog: &ItemCatalog,
) -> Result<(), TradeError> {
    let owner_missing = owner.shortfall(&offer.offering_items);
    if !owner_missing.is_empty() {
        return Err(TradeError::OwnerInsufficientItems {
            missing: owner_missing,
        });
    }
    let accepter_missing = accepter.shortfall(&offer.requesting_items);
    if !accepter_missing.is_empty() {
        return Err(TradeError::InsufficientItems {
            missing: accepter_missing,
        });
    }

    let mut next_owner = owner.clone();
    let mut next_accepter = accepter.clone();

    for line in &offer.offering_items {
        next_owner.remove_item(&line.item_id, line.quantity, line.quality)?;
    }
    for line in &offer.requesting_items {
        next_accepter.remove_item(&line.item_id, line.quantity, line.quality)?;
    }
    for line in &offer.offering_items {
        next_accepter.add_item(catalog, &line.item_id, line.quantity, line.quality)?;
    }
    for line in &offer.requesting_items {
        next_owner.add_item(catalog, &line.item_id, line.quantity, line.quality)?;
    }

    *owner = next_owner;
    *accepter = next_accepter;
    Ok(())
}

/// Mark the offer completed and build its history record.
pub fn complete(offer: &mut TradeOffer, accepter: UserId, now: DateTime<Utc>) -> TradeHistory {
    offer.status = TradeStatus::Completed;
    offer.completed_by_user_id = Some(accepter);
    offer.completed_at = Some(now);

    TradeHistory {
        id: TradeHistoryId::new(),
        offer_id: offer.id,
        seller_id: offer.owner_id,
        buyer_id: accepter,
        items_exchanged: TradeExchange {
            seller_gave: offer.offering_items.clone(),
            buyer_gave: offer.requesting_items.clone(),
        },
        completed_at: now,
        seller_rating: None,
        buyer_rating: None,
        seller_comment: None,
        buyer_comment: None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use frontier_inventory::InventoryError;
    use frontier_types::ItemId;

    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn stocked(user: UserId, items: &[(&str, u32)], capacity: u32) -> Inventory {
        let catalog = ItemCatalog::starter();
        let mut inv = Inventory::new(user, capacity);
        for (item, qty) in items {
            inv.add_item(&catalog, &ItemId::from(*item), *qty, None).unwrap();
        }
        inv
    }

    fn wood_for_water(owner: UserId) -> TradeOffer {
        new_offer(
            owner,
            vec![TradeItem::new("wood", 10)],
            vec![TradeItem::new("water_bottle", 2)],
            Some(24),
            Some(String::from("  fair deal ")),
            t0(),
            &TradeConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn new_offer_is_active_with_expiry() {
        let offer = wood_for_water(UserId::new());
        assert_eq!(offer.status, TradeStatus::Active);
        assert_eq!(offer.expires_at, t0() + Duration::hours(24));
        assert_eq!(offer.message.as_deref(), Some("fair deal"));
    }

    #[test]
    fn new_offer_validation() {
        let config = TradeConfig::default();
        let owner = UserId::new();
        let wood = || vec![TradeItem::new("wood", 1)];
        assert!(matches!(
            new_offer(owner, Vec::new(), wood(), None, None, t0(), &config),
            Err(TradeError::EmptyOffer)
        ));
        assert!(matches!(
            new_offer(owner, wood(), vec![TradeItem::new("rope", 0)], None, None, t0(), &config),
            Err(TradeError::InvalidQuantity(_))
        ));
        assert!(matches!(
            new_offer(owner, wood(), wood(), Some(0), None, t0(), &config),
            Err(TradeError::InvalidExpiry { hours: 0, .. })
        ));
        assert!(matches!(
            new_offer(owner, wood(), wood(), Some(169), None, t0(), &config),
            Err(TradeError::InvalidExpiry { hours: 169, max: 168 })
        ));
        let offer = new_offer(owner, wood(), wood(), None, None, t0(), &config).unwrap();
        assert_eq!(offer.expires_at, t0() + Duration::hours(24));
    }

    #[test]
    fn lazy_expiry() {
        let offer = wood_for_water(UserId::new());
        let at_expiry = offer.expires_at;
        assert_eq!(effective_status(&offer, at_expiry), TradeStatus::Active);
        let later = at_expiry + Duration::seconds(1);
        assert!(is_expired(&offer, later));
        assert_eq!(effective_status(&offer, later), TradeStatus::Expired);
    }

    #[test]
    fn own_offer_cannot_be_accepted() {
        let owner = UserId::new();
        let offer = wood_for_water(owner);
        let inv = stocked(owner, &[("water_bottle", 5)], 10);
        assert!(matches!(
            can_accept(&offer, owner, &inv, t0()),
            Err(TradeError::CannotAcceptOwnOffer)
        ));
    }

    #[test]
    fn terminal_offers_are_rejected() {
        let buyer = UserId::new();
        let inv = stocked(buyer, &[("water_bottle", 5)], 10);
        let mut offer = wood_for_water(UserId::new());

        offer.status = TradeStatus::Completed;
        assert!(matches!(
            can_accept(&offer, buyer, &inv, t0()),
            Err(TradeError::InvalidOfferState { status: TradeStatus::Completed, .. })
        ));
        offer.status = TradeStatus::Cancelled;
        assert!(matches!(
            can_accept(&offer, buyer, &inv, t0()),
            Err(TradeError::InvalidOfferState { status: TradeStatus::Cancelled, .. })
        ));
        offer.status = TradeStatus::Expired;
        assert!(matches!(
            can_accept(&offer, buyer, &inv, t0()),
            Err(TradeError::OfferExpired { .. })
        ));
    }

    #[test]
    fn expiry_is_rechecked_on_accept() {
        let buyer = UserId::new();
        let inv = stocked(buyer, &[("water_bottle", 5)], 10);
        let offer = wood_for_water(UserId::new());
        let late = offer.expires_at + Duration::minutes(1);
        assert!(matches!(
            can_accept(&offer, buyer, &inv, late),
            Err(TradeError::OfferExpired { .. })
        ));
    }

    #[test]
    fn shortfall_is_enumerated() {
        let buyer = UserId::new();
        let inv = stocked(buyer, &[("water_bottle", 1)], 10);
        let offer = wood_for_water(UserId::new());
        match can_accept(&offer, buyer, &inv, t0()) {
            Err(TradeError::InsufficientItems { missing }) => {
                assert_eq!(missing.len(), 1);
                assert_eq!(missing[0].item_id, ItemId::from("water_bottle"));
                assert_eq!(missing[0].missing(), 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn swap_moves_both_sides() {
        let catalog = ItemCatalog::starter();
        let owner_id = UserId::new();
        let buyer_id = UserId::new();
        let mut owner = stocked(owner_id, &[("wood", 10)], 10);
        let mut buyer = stocked(buyer_id, &[("water_bottle", 3)], 10);
        let offer = wood_for_water(owner_id);

        execute_swap(&offer, &mut owner, &mut buyer, &catalog).unwrap();

        assert_eq!(owner.quantity_of(&ItemId::from("wood"), None), 0);
        assert_eq!(owner.quantity_of(&ItemId::from("water_bottle"), None), 2);
        assert_eq!(buyer.quantity_of(&ItemId::from("wood"), None), 10);
        assert_eq!(buyer.quantity_of(&ItemId::from("water_bottle"), None), 1);
    }

    #[test]
    fn swap_is_all_or_nothing_when_recipient_full() {
        let catalog = ItemCatalog::starter();
        let owner_id = UserId::new();
        let buyer_id = UserId::new();
        let mut owner = stocked(owner_id, &[("wood", 10)], 10);
        // Two slots: once the rope is gone there is room for the wood but
        // not for the crowbar.
        let mut buyer = stocked(buyer_id, &[("water_bottle", 2), ("rope", 1)], 2);
        let offer = new_offer(
            owner_id,
            vec![TradeItem::new("wood", 10), TradeItem::new("crowbar", 1)],
            vec![TradeItem::new("rope", 1)],
            None,
            None,
            t0(),
            &TradeConfig::default(),
        )
        .unwrap();
        owner
            .add_item(&catalog, &ItemId::from("crowbar"), 1, None)
            .unwrap();

        let owner_before = owner.clone();
        let buyer_before = buyer.clone();
        let err = execute_swap(&offer, &mut owner, &mut buyer, &catalog).unwrap_err();
        assert!(matches!(
            err,
            TradeError::Inventory(InventoryError::CapacityExceeded { .. })
        ));
        assert_eq!(owner, owner_before);
        assert_eq!(buyer, buyer_before);
    }

    #[test]
    fn swap_requires_owner_to_still_hold_items() {
        let catalog = ItemCatalog::starter();
        let owner_id = UserId::new();
        let mut owner = stocked(owner_id, &[("wood", 4)], 10);
        let mut buyer = stocked(UserId::new(), &[("water_bottle", 2)], 10);
        let offer = wood_for_water(owner_id);
        assert!(matches!(
            execute_swap(&offer, &mut owner, &mut buyer, &catalog),
            Err(TradeError::OwnerInsufficientItems { .. })
        ));
    }

    #[test]
    fn cancel_rules() {
        let owner = UserId::new();
        let mut offer = wood_for_water(owner);
        assert!(matches!(
            cancel(&mut offer, UserId::new(), t0()),
            Err(TradeError::NotParticipant(_))
        ));
        cancel(&mut offer, owner, t0()).unwrap();
        assert_eq!(offer.status, TradeStatus::Cancelled);
        assert!(matches!(
            cancel(&mut offer, owner, t0()),
            Err(TradeError::InvalidOfferState { .. })
        ));

        let mut stale = wood_for_water(owner);
        let late = stale.expires_at + Duration::hours(1);
        assert!(matches!(
            cancel(&mut stale, owner, late),
            Err(TradeError::OfferExpired { .. })
        ));
        assert_eq!(stale.status, TradeStatus::Expired);
    }

    #[test]
    fn complete_records_history() {
        let owner = UserId::new();
        let buyer = UserId::new();
        let mut offer = wood_for_water(owner);
        let history = complete(&mut offer, buyer, t0());
        assert_eq!(offer.status, TradeStatus::Completed);
        assert_eq!(offer.completed_by_user_id, Some(buyer));
        assert_eq!(history.seller_id, owner);
        assert_eq!(history.buyer_id, buyer);
        assert_eq!(history.items_exchanged.seller_gave, offer.offering_items);
        assert_eq!(history.items_exchanged.buyer_gave, offer.requesting_items);
    }
}
