//! Error types for the `frontier-trade` crate.

use chrono::{DateTime, Utc};

use frontier_inventory::{InventoryError, ItemShortfall};
use frontier_types::{ItemId, TradeHistoryId, TradeOfferId, TradeStatus, UserId};

/// Errors that can occur while creating, accepting, or rating trades.
#[derive(Debug, thiserror::Error)]
pub enum TradeError {
    /// No offer with this id exists.
    #[error("trade offer {0} not found")]
    OfferNotFound(TradeOfferId),

    /// No history record with this id exists.
    #[error("trade history {0} not found")]
    HistoryNotFound(TradeHistoryId),

    /// The owner tried to accept their own offer.
    #[error("cannot accept your own offer")]
    CannotAcceptOwnOffer,

    /// The offer is in a terminal state that does not allow the operation.
    #[error("offer {offer} is {status:?}")]
    InvalidOfferState {
        /// The offer.
        offer: TradeOfferId,
        /// Its current status.
        status: TradeStatus,
    },

    /// The offer passed its expiry time.
    #[error("offer {offer} expired at {expired_at}")]
    OfferExpired {
        /// The offer.
        offer: TradeOfferId,
        /// When it expired.
        expired_at: DateTime<Utc>,
    },

    /// The accepter cannot cover the requested items.
    #[error("insufficient items: {} line(s) short", missing.len())]
    InsufficientItems {
        /// Per-item shortfall.
        missing: Vec<ItemShortfall>,
    },

    /// The owner no longer holds the offered items.
    #[error("offer owner no longer holds the offered items: {} line(s) short", missing.len())]
    OwnerInsufficientItems {
        /// Per-item shortfall.
        missing: Vec<ItemShortfall>,
    },

    /// The user is not a party to the offer or trade.
    #[error("user {0} is not a participant")]
    NotParticipant(UserId),

    /// The user already rated this trade.
    #[error("user {user} already rated trade {history}")]
    AlreadyRated {
        /// The trade record.
        history: TradeHistoryId,
        /// The rater.
        user: UserId,
    },

    /// Ratings run from 1 to 5.
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    /// An offer side lists no items.
    #[error("offer must list at least one offered and one requested item")]
    EmptyOffer,

    /// A trade line has a zero quantity.
    #[error("quantity for {0} must be positive")]
    InvalidQuantity(ItemId),

    /// The requested validity is outside the allowed window.
    #[error("offer validity {hours}h outside 1..={max}h")]
    InvalidExpiry {
        /// Requested validity.
        hours: u32,
        /// Configured maximum.
        max: u32,
    },

    /// An inventory operation failed during the swap.
    #[error("inventory error during trade: {0}")]
    Inventory(#[from] InventoryError),
}

impl TradeError {
    /// Stable `snake_case` code reported to clients.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::OfferNotFound(_) => "offer_not_found",
            Self::HistoryNotFound(_) => "history_not_found",
            Self::CannotAcceptOwnOffer => "cannot_accept_own_offer",
            Self::InvalidOfferState { .. } => "invalid_offer_state",
            Self::OfferExpired { .. } => "offer_expired",
            Self::InsufficientItems { .. } => "insufficient_items",
            Self::OwnerInsufficientItems { .. } => "owner_insufficient_items",
            Self::NotParticipant(_) => "not_participant",
            Self::AlreadyRated { .. } => "already_rated",
            Self::InvalidRating(_) => "invalid_rating",
            Self::EmptyOffer => "empty_offer",
            Self::InvalidQuantity(_) => "invalid_quantity",
            Self::InvalidExpiry { .. } => "invalid_expiry",
            Self::Inventory(InventoryError::CapacityExceeded { .. }) => "inventory_full",
            Self::Inventory(_) => "inventory_error",
        }
    }
}
