//! Wire shapes exchanged with the backend.
//!
//! Rows mirror the remote tables (`snake_case` columns, string enums, JSON
//! item lists). Mapping to and from the domain types is explicit so the
//! domain model carries no wire concerns.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use frontier_types::{
    ItemId, TradeExchange, TradeHistory, TradeItem, TradeOffer, TradeStatus,
};

use crate::error::TradeError;

/// Failures mapping a backend row into the domain.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    /// The status column held an unknown value.
    #[error("unknown trade status: {0}")]
    UnknownStatus(String),

    /// A quality value was not recognized.
    #[error("unknown item quality: {0}")]
    UnknownQuality(String),

    /// A quantity was zero or negative.
    #[error("invalid quantity {quantity} for {item_id}")]
    InvalidQuantity {
        /// The item line.
        item_id: String,
        /// The stored quantity.
        quantity: i64,
    },

    /// A stored rating was outside 1..=5.
    #[error("invalid stored rating: {0}")]
    InvalidRating(i16),

    /// The exchanged-items document did not parse.
    #[error("malformed items_exchanged: {0}")]
    Exchange(#[from] serde_json::Error),
}

/// Response body of the accept-offer call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptTradeResponse {
    /// Whether the trade went through.
    pub success: bool,
    /// Error code on failure.
    pub error: Option<String>,
    /// Human-readable detail.
    pub message: Option<String>,
    /// New history record on success.
    pub history_id: Option<Uuid>,
    /// The offer that was accepted.
    pub offer_id: Option<Uuid>,
    /// Offer owner.
    pub seller_id: Option<Uuid>,
    /// Accepter.
    pub buyer_id: Option<Uuid>,
    /// Completion instant.
    pub completed_at: Option<DateTime<Utc>>,
}

impl AcceptTradeResponse {
    /// Successful response for a completed trade.
    pub fn completed(record: &TradeHistory) -> Self {
        Self {
            success: true,
            error: None,
            message: Some(String::from("trade completed")),
            history_id: Some(record.id.into_inner()),
            offer_id: Some(record.offer_id.into_inner()),
            seller_id: Some(record.seller_id.into_inner()),
            buyer_id: Some(record.buyer_id.into_inner()),
            completed_at: Some(record.completed_at),
        }
    }

    /// Failure response.
    pub fn failed(offer_id: Uuid, error: &TradeError) -> Self {
        Self {
            success: false,
            error: Some(error.code().to_owned()),
            message: Some(error.to_string()),
            history_id: None,
            offer_id: Some(offer_id),
            seller_id: None,
            buyer_id: None,
            completed_at: None,
        }
    }

    /// Build the response for an accept result.
    pub fn from_result(offer_id: Uuid, result: &Result<TradeHistory, TradeError>) -> Self {
        match result {
            Ok(record) => Self::completed(record),
            Err(err) => Self::failed(offer_id, err),
        }
    }
}

/// One item line as stored in the JSON columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeItemRow {
    /// Catalog key.
    pub item_id: String,
    /// Stored as a signed integer by the backend.
    pub quantity: i64,
    /// Quality name, if any.
    pub quality: Option<String>,
}

impl TradeItemRow {
    /// Map into a domain trade line.
    pub fn to_domain(&self) -> Result<TradeItem, RowError> {
        let quantity = u32::try_from(self.quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| RowError::InvalidQuantity {
                item_id: self.item_id.clone(),
                quantity: self.quantity,
            })?;
        let quality = match &self.quality {
            None => None,
            Some(raw) => Some(
                decode_enum(raw).ok_or_else(|| RowError::UnknownQuality(raw.clone()))?,
            ),
        };
        Ok(TradeItem {
            item_id: ItemId::new(self.item_id.clone()),
            quantity,
            quality,
        })
    }

    /// Map from a domain trade line.
    pub fn from_domain(item: &TradeItem) -> Self {
        Self {
            item_id: item.item_id.as_str().to_owned(),
            quantity: i64::from(item.quantity),
            quality: item.quality.map(encode_enum),
        }
    }
}

/// A row of the `trade_offers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOfferRow {
    /// Primary key.
    pub id: Uuid,
    /// Owner.
    pub owner_id: Uuid,
    /// Offered lines.
    pub offering_items: Vec<TradeItemRow>,
    /// Requested lines.
    pub requesting_items: Vec<TradeItemRow>,
    /// Status name.
    pub status: String,
    /// Owner's note.
    pub message: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
    /// Accepter, once completed.
    pub completed_by_user_id: Option<Uuid>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
}

impl TradeOfferRow {
    /// Map into a domain offer.
    pub fn to_domain(&self) -> Result<TradeOffer, RowError> {
        let status: TradeStatus =
            decode_enum(&self.status).ok_or_else(|| RowError::UnknownStatus(self.status.clone()))?;
        Ok(TradeOffer {
            id: self.id.into(),
            owner_id: self.owner_id.into(),
            offering_items: lines_to_domain(&self.offering_items)?,
            requesting_items: lines_to_domain(&self.requesting_items)?,
            status,
            message: self.message.clone(),
            created_at: self.created_at,
            expires_at: self.expires_at,
            completed_by_user_id: self.completed_by_user_id.map(Into::into),
            completed_at: self.completed_at,
        })
    }

    /// Map from a domain offer.
    pub fn from_domain(offer: &TradeOffer) -> Self {
        Self {
            id: offer.id.into_inner(),
            owner_id: offer.owner_id.into_inner(),
            offering_items: offer.offering_items.iter().map(TradeItemRow::from_domain).collect(),
            requesting_items: offer.requesting_items.iter().map(TradeItemRow::from_domain).collect(),
            status: encode_enum(offer.status),
            message: offer.message.clone(),
            created_at: offer.created_at,
            expires_at: offer.expires_at,
            completed_by_user_id: offer.completed_by_user_id.map(Into::into),
            completed_at: offer.completed_at,
        }
    }
}

/// A row of the `trade_history` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeHistoryRow {
    /// Primary key.
    pub id: Uuid,
    /// Completed offer.
    pub offer_id: Uuid,
    /// Offer owner.
    pub seller_id: Uuid,
    /// Accepter.
    pub buyer_id: Uuid,
    /// `{"seller_gave": [...], "buyer_gave": [...]}`.
    pub items_exchanged: serde_json::Value,
    /// Completion time.
    pub completed_at: DateTime<Utc>,
    /// Seller's rating of the buyer.
    pub seller_rating: Option<i16>,
    /// Buyer's rating of the seller.
    pub buyer_rating: Option<i16>,
    /// Seller's comment.
    pub seller_comment: Option<String>,
    /// Buyer's comment.
    pub buyer_comment: Option<String>,
}

impl TradeHistoryRow {
    /// Map into a domain history record.
    pub fn to_domain(&self) -> Result<TradeHistory, RowError> {
        let items_exchanged: TradeExchange = serde_json::from_value(self.items_exchanged.clone())?;
        Ok(TradeHistory {
            id: self.id.into(),
            offer_id: self.offer_id.into(),
            seller_id: self.seller_id.into(),
            buyer_id: self.buyer_id.into(),
            items_exchanged,
            completed_at: self.completed_at,
            seller_rating: rating_to_domain(self.seller_rating)?,
            buyer_rating: rating_to_domain(self.buyer_rating)?,
            seller_comment: self.seller_comment.clone(),
            buyer_comment: self.buyer_comment.clone(),
        })
    }

    /// Map from a domain history record.
    pub fn from_domain(record: &TradeHistory) -> Result<Self, RowError> {
        Ok(Self {
            id: record.id.into_inner(),
            offer_id: record.offer_id.into_inner(),
            seller_id: record.seller_id.into_inner(),
            buyer_id: record.buyer_id.into_inner(),
            items_exchanged: serde_json::to_value(&record.items_exchanged)?,
            completed_at: record.completed_at,
            seller_rating: record.seller_rating.map(i16::from),
            buyer_rating: record.buyer_rating.map(i16::from),
            seller_comment: record.seller_comment.clone(),
            buyer_comment: record.buyer_comment.clone(),
        })
    }
}

fn lines_to_domain(rows: &[TradeItemRow]) -> Result<Vec<TradeItem>, RowError> {
    rows.iter().map(TradeItemRow::to_domain).collect()
}

fn rating_to_domain(raw: Option<i16>) -> Result<Option<u8>, RowError> {
    raw.map(|value| {
        u8::try_from(value)
            .ok()
            .filter(|v| (crate::history::MIN_RATING..=crate::history::MAX_RATING).contains(v))
            .ok_or(RowError::InvalidRating(value))
    })
    .transpose()
}

/// Parse a `snake_case` enum name through its serde representation.
fn decode_enum<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(raw.to_owned())).ok()
}

fn encode_enum<T: Serialize>(value: T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default()
}
