//! Player-to-player trading for Frontier.
//!
//! - [`offer`] -- Offer lifecycle, acceptance checks, and the all-or-nothing swap
//! - [`market`] -- [`TradeMarket`]: offer book with per-offer locks
//! - [`history`] -- Ratings on completed trades
//! - [`rpc`] -- Backend rows and the accept response body

pub mod error;
pub mod history;
pub mod market;
pub mod offer;
pub mod rpc;

pub use error::TradeError;
pub use market::{OfferRequest, TradeMarket};
pub use offer::{TradeConfig, can_accept, effective_status, is_expired};
pub use rpc::{AcceptTradeResponse, RowError, TradeHistoryRow, TradeItemRow, TradeOfferRow};
