//! Post-trade ratings.
//!
//! Each party rates the other once. Everything else on a history record is
//! fixed at completion.

use frontier_types::{TradeHistory, UserId};

use crate::error::TradeError;

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;

/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// Whether `user` took part in the trade.
pub fn is_participant(history: &TradeHistory, user: UserId) -> bool {
    history.seller_id == user || history.buyer_id == user
}

/// Record `rater`'s rating of the other party.
pub fn rate(
    history: &mut TradeHistory,
    rater: UserId,
    rating: u8,
    comment: Option<String>,
) -> Result<(), TradeError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(TradeError::InvalidRating(rating));
    }
    let comment = comment.map(|c| c.trim().to_owned()).filter(|c| !c.is_empty());

    let (slot, comment_slot) = if rater == history.seller_id {
        (&mut history.seller_rating, &mut history.seller_comment)
    } else if rater == history.buyer_id {
        (&mut history.buyer_rating, &mut history.buyer_comment)
    } else {
        return Err(TradeError::NotParticipant(rater));
    };

    if slot.is_some() {
        return Err(TradeError::AlreadyRated {
            history: history.id,
            user: rater,
        });
    }
    *slot = Some(rating);
    *comment_slot = comment;
    tracing::info!(history = %history.id, user = %rater, rating, "trade rated");
    Ok(())
}
