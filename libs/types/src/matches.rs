//! Match (fill) records
//!
//! A Match is the immutable record of a quantity traded at a price between
//! one resting (maker) order and one incoming (taker) order. The execution
//! price is always the maker's level price.

use crate::ids::{MatchId, OrderId, UserId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use serde::{Deserialize, Serialize};

/// Record of a single fill. Emitted in the order fills occur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub match_id: MatchId,
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub maker_user_id: UserId,
    pub taker_user_id: UserId,
    /// Side of the incoming (taker) order
    pub taker_side: Side,
    /// The resting level's price
    pub price: Price,
    pub size_filled: Quantity,
}

impl Match {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        maker_user_id: UserId,
        taker_user_id: UserId,
        taker_side: Side,
        price: Price,
        size_filled: Quantity,
    ) -> Self {
        Self {
            match_id: MatchId::new(),
            maker_order_id,
            taker_order_id,
            maker_user_id,
            taker_user_id,
            taker_side,
            price,
            size_filled,
        }
    }

    /// The bid-side order of this match
    pub fn bid_order_id(&self) -> OrderId {
        match self.taker_side {
            Side::Bid => self.taker_order_id,
            Side::Ask => self.maker_order_id,
        }
    }

    /// The ask-side order of this match
    pub fn ask_order_id(&self) -> OrderId {
        match self.taker_side {
            Side::Bid => self.maker_order_id,
            Side::Ask => self.taker_order_id,
        }
    }

    /// The buying participant
    pub fn bid_user(&self) -> UserId {
        match self.taker_side {
            Side::Bid => self.taker_user_id,
            Side::Ask => self.maker_user_id,
        }
    }

    /// The selling participant
    pub fn ask_user(&self) -> UserId {
        match self.taker_side {
            Side::Bid => self.maker_user_id,
            Side::Ask => self.taker_user_id,
        }
    }
}
