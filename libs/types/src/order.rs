//! Order lifecycle types

use crate::ids::{OrderId, UserId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy side
    Bid,
    /// Sell side
    Ask,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Construct from the wire's `Bid: bool` flag
    pub fn from_is_bid(is_bid: bool) -> Self {
        if is_bid {
            Side::Bid
        } else {
            Side::Ask
        }
    }

    pub fn is_bid(&self) -> bool {
        matches!(self, Side::Bid)
    }

    /// Name of this side's resting queue, as used in error messages
    pub fn queue_name(&self) -> &'static str {
        match self {
            Side::Bid => "bids",
            Side::Ask => "asks",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "BID"),
            Side::Ask => write!(f, "ASK"),
        }
    }
}

/// Order type on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Rests at a chosen price until filled or canceled
    Limit,
    /// Consumes opposing liquidity immediately; never rests
    Market,
}

impl OrderType {
    /// Parse the wire strings "LIMIT" / "MARKET"
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LIMIT" => Some(OrderType::Limit),
            "MARKET" => Some(OrderType::Market),
            _ => None,
        }
    }
}

/// A single participant intent.
///
/// `size` is the residual quantity and is decremented as the order fills;
/// `size == 0` means filled, after which the order is unreachable from the
/// book. `limit_price` is the stable key of the level currently holding the
/// order: `Some` while resting, `None` for market orders and once removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub side: Side,
    pub size: Quantity,
    /// Arrival stamp in unix nanos; the time-priority tiebreaker
    pub timestamp: i64,
    pub limit_price: Option<Price>,
}

impl Order {
    pub fn new(id: OrderId, user_id: UserId, side: Side, size: Quantity, timestamp: i64) -> Self {
        Self {
            id,
            user_id,
            side,
            size,
            timestamp,
            limit_price: None,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.size.is_zero()
    }

    /// Decrement the residual by a fill.
    ///
    /// # Panics
    /// Panics if the fill exceeds the residual; that is an internal
    /// invariant violation.
    pub fn fill(&mut self, quantity: Quantity) {
        assert!(
            quantity <= self.size,
            "fill {} exceeds residual {} on order {}",
            quantity,
            self.size,
            self.id
        );
        self.size = self.size - quantity;
    }
}
