//! Wire envelopes for the HTTP surface
//!
//! Field names are part of the public contract (PascalCase). Numerics are
//! f64 on the wire; conversion into the internal decimal types happens in
//! the handlers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use types::order::Order;

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(rename = "UserID")]
    pub user_id: i64,
    /// "LIMIT" or "MARKET"
    #[serde(rename = "Type")]
    pub order_type: String,
    #[serde(rename = "Bid")]
    pub bid: bool,
    #[serde(rename = "Size")]
    pub size: f64,
    /// Ignored for market orders
    #[serde(rename = "Price", default)]
    pub price: f64,
    #[serde(rename = "Market")]
    pub market: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaceOrderResponse {
    #[serde(rename = "OrderID")]
    pub order_id: i64,
}

/// One resting order as shown in book and user listings
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(rename = "UserID")]
    pub user_id: i64,
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Size")]
    pub size: f64,
    #[serde(rename = "Bid")]
    pub bid: bool,
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,
}

impl OrderView {
    /// Project a live resting order; the level price comes from the order's
    /// level key.
    pub fn from_resting(order: &Order) -> Self {
        Self {
            user_id: order.user_id.as_i64(),
            id: order.id.as_i64(),
            price: order.limit_price.map(|p| p.to_f64()).unwrap_or_default(),
            size: order.size.to_f64(),
            bid: order.side.is_bid(),
            timestamp: order.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderBookData {
    #[serde(rename = "TotalBidVolume")]
    pub total_bid_volume: f64,
    #[serde(rename = "TotalAskVolume")]
    pub total_ask_volume: f64,
    #[serde(rename = "Asks")]
    pub asks: Vec<OrderView>,
    #[serde(rename = "Bids")]
    pub bids: Vec<OrderView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceResponse {
    #[serde(rename = "Price")]
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalancesResponse {
    /// user id -> settled balance
    pub balances: BTreeMap<i64, f64>,
}
