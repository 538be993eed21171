//! Error taxonomy for the matching core and the exchange layer

use crate::ids::OrderId;
use crate::order::Side;
use thiserror::Error;

/// Errors raised by the order book
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookError {
    /// Best-price query on a side with no resting liquidity
    #[error("{} are empty", .0.queue_name())]
    EmptySide(Side),

    /// Market order larger than the opposing resting volume
    #[error("not enough volume [have: {available}] for market order [size: {requested}]")]
    InsufficientLiquidity { available: String, requested: String },

    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("duplicate order id: {0}")]
    DuplicateOrder(OrderId),
}

/// Errors raised by the exchange layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("market not found")]
    MarketNotFound(String),

    #[error("user not found: {0}")]
    UnknownUser(i64),

    #[error("{0}")]
    Settlement(String),

    #[error(transparent)]
    Book(#[from] BookError),
}
