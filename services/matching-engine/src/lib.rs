//! Matching engine
//!
//! Price-time priority order book for a single market:
//!
//! - **Price priority**: best price always fills first (highest bid,
//!   lowest ask)
//! - **Time priority**: within a price level, orders fill FIFO in arrival
//!   order
//!
//! Limit orders rest without crossing; crossing liquidity is routed through
//! market orders, which sweep the opposing side best-first and emit a
//! deterministic sequence of [`types::matches::Match`] records.

pub mod book;
pub mod order_book;

pub use order_book::OrderBook;
