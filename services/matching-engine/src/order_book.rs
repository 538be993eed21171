//! Order book for a single market
//!
//! Two sorted side books plus an id index mapping every live resting order
//! to its location. All mutations run to completion without suspension;
//! callers serialise access per book.

use std::collections::HashMap;
use types::errors::BookError;
use types::ids::{MarketId, OrderId};
use types::matches::Match;
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

use crate::book::{AskBook, BidBook, PriceLevel};

/// Location of a live resting order: which side, which level.
#[derive(Debug, Clone, Copy)]
struct OrderLocation {
    side: Side,
    price: Price,
}

/// Price-time priority order book.
///
/// Limit orders never cross here; market orders sweep the opposing side
/// best-first. Market orders are never indexed and never rest.
#[derive(Debug)]
pub struct OrderBook {
    market: MarketId,
    bids: BidBook,
    asks: AskBook,
    /// id -> (side, price) for every live resting order
    index: HashMap<OrderId, OrderLocation>,
}

impl OrderBook {
    pub fn new(market: MarketId) -> Self {
        Self {
            market,
            bids: BidBook::new(),
            asks: AskBook::new(),
            index: HashMap::new(),
        }
    }

    pub fn market(&self) -> &MarketId {
        &self.market
    }

    /// Rest a limit order at its price level.
    ///
    /// Does not attempt to cross; crossing liquidity goes through market
    /// orders. The level is created lazily on first use.
    pub fn place_limit_order(&mut self, price: Price, order: Order) -> Result<(), BookError> {
        if self.index.contains_key(&order.id) {
            return Err(BookError::DuplicateOrder(order.id));
        }

        let order_id = order.id;
        let location = OrderLocation {
            side: order.side,
            price,
        };
        match order.side {
            Side::Bid => self.bids.insert_order(price, order),
            Side::Ask => self.asks.insert_order(price, order),
        }
        self.index.insert(order_id, location);

        Ok(())
    }

    /// Fill a market order against the opposing side, best price first.
    ///
    /// Rejected outright, with no state mutation, when the order is larger
    /// than the opposing resting volume. Returns the matches in fill order;
    /// on success their sizes sum to the order's original size.
    pub fn place_market_order(&mut self, mut order: Order) -> Result<Vec<Match>, BookError> {
        let available = match order.side {
            Side::Bid => self.asks.total_volume(),
            Side::Ask => self.bids.total_volume(),
        };
        if order.size > available {
            return Err(BookError::InsufficientLiquidity {
                available: available.to_string(),
                requested: order.size.to_string(),
            });
        }

        let mut matches = Vec::new();
        match order.side {
            Side::Bid => {
                for price in self.asks.prices_best_first() {
                    if order.is_filled() {
                        break;
                    }
                    let level = self
                        .asks
                        .level_mut(price)
                        .expect("level listed but missing from ask book");
                    let level_matches = level.fill(&mut order);
                    for m in &level_matches {
                        if !level.contains(m.maker_order_id) {
                            self.index.remove(&m.maker_order_id);
                        }
                    }
                    let emptied = level.is_empty();
                    if emptied {
                        self.asks.clear_level(price);
                    }
                    matches.extend(level_matches);
                }
            }
            Side::Ask => {
                for price in self.bids.prices_best_first() {
                    if order.is_filled() {
                        break;
                    }
                    let level = self
                        .bids
                        .level_mut(price)
                        .expect("level listed but missing from bid book");
                    let level_matches = level.fill(&mut order);
                    for m in &level_matches {
                        if !level.contains(m.maker_order_id) {
                            self.index.remove(&m.maker_order_id);
                        }
                    }
                    let emptied = level.is_empty();
                    if emptied {
                        self.bids.clear_level(price);
                    }
                    matches.extend(level_matches);
                }
            }
        }

        Ok(matches)
    }

    /// Cancel a resting limit order by id.
    ///
    /// Removes it from its level (destroying the level if it empties) and
    /// from the id index. Returns the removed order.
    pub fn cancel_order(&mut self, order_id: OrderId) -> Result<Order, BookError> {
        let location = self
            .index
            .remove(&order_id)
            .ok_or(BookError::OrderNotFound(order_id))?;

        let removed = match location.side {
            Side::Bid => self.bids.remove(order_id, location.price),
            Side::Ask => self.asks.remove(order_id, location.price),
        };

        // The index and the levels must agree; divergence is a bug.
        Ok(removed.expect("order indexed but missing from its level"))
    }

    /// Highest resting bid price
    pub fn best_bid(&self) -> Result<Price, BookError> {
        self.bids
            .best_price()
            .ok_or(BookError::EmptySide(Side::Bid))
    }

    /// Lowest resting ask price
    pub fn best_ask(&self) -> Result<Price, BookError> {
        self.asks
            .best_price()
            .ok_or(BookError::EmptySide(Side::Ask))
    }

    /// Bid levels, best (highest price) first
    pub fn bids_sorted(&self) -> impl Iterator<Item = &PriceLevel> {
        self.bids.levels()
    }

    /// Ask levels, best (lowest price) first
    pub fn asks_sorted(&self) -> impl Iterator<Item = &PriceLevel> {
        self.asks.levels()
    }

    pub fn bid_total_volume(&self) -> Quantity {
        self.bids.total_volume()
    }

    pub fn ask_total_volume(&self) -> Quantity {
        self.asks.total_volume()
    }

    /// Look up a live resting order by id
    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        let location = self.index.get(&order_id)?;
        match location.side {
            Side::Bid => self.bids.get_order(order_id, location.price),
            Side::Ask => self.asks.get_order(order_id, location.price),
        }
    }

    /// Number of live resting orders
    pub fn order_count(&self) -> usize {
        self.index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::UserId;

    fn book() -> OrderBook {
        OrderBook::new(MarketId::new("ETH"))
    }

    fn order(id: i64, side: Side, size: u64) -> Order {
        Order::new(
            OrderId::from_i64(id),
            UserId::from_i64(id),
            side,
            Quantity::from_u64(size),
            id,
        )
    }

    #[test]
    fn test_limit_order_rests_without_crossing() {
        let mut ob = book();
        ob.place_limit_order(Price::from_u64(10_000), order(1, Side::Ask, 5))
            .unwrap();
        // A crossing bid still rests; only market orders consume liquidity.
        ob.place_limit_order(Price::from_u64(10_500), order(2, Side::Bid, 5))
            .unwrap();

        assert_eq!(ob.order_count(), 2);
        assert_eq!(ob.ask_total_volume(), Quantity::from_u64(5));
        assert_eq!(ob.bid_total_volume(), Quantity::from_u64(5));
    }

    #[test]
    fn test_duplicate_order_id_rejected() {
        let mut ob = book();
        ob.place_limit_order(Price::from_u64(10_000), order(1, Side::Ask, 5))
            .unwrap();
        let err = ob
            .place_limit_order(Price::from_u64(10_100), order(1, Side::Ask, 5))
            .unwrap_err();
        assert_eq!(err, BookError::DuplicateOrder(OrderId::from_i64(1)));
    }

    #[test]
    fn test_single_level_fill() {
        let mut ob = book();
        ob.place_limit_order(Price::from_u64(10_000), order(1, Side::Ask, 5))
            .unwrap();

        let matches = ob.place_market_order(order(2, Side::Bid, 3)).unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].price, Price::from_u64(10_000));
        assert_eq!(matches[0].size_filled, Quantity::from_u64(3));
        assert_eq!(ob.ask_total_volume(), Quantity::from_u64(2));
        assert_eq!(
            ob.get_order(OrderId::from_i64(1)).unwrap().size,
            Quantity::from_u64(2)
        );
    }

    #[test]
    fn test_multi_level_sweep() {
        let mut ob = book();
        ob.place_limit_order(Price::from_u64(10_000), order(1, Side::Ask, 2))
            .unwrap();
        ob.place_limit_order(Price::from_u64(10_100), order(2, Side::Ask, 2))
            .unwrap();
        ob.place_limit_order(Price::from_u64(10_200), order(3, Side::Ask, 2))
            .unwrap();

        let matches = ob.place_market_order(order(4, Side::Bid, 5)).unwrap();

        assert_eq!(matches.len(), 3);
        let prices: Vec<Price> = matches.iter().map(|m| m.price).collect();
        assert_eq!(
            prices,
            vec![
                Price::from_u64(10_000),
                Price::from_u64(10_100),
                Price::from_u64(10_200)
            ]
        );
        let sizes: Vec<Quantity> = matches.iter().map(|m| m.size_filled).collect();
        assert_eq!(
            sizes,
            vec![
                Quantity::from_u64(2),
                Quantity::from_u64(2),
                Quantity::from_u64(1)
            ]
        );

        // Levels 10000 and 10100 destroyed; one resting ask remains at
        // 10200 with residual 1.
        let remaining: Vec<Price> = ob.asks_sorted().map(|l| l.price()).collect();
        assert_eq!(remaining, vec![Price::from_u64(10_200)]);
        assert_eq!(ob.ask_total_volume(), Quantity::from_u64(1));
        assert_eq!(
            ob.get_order(OrderId::from_i64(3)).unwrap().size,
            Quantity::from_u64(1)
        );
        assert!(ob.get_order(OrderId::from_i64(1)).is_none());
        assert!(ob.get_order(OrderId::from_i64(2)).is_none());
    }

    #[test]
    fn test_price_time_priority_at_one_level() {
        let mut ob = book();
        // A placed before B at the same price.
        ob.place_limit_order(Price::from_u64(9_000), order(1, Side::Bid, 3))
            .unwrap();
        ob.place_limit_order(Price::from_u64(9_000), order(2, Side::Bid, 3))
            .unwrap();

        let matches = ob.place_market_order(order(3, Side::Ask, 4)).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].maker_order_id, OrderId::from_i64(1));
        assert_eq!(matches[0].size_filled, Quantity::from_u64(3));
        assert_eq!(matches[1].maker_order_id, OrderId::from_i64(2));
        assert_eq!(matches[1].size_filled, Quantity::from_u64(1));

        assert!(ob.get_order(OrderId::from_i64(1)).is_none());
        assert_eq!(
            ob.get_order(OrderId::from_i64(2)).unwrap().size,
            Quantity::from_u64(2)
        );
    }

    #[test]
    fn test_cancel_mid_queue() {
        let mut ob = book();
        ob.place_limit_order(Price::from_u64(9_000), order(1, Side::Bid, 1))
            .unwrap();
        ob.place_limit_order(Price::from_u64(9_000), order(2, Side::Bid, 1))
            .unwrap();
        ob.place_limit_order(Price::from_u64(9_000), order(3, Side::Bid, 1))
            .unwrap();

        ob.cancel_order(OrderId::from_i64(2)).unwrap();

        let matches = ob.place_market_order(order(4, Side::Ask, 2)).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].maker_order_id, OrderId::from_i64(1));
        assert_eq!(matches[1].maker_order_id, OrderId::from_i64(3));
    }

    #[test]
    fn test_insufficient_liquidity_leaves_book_unchanged() {
        let mut ob = book();
        ob.place_limit_order(Price::from_u64(10_000), order(1, Side::Ask, 2))
            .unwrap();
        ob.place_limit_order(Price::from_u64(10_100), order(2, Side::Ask, 3))
            .unwrap();

        let err = ob.place_market_order(order(3, Side::Bid, 6)).unwrap_err();
        assert!(matches!(err, BookError::InsufficientLiquidity { .. }));

        // No mutation: both asks intact, volume still 5.
        assert_eq!(ob.ask_total_volume(), Quantity::from_u64(5));
        assert_eq!(ob.order_count(), 2);
        assert_eq!(
            ob.get_order(OrderId::from_i64(1)).unwrap().size,
            Quantity::from_u64(2)
        );
    }

    #[test]
    fn test_market_order_exactly_sweeps_side() {
        let mut ob = book();
        ob.place_limit_order(Price::from_u64(10_000), order(1, Side::Ask, 2))
            .unwrap();
        ob.place_limit_order(Price::from_u64(10_100), order(2, Side::Ask, 3))
            .unwrap();

        let matches = ob.place_market_order(order(3, Side::Bid, 5)).unwrap();

        let total: Quantity = matches
            .iter()
            .fold(Quantity::zero(), |acc, m| acc + m.size_filled);
        assert_eq!(total, Quantity::from_u64(5));
        assert!(ob.ask_total_volume().is_zero());
        assert_eq!(ob.asks_sorted().count(), 0);
        assert!(ob.best_ask().is_err());
    }

    #[test]
    fn test_cancel_is_noop_on_book_state() {
        let mut ob = book();
        ob.place_limit_order(Price::from_u64(9_000), order(1, Side::Bid, 4))
            .unwrap();
        let removed = ob.cancel_order(OrderId::from_i64(1)).unwrap();

        assert_eq!(removed.id, OrderId::from_i64(1));
        assert_eq!(removed.limit_price, None);
        assert!(ob.bid_total_volume().is_zero());
        assert_eq!(ob.order_count(), 0);
        assert_eq!(ob.bids_sorted().count(), 0);
        assert_eq!(
            ob.cancel_order(OrderId::from_i64(1)).unwrap_err(),
            BookError::OrderNotFound(OrderId::from_i64(1))
        );
    }

    #[test]
    fn test_best_price_accessors() {
        let mut ob = book();
        assert_eq!(ob.best_bid().unwrap_err(), BookError::EmptySide(Side::Bid));
        assert_eq!(ob.best_ask().unwrap_err(), BookError::EmptySide(Side::Ask));

        ob.place_limit_order(Price::from_u64(9_000), order(1, Side::Bid, 1))
            .unwrap();
        ob.place_limit_order(Price::from_u64(9_500), order(2, Side::Bid, 1))
            .unwrap();
        ob.place_limit_order(Price::from_u64(10_000), order(3, Side::Ask, 1))
            .unwrap();
        ob.place_limit_order(Price::from_u64(10_500), order(4, Side::Ask, 1))
            .unwrap();

        assert_eq!(ob.best_bid().unwrap(), Price::from_u64(9_500));
        assert_eq!(ob.best_ask().unwrap(), Price::from_u64(10_000));
    }

    #[test]
    fn test_ask_market_order_walks_bids_descending() {
        let mut ob = book();
        ob.place_limit_order(Price::from_u64(9_000), order(1, Side::Bid, 1))
            .unwrap();
        ob.place_limit_order(Price::from_u64(9_500), order(2, Side::Bid, 1))
            .unwrap();
        ob.place_limit_order(Price::from_u64(9_250), order(3, Side::Bid, 1))
            .unwrap();

        let matches = ob.place_market_order(order(4, Side::Ask, 3)).unwrap();
        let prices: Vec<Price> = matches.iter().map(|m| m.price).collect();
        assert_eq!(
            prices,
            vec![
                Price::from_u64(9_500),
                Price::from_u64(9_250),
                Price::from_u64(9_000)
            ]
        );
    }
}
