//! Bid (buy-side) order book
//!
//! Maintains price levels sorted by price, best bid (highest price) first.
//! The BTreeMap doubles as the price-to-level index; a price maps to at
//! most one level.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::PriceLevel;

/// Bid side of the book. Best-first iteration yields descending prices.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Queue an order at its price, creating the level lazily
    pub fn insert_order(&mut self, price: Price, order: Order) {
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .add(order);
    }

    /// Remove an order from its level, dropping the level if it empties
    pub fn remove(&mut self, order_id: OrderId, price: Price) -> Option<Order> {
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(order_id)?;
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(removed)
    }

    /// Highest resting bid price
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    pub fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Destroy a level. The only removal path besides `remove`.
    pub fn clear_level(&mut self, price: Price) {
        self.levels.remove(&price);
    }

    /// Level prices in best-first (descending) order
    pub fn prices_best_first(&self) -> Vec<Price> {
        self.levels.keys().rev().copied().collect()
    }

    /// Levels in best-first (descending) order
    pub fn levels(&self) -> impl Iterator<Item = &PriceLevel> {
        self.levels.values().rev()
    }

    /// Sum of cached level volumes
    pub fn total_volume(&self) -> Quantity {
        self.levels
            .values()
            .fold(Quantity::zero(), |acc, level| acc + level.total_volume())
    }

    pub fn get_order(&self, order_id: OrderId, price: Price) -> Option<&Order> {
        self.levels.get(&price)?.get(order_id)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::UserId;
    use types::order::Side;

    fn bid(id: i64, size: u64) -> Order {
        Order::new(
            OrderId::from_i64(id),
            UserId::from_i64(7),
            Side::Bid,
            Quantity::from_u64(size),
            id,
        )
    }

    #[test]
    fn test_best_bid_is_highest_price() {
        let mut book = BidBook::new();
        book.insert_order(Price::from_u64(9_000), bid(1, 1));
        book.insert_order(Price::from_u64(9_100), bid(2, 2));
        book.insert_order(Price::from_u64(8_900), bid(3, 3));

        assert_eq!(book.best_price(), Some(Price::from_u64(9_100)));
    }

    #[test]
    fn test_levels_iterate_descending() {
        let mut book = BidBook::new();
        book.insert_order(Price::from_u64(9_000), bid(1, 1));
        book.insert_order(Price::from_u64(9_100), bid(2, 2));
        book.insert_order(Price::from_u64(8_900), bid(3, 3));

        let prices: Vec<Price> = book.levels().map(|l| l.price()).collect();
        assert_eq!(
            prices,
            vec![
                Price::from_u64(9_100),
                Price::from_u64(9_000),
                Price::from_u64(8_900)
            ]
        );
        assert_eq!(book.prices_best_first(), prices);
    }

    #[test]
    fn test_one_level_per_price() {
        let mut book = BidBook::new();
        book.insert_order(Price::from_u64(9_000), bid(1, 1));
        book.insert_order(Price::from_u64(9_000), bid(2, 2));

        assert_eq!(book.level_count(), 1);
        assert_eq!(book.total_volume(), Quantity::from_u64(3));
    }

    #[test]
    fn test_remove_drops_empty_level() {
        let mut book = BidBook::new();
        book.insert_order(Price::from_u64(9_000), bid(1, 1));

        let removed = book.remove(OrderId::from_i64(1), Price::from_u64(9_000));
        assert!(removed.is_some());
        assert!(book.is_empty());
    }

    #[test]
    fn test_remove_keeps_populated_level() {
        let mut book = BidBook::new();
        book.insert_order(Price::from_u64(9_000), bid(1, 1));
        book.insert_order(Price::from_u64(9_000), bid(2, 2));

        book.remove(OrderId::from_i64(1), Price::from_u64(9_000));
        assert_eq!(book.level_count(), 1);
        assert_eq!(book.total_volume(), Quantity::from_u64(2));
    }
}
