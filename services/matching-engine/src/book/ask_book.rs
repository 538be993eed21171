//! Ask (sell-side) order book
//!
//! Maintains price levels sorted by price, best ask (lowest price) first.
//! The BTreeMap doubles as the price-to-level index; a price maps to at
//! most one level.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::PriceLevel;

/// Ask side of the book. Best-first iteration yields ascending prices.
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
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

    /// Lowest resting ask price
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    pub fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Destroy a level. The only removal path besides `remove`.
    pub fn clear_level(&mut self, price: Price) {
        self.levels.remove(&price);
    }

    /// Level prices in best-first (ascending) order
    pub fn prices_best_first(&self) -> Vec<Price> {
        self.levels.keys().copied().collect()
    }

    /// Levels in best-first (ascending) order
    pub fn levels(&self) -> impl Iterator<Item = &PriceLevel> {
        self.levels.values()
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
