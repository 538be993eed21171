//! Price level implementation with FIFO queue
//!
//! A price level holds every resting order at one price on one side.
//! Orders are kept in arrival order to enforce time priority; the cached
//! `total_volume` always equals the sum of the residual sizes in the queue.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::matches::Match;
use types::numeric::{Price, Quantity};
use types::order::Order;

/// All resting orders at a single price, FIFO in arrival order.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    orders: VecDeque<Order>,
    total_volume: Quantity,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_volume: Quantity::zero(),
        }
    }

    /// Append an order at the back of the queue (time priority).
    ///
    /// The order must not be resting elsewhere and must have a positive
    /// residual.
    pub fn add(&mut self, mut order: Order) {
        debug_assert!(order.limit_price.is_none(), "order already resting");
        debug_assert!(!order.size.is_zero(), "resting order must have size");

        order.limit_price = Some(self.price);
        self.total_volume = self.total_volume + order.size;
        self.orders.push_back(order);
    }

    /// Remove an order by id, preserving the relative order of the rest.
    ///
    /// Returns the removed order with its level key cleared, or None if the
    /// id is not queued here.
    pub fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|o| o.id == order_id)?;
        let mut order = self.orders.remove(position)?;

        self.total_volume = self.total_volume.saturating_sub(order.size);
        order.limit_price = None;

        Some(order)
    }

    /// Consume resting orders head-first against `incoming` until it is
    /// filled or this level is exhausted.
    ///
    /// Each fill decrements both residuals and the cached volume and emits
    /// one match at this level's price. Fully filled makers are dropped
    /// afterwards; if the level is non-empty on return its head is the
    /// oldest unfilled order.
    pub fn fill(&mut self, incoming: &mut Order) -> Vec<Match> {
        let mut matches = Vec::new();

        for resting in self.orders.iter_mut() {
            let filled = resting.size.min(incoming.size);
            resting.fill(filled);
            incoming.fill(filled);
            self.total_volume = self.total_volume.saturating_sub(filled);

            matches.push(Match::new(
                resting.id,
                incoming.id,
                resting.user_id,
                incoming.user_id,
                incoming.side,
                self.price,
                filled,
            ));

            if incoming.is_filled() {
                break;
            }
        }

        // Filled makers form a prefix of the queue.
        while self.orders.front().is_some_and(|o| o.is_filled()) {
            self.orders.pop_front();
        }

        matches
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn total_volume(&self) -> Quantity {
        self.total_volume
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Queued orders in arrival order
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.orders.iter().any(|o| o.id == order_id)
    }

    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }
}
