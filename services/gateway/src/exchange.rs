//! Exchange dispatcher
//!
//! Routes orders to the book for their market, keeps the per-user order
//! index and the global order-to-market index, and glues matches to the
//! settlement layer. All book mutations happen through `&mut self`; the
//! HTTP layer serialises access with a mutex and settles only after the
//! lock is released.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use matching_engine::OrderBook;
use settlement::{Settler, UserRegistry};
use types::errors::{BookError, ExchangeError};
use types::ids::{MarketId, OrderId, OrderSequence, UserId};
use types::matches::Match;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};

/// Monotonic arrival stamps in unix nanos.
///
/// Wall-clock time can repeat under coarse timers; placements are already
/// serialised, so bumping past the previous stamp keeps arrival order
/// strict.
#[derive(Debug, Default)]
struct ArrivalClock {
    last: i64,
}

impl ArrivalClock {
    fn next(&mut self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as i64)
            .unwrap_or(0);
        self.last = now.max(self.last + 1);
        self.last
    }
}

/// A placement request after wire validation.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub user_id: UserId,
    pub order_type: OrderType,
    pub side: Side,
    pub size: Quantity,
    /// Required for limit orders, ignored for market orders
    pub price: Option<Price>,
    pub market: MarketId,
}

/// Outcome of a placement: the allocated id, plus any matches produced by a
/// market order.
#[derive(Debug)]
pub struct Placed {
    pub order_id: OrderId,
    pub matches: Vec<Match>,
}

/// Multi-market order router and user-facing state.
pub struct Exchange {
    books: HashMap<MarketId, OrderBook>,
    /// Live resting limit orders per user
    user_orders: HashMap<UserId, Vec<OrderId>>,
    /// Global id-to-market index; makes cancel-by-id correct across markets
    order_markets: HashMap<OrderId, MarketId>,
    users: Arc<UserRegistry>,
    settler: Arc<dyn Settler>,
    sequence: OrderSequence,
    clock: ArrivalClock,
}

impl Exchange {
    pub fn new(users: Arc<UserRegistry>, settler: Arc<dyn Settler>) -> Self {
        Self {
            books: HashMap::new(),
            user_orders: HashMap::new(),
            order_markets: HashMap::new(),
            users,
            settler,
            sequence: OrderSequence::default(),
            clock: ArrivalClock::default(),
        }
    }

    /// Open a book for a market. Idempotent.
    pub fn add_market(&mut self, market: MarketId) {
        self.books
            .entry(market.clone())
            .or_insert_with(|| OrderBook::new(market));
    }

    /// Register a participant from a hex-encoded private key seed.
    pub fn add_user(
        &self,
        user_id: UserId,
        private_key_hex: &str,
    ) -> Result<settlement::User, ExchangeError> {
        self.users
            .add_user(user_id, private_key_hex)
            .map_err(|e| ExchangeError::Settlement(e.to_string()))
    }

    /// Place a limit or market order.
    ///
    /// Validation happens before the order id is allocated, so a rejected
    /// request consumes nothing. Market orders scrub the user index of any
    /// makers they filled before returning.
    pub fn place_order(&mut self, cmd: PlaceOrder) -> Result<Placed, ExchangeError> {
        self.users
            .lookup(cmd.user_id)
            .map_err(|_| ExchangeError::UnknownUser(cmd.user_id.as_i64()))?;
        if !self.books.contains_key(&cmd.market) {
            return Err(ExchangeError::MarketNotFound(cmd.market.to_string()));
        }

        let order_id = self.sequence.next_id();
        let timestamp = self.clock.next();
        let order = Order::new(order_id, cmd.user_id, cmd.side, cmd.size, timestamp);
        let book = self.books.get_mut(&cmd.market).expect("market checked above");

        match cmd.order_type {
            OrderType::Limit => {
                let price = cmd
                    .price
                    .expect("limit placement requires a validated price");
                book.place_limit_order(price, order)?;
                self.user_orders
                    .entry(cmd.user_id)
                    .or_default()
                    .push(order_id);
                self.order_markets.insert(order_id, cmd.market.clone());

                tracing::info!(
                    order_id = order_id.as_i64(),
                    market = %cmd.market,
                    side = %cmd.side,
                    price = %price,
                    size = %cmd.size,
                    "new LIMIT order"
                );

                Ok(Placed {
                    order_id,
                    matches: Vec::new(),
                })
            }
            OrderType::Market => {
                let matches = book.place_market_order(order)?;
                self.scrub_filled_makers(&matches);

                tracing::info!(
                    order_id = order_id.as_i64(),
                    market = %cmd.market,
                    side = %cmd.side,
                    fills = matches.len(),
                    "filled MARKET order"
                );

                Ok(Placed { order_id, matches })
            }
        }
    }

    /// Cancel a resting limit order by id, in whichever market holds it.
    pub fn cancel(&mut self, order_id: OrderId) -> Result<Order, ExchangeError> {
        let market = self
            .order_markets
            .get(&order_id)
            .cloned()
            .ok_or(BookError::OrderNotFound(order_id))?;
        let book = self
            .books
            .get_mut(&market)
            .expect("order indexed to a missing market");

        let removed = book.cancel_order(order_id)?;
        self.order_markets.remove(&order_id);
        if let Some(ids) = self.user_orders.get_mut(&removed.user_id) {
            ids.retain(|id| *id != order_id);
        }

        tracing::info!(order_id = order_id.as_i64(), market = %market, "order canceled");
        Ok(removed)
    }

    /// Drop user-index entries whose orders a matching pass fully filled.
    ///
    /// Runs after every pass so an external enumeration never sees a filled
    /// order.
    fn scrub_filled_makers(&mut self, matches: &[Match]) {
        for m in matches {
            let maker = m.maker_order_id;
            let market = match self.order_markets.get(&maker) {
                Some(market) => market,
                None => continue, // already scrubbed by an earlier match
            };
            let still_live = self
                .books
                .get(market)
                .is_some_and(|book| book.get_order(maker).is_some());
            if still_live {
                continue;
            }
            self.order_markets.remove(&maker);
            if let Some(ids) = self.user_orders.get_mut(&m.maker_user_id) {
                ids.retain(|id| *id != maker);
            }
        }
    }

    /// Forward matches to the settler: the ask side pays the bid side the
    /// filled size, truncated to whole units.
    ///
    /// Best-effort by design: failures are logged and the rest of the batch
    /// still settles. Also logs the volume-weighted average fill price.
    pub fn settle_matches(users: &UserRegistry, settler: &dyn Settler, matches: &[Match]) {
        let mut total_size = Decimal::ZERO;
        let mut total_amount = Decimal::ZERO;

        for m in matches {
            total_size += m.size_filled.as_decimal();
            total_amount += m.price.as_decimal() * m.size_filled.as_decimal();

            let from = match users.lookup(m.ask_user()) {
                Ok(user) => user,
                Err(e) => {
                    tracing::error!(match_id = %m.match_id, error = %e, "settlement skipped");
                    continue;
                }
            };
            let to = match users.lookup(m.bid_user()) {
                Ok(user) => user,
                Err(e) => {
                    tracing::error!(match_id = %m.match_id, error = %e, "settlement skipped");
                    continue;
                }
            };

            let amount = m.size_filled.as_decimal().trunc().to_i64().unwrap_or(0);
            if let Err(e) = settler.transfer(&from, &to.address, amount) {
                tracing::error!(match_id = %m.match_id, error = %e, "settlement failed");
            }
        }

        if !total_size.is_zero() {
            let avg_price = total_amount / total_size;
            tracing::info!(size = %total_size, avg_price = %avg_price, "matches settled");
        }
    }

    /// Handles for settling outside the exchange lock
    pub fn settlement_handles(&self) -> (Arc<UserRegistry>, Arc<dyn Settler>) {
        (self.users.clone(), self.settler.clone())
    }

    /// The book for a market
    pub fn book(&self, market: &MarketId) -> Result<&OrderBook, ExchangeError> {
        self.books
            .get(market)
            .ok_or_else(|| ExchangeError::MarketNotFound(market.to_string()))
    }

    /// A user's live resting limit orders, with their level prices
    pub fn orders_for_user(&self, user_id: UserId) -> Vec<Order> {
        let Some(ids) = self.user_orders.get(&user_id) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| {
                let market = self.order_markets.get(id)?;
                self.books.get(market)?.get_order(*id).cloned()
            })
            .filter(|o| !o.is_filled())
            .collect()
    }

    pub fn best_bid(&self, market: &MarketId) -> Result<Price, ExchangeError> {
        Ok(self.book(market)?.best_bid()?)
    }

    pub fn best_ask(&self, market: &MarketId) -> Result<Price, ExchangeError> {
        Ok(self.book(market)?.best_ask()?)
    }

    /// Settled balance for a user's fund address
    pub fn balance(&self, user_id: UserId) -> Result<Decimal, ExchangeError> {
        let user = self
            .users
            .lookup(user_id)
            .map_err(|_| ExchangeError::UnknownUser(user_id.as_i64()))?;
        self.settler
            .balance(&user.address)
            .map_err(|e| ExchangeError::Settlement(e.to_string()))
    }

    /// Balances of every registered user
    pub fn balances(&self) -> Result<Vec<(UserId, Decimal)>, ExchangeError> {
        let mut out = Vec::new();
        for user in self.users.all() {
            let balance = self
                .settler
                .balance(&user.address)
                .map_err(|e| ExchangeError::Settlement(e.to_string()))?;
            out.push((user.id, balance));
        }
        out.sort_by_key(|(id, _)| *id);
        Ok(out)
    }
}
