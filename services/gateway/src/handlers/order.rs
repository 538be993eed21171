use crate::error::ApiError;
use crate::exchange::{Exchange, PlaceOrder};
use crate::models::{MessageResponse, OrderView, PlaceOrderRequest, PlaceOrderResponse};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use types::ids::{MarketId, OrderId, UserId};
use types::numeric::{Price, Quantity};
use types::order::{OrderType, Side};

pub async fn place_order(
    State(state): State<AppState>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<Json<PlaceOrderResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let order_type = OrderType::parse(&req.order_type)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid order type: {}", req.order_type)))?;
    let size = Quantity::from_f64(req.size)
        .filter(|s| !s.is_zero())
        .ok_or_else(|| ApiError::BadRequest("invalid size".into()))?;
    let price = match order_type {
        OrderType::Limit => Some(
            Price::from_f64(req.price).ok_or_else(|| ApiError::BadRequest("invalid price".into()))?,
        ),
        OrderType::Market => None,
    };

    let cmd = PlaceOrder {
        user_id: UserId::from_i64(req.user_id),
        order_type,
        side: Side::from_is_bid(req.bid),
        size,
        price,
        market: MarketId::new(req.market),
    };

    // Mutate the book under the lock; settle after it is released.
    let (placed, users, settler) = {
        let mut exchange = state.exchange.lock().unwrap();
        let placed = exchange.place_order(cmd)?;
        let (users, settler) = exchange.settlement_handles();
        (placed, users, settler)
    };

    if !placed.matches.is_empty() {
        Exchange::settle_matches(&users, &*settler, &placed.matches);
    }

    Ok(Json(PlaceOrderResponse {
        order_id: placed.order_id.as_i64(),
    }))
}

pub async fn get_user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<OrderView>>, ApiError> {
    let exchange = state.exchange.lock().unwrap();
    let orders = exchange.orders_for_user(UserId::from_i64(user_id));

    Ok(Json(orders.iter().map(OrderView::from_resting).collect()))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut exchange = state.exchange.lock().unwrap();
    exchange.cancel(OrderId::from_i64(order_id))?;

    Ok(Json(MessageResponse {
        msg: "order deleted".into(),
    }))
}
