use crate::error::ApiError;
use crate::models::{OrderBookData, OrderView, PriceResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use types::ids::MarketId;

pub async fn get_book(
    State(state): State<AppState>,
    Path(market): Path<String>,
) -> Result<Json<OrderBookData>, ApiError> {
    let exchange = state.exchange.lock().unwrap();
    let book = exchange.book(&MarketId::new(market))?;

    // Levels come out best-first; orders within a level in arrival order.
    let asks = book
        .asks_sorted()
        .flat_map(|level| level.orders())
        .map(OrderView::from_resting)
        .collect();
    let bids = book
        .bids_sorted()
        .flat_map(|level| level.orders())
        .map(OrderView::from_resting)
        .collect();

    Ok(Json(OrderBookData {
        total_bid_volume: book.bid_total_volume().to_f64(),
        total_ask_volume: book.ask_total_volume().to_f64(),
        asks,
        bids,
    }))
}

pub async fn get_best_bid(
    State(state): State<AppState>,
    Path(market): Path<String>,
) -> Result<Json<PriceResponse>, ApiError> {
    let exchange = state.exchange.lock().unwrap();
    let price = exchange.best_bid(&MarketId::new(market))?;

    Ok(Json(PriceResponse {
        price: price.to_f64(),
    }))
}

pub async fn get_best_ask(
    State(state): State<AppState>,
    Path(market): Path<String>,
) -> Result<Json<PriceResponse>, ApiError> {
    let exchange = state.exchange.lock().unwrap();
    let price = exchange.best_ask(&MarketId::new(market))?;

    Ok(Json(PriceResponse {
        price: price.to_f64(),
    }))
}
