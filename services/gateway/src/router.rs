use crate::handlers::{balance, book, order};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/order", post(order::place_order))
        .route(
            "/order/:id",
            get(order::get_user_orders).delete(order::cancel_order),
        )
        .route("/book/:market", get(book::get_book))
        .route("/book/:market/bid", get(book::get_best_bid))
        .route("/book/:market/ask", get(book::get_best_ask))
        .route("/balance/:user_id", get(balance::get_balance))
        .route("/balances", get(balance::get_balances))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
