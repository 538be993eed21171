use crate::error::ApiError;
use crate::models::{BalanceResponse, BalancesResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::prelude::ToPrimitive;
use types::ids::UserId;

pub async fn get_balance(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let exchange = state.exchange.lock().unwrap();
    let balance = exchange.balance(UserId::from_i64(user_id))?;

    Ok(Json(BalanceResponse {
        balance: balance.to_f64().unwrap_or(0.0),
    }))
}

pub async fn get_balances(
    State(state): State<AppState>,
) -> Result<Json<BalancesResponse>, ApiError> {
    let exchange = state.exchange.lock().unwrap();
    let balances = exchange
        .balances()?
        .into_iter()
        .map(|(id, balance)| (id.as_i64(), balance.to_f64().unwrap_or(0.0)))
        .collect();

    Ok(Json(BalancesResponse { balances }))
}
