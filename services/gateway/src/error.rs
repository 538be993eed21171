//! HTTP error mapping
//!
//! Validation failures are 400s; defensive precondition failures (empty
//! side, insufficient market liquidity) are 500s. Bodies are `{"msg": ...}`
//! envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use types::errors::{BookError, ExchangeError};

/// Central error type for the gateway
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),

    #[error("internal server error")]
    Unexpected(#[from] anyhow::Error),
}

impl From<ExchangeError> for ApiError {
    fn from(err: ExchangeError) -> Self {
        match &err {
            ExchangeError::MarketNotFound(_) => ApiError::BadRequest("market not found".into()),
            ExchangeError::UnknownUser(_) => ApiError::BadRequest(err.to_string()),
            ExchangeError::Settlement(msg) => ApiError::Internal(msg.clone()),
            ExchangeError::Book(book) => match book {
                BookError::OrderNotFound(_) | BookError::DuplicateOrder(_) => {
                    ApiError::BadRequest(err.to_string())
                }
                BookError::EmptySide(_) | BookError::InsufficientLiquidity { .. } => {
                    ApiError::Internal(err.to_string())
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Unexpected(err) => {
                tracing::error!(error = %err, "unexpected failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "msg": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::OrderId;
    use types::order::Side;

    #[test]
    fn test_validation_errors_map_to_400() {
        let market: ApiError = ExchangeError::MarketNotFound("BTC".into()).into();
        assert!(matches!(market, ApiError::BadRequest(ref m) if m == "market not found"));

        let order: ApiError =
            ExchangeError::Book(BookError::OrderNotFound(OrderId::from_i64(1))).into();
        assert!(matches!(order, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_precondition_errors_map_to_500() {
        let empty: ApiError = ExchangeError::Book(BookError::EmptySide(Side::Ask)).into();
        assert!(matches!(empty, ApiError::Internal(ref m) if m == "asks are empty"));

        let liquidity: ApiError = ExchangeError::Book(BookError::InsufficientLiquidity {
            available: "5".into(),
            requested: "6".into(),
        })
        .into();
        assert!(matches!(liquidity, ApiError::Internal(_)));
    }
}
