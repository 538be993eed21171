//! Settlement error taxonomy

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettlementError {
    #[error("user already exists: {0}")]
    DuplicateUser(i64),

    #[error("user not found: {0}")]
    UserNotFound(i64),

    #[error("invalid private key")]
    InvalidKey,

    #[error("transfer amount must not be negative")]
    InvalidAmount,

    #[error("insufficient funds at {address}: have {available}, need {required}")]
    InsufficientFunds {
        address: String,
        available: String,
        required: String,
    },
}
