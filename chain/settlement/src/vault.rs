//! Custody vault
//!
//! Single-asset balance ledger keyed by fund address. A transfer debits the
//! sender and credits the receiver atomically; it fails without mutation on
//! insufficient funds.

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::errors::SettlementError;
use crate::registry::Address;

/// In-process asset ledger.
#[derive(Debug, Default)]
pub struct Vault {
    balances: HashMap<Address, Decimal>,
}

impl Vault {
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Credit an address, creating its entry on first use.
    pub fn credit(&mut self, address: &Address, amount: Decimal) -> Result<(), SettlementError> {
        if amount < Decimal::ZERO {
            return Err(SettlementError::InvalidAmount);
        }
        *self.balances.entry(address.clone()).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    /// Move funds between two addresses.
    ///
    /// Zero-amount transfers are accepted as no-ops; negative amounts and
    /// overdrafts are rejected without mutation.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Decimal,
    ) -> Result<(), SettlementError> {
        if amount < Decimal::ZERO {
            return Err(SettlementError::InvalidAmount);
        }

        let available = self.balance(from);
        if available < amount {
            return Err(SettlementError::InsufficientFunds {
                address: from.to_string(),
                available: available.to_string(),
                required: amount.to_string(),
            });
        }

        *self.balances.entry(from.clone()).or_insert(Decimal::ZERO) -= amount;
        *self.balances.entry(to.clone()).or_insert(Decimal::ZERO) += amount;

        Ok(())
    }

    /// Current balance; unknown addresses hold zero.
    pub fn balance(&self, address: &Address) -> Decimal {
        self.balances.get(address).copied().unwrap_or(Decimal::ZERO)
    }
}
