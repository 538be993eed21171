//! Transfer settlement
//!
//! The [`Settler`] capability consumes match amounts and moves funds from
//! the selling party to the buying party. [`VaultSettler`] signs a canonical
//! transfer message with the sender's key and applies the move on the
//! custody vault; the receipt hash identifies the transfer.

use ed25519_dalek::Signer;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use std::sync::Mutex;

use crate::errors::SettlementError;
use crate::registry::{Address, User};
use crate::vault::Vault;

/// Proof of an applied transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    /// SHA-256 of the canonical transfer message, hex
    pub tx_hash: String,
    pub from: Address,
    pub to: Address,
    pub amount: i64,
    /// Ed25519 signature over the message hash, hex
    pub signature: String,
}

/// Capability that moves funds once a match is produced.
///
/// Callers treat failures as best-effort: they log and move on, and never
/// roll back the match that triggered the transfer.
pub trait Settler: Send + Sync {
    /// Transfer `amount` units from `from` to `to`.
    fn transfer(
        &self,
        from: &User,
        to: &Address,
        amount: i64,
    ) -> Result<TransferReceipt, SettlementError>;

    /// Current balance held at an address
    fn balance(&self, address: &Address) -> Result<Decimal, SettlementError>;
}

/// Settler backed by the in-process custody vault.
#[derive(Debug, Default)]
pub struct VaultSettler {
    vault: Mutex<Vault>,
}

impl VaultSettler {
    pub fn new(vault: Vault) -> Self {
        Self {
            vault: Mutex::new(vault),
        }
    }

    /// Seed an address with funds at bootstrap
    pub fn credit(&self, address: &Address, amount: Decimal) -> Result<(), SettlementError> {
        self.vault.lock().unwrap().credit(address, amount)
    }
}

impl Settler for VaultSettler {
    fn transfer(
        &self,
        from: &User,
        to: &Address,
        amount: i64,
    ) -> Result<TransferReceipt, SettlementError> {
        if amount < 0 {
            return Err(SettlementError::InvalidAmount);
        }

        // Sign first, then apply, so the receipt is independent of ledger
        // state.
        let message = format!("transfer|{}|{}|{}", from.address, to, amount);
        let hash = Sha256::digest(message.as_bytes());
        let signature = from.signing_key.sign(&hash);

        self.vault
            .lock()
            .unwrap()
            .transfer(&from.address, to, Decimal::from(amount))?;

        let receipt = TransferReceipt {
            tx_hash: hex::encode(hash),
            from: from.address.clone(),
            to: to.clone(),
            amount,
            signature: hex::encode(signature.to_bytes()),
        };

        tracing::info!(
            tx = %receipt.tx_hash,
            from = %receipt.from,
            to = %receipt.to,
            amount,
            "settled transfer"
        );

        Ok(receipt)
    }

    fn balance(&self, address: &Address) -> Result<Decimal, SettlementError> {
        Ok(self.vault.lock().unwrap().balance(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::UserRegistry;
    use ed25519_dalek::Verifier;
    use types::ids::UserId;

    const SEED_A: &str = "829e924fdf021ba3dbbc4225edfece9aca04b929d6e75613329ca6f1d31c0bb4";
    const SEED_B: &str = "a453611d9419d0e56f499079478fd72c37b251a94bfde4d19872c44cf65386e3";

    fn two_users() -> (User, User) {
        let registry = UserRegistry::new();
        let a = registry.add_user(UserId::from_i64(8), SEED_A).unwrap();
        let b = registry.add_user(UserId::from_i64(7), SEED_B).unwrap();
        (a, b)
    }

    #[test]
    fn test_transfer_moves_funds_and_returns_receipt() {
        let (alice, bob) = two_users();
        let settler = VaultSettler::default();
        settler.credit(&alice.address, Decimal::from(100)).unwrap();

        let receipt = settler.transfer(&alice, &bob.address, 30).unwrap();

        assert_eq!(receipt.amount, 30);
        assert_eq!(receipt.from, alice.address);
        assert_eq!(receipt.to, bob.address);
        assert_eq!(settler.balance(&alice.address).unwrap(), Decimal::from(70));
        assert_eq!(settler.balance(&bob.address).unwrap(), Decimal::from(30));
    }

    #[test]
    fn test_receipt_signature_verifies() {
        let (alice, bob) = two_users();
        let settler = VaultSettler::default();
        settler.credit(&alice.address, Decimal::from(100)).unwrap();

        let receipt = settler.transfer(&alice, &bob.address, 10).unwrap();

        let message = format!("transfer|{}|{}|{}", alice.address, bob.address, 10);
        let hash = Sha256::digest(message.as_bytes());
        assert_eq!(receipt.tx_hash, hex::encode(hash));

        let sig_bytes: [u8; 64] = hex::decode(&receipt.signature)
            .unwrap()
            .try_into()
            .unwrap();
        let signature = ed25519_dalek::Signature::from_bytes(&sig_bytes);
        alice
            .signing_key
            .verifying_key()
            .verify(&hash, &signature)
            .unwrap();
    }

    #[test]
    fn test_insufficient_funds_surface_as_error() {
        let (alice, bob) = two_users();
        let settler = VaultSettler::default();
        settler.credit(&alice.address, Decimal::from(5)).unwrap();

        let err = settler.transfer(&alice, &bob.address, 10).unwrap_err();
        assert!(matches!(err, SettlementError::InsufficientFunds { .. }));

        // No mutation on failure.
        assert_eq!(settler.balance(&alice.address).unwrap(), Decimal::from(5));
        assert_eq!(settler.balance(&bob.address).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let (alice, bob) = two_users();
        let settler = VaultSettler::default();
        assert_eq!(
            settler.transfer(&alice, &bob.address, -1).unwrap_err(),
            SettlementError::InvalidAmount
        );
    }
}
