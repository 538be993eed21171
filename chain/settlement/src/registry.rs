//! User registry
//!
//! Maps participant ids to their signing keys and fund addresses. Keys are
//! Ed25519, parsed from hex-encoded 32-byte seeds; the fund address is
//! derived from the SHA-256 digest of the verifying key (first 20 bytes,
//! 0x-prefixed hex), so the same seed always yields the same address.

use dashmap::DashMap;
use ed25519_dalek::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use types::ids::UserId;

use crate::errors::SettlementError;

/// Fund address, 0x-prefixed hex
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Derive the address for a verifying key
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let digest = Sha256::digest(key.to_bytes());
        Self(format!("0x{}", hex::encode(&digest[..20])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered participant: identity, signing key, fund address.
#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub signing_key: SigningKey,
    pub address: Address,
}

impl User {
    fn from_seed_hex(id: UserId, private_key_hex: &str) -> Result<Self, SettlementError> {
        let bytes = hex::decode(private_key_hex).map_err(|_| SettlementError::InvalidKey)?;
        let seed: [u8; 32] = bytes.try_into().map_err(|_| SettlementError::InvalidKey)?;
        let signing_key = SigningKey::from_bytes(&seed);
        let address = Address::from_verifying_key(&signing_key.verifying_key());

        Ok(Self {
            id,
            signing_key,
            address,
        })
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("User")
            .field("id", &self.id)
            .field("address", &self.address)
            .finish()
    }
}

/// Registry of all known participants.
///
/// Read-mostly and shared across handlers without the exchange lock.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: DashMap<UserId, User>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Register a user from a hex-encoded private key seed.
    ///
    /// Fails if the id is already known or the key does not parse.
    pub fn add_user(&self, id: UserId, private_key_hex: &str) -> Result<User, SettlementError> {
        if self.users.contains_key(&id) {
            return Err(SettlementError::DuplicateUser(id.as_i64()));
        }
        let user = User::from_seed_hex(id, private_key_hex)?;
        self.users.insert(id, user.clone());
        Ok(user)
    }

    pub fn lookup(&self, id: UserId) -> Result<User, SettlementError> {
        self.users
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(SettlementError::UserNotFound(id.as_i64()))
    }

    /// Snapshot of all registered users
    pub fn all(&self) -> Vec<User> {
        self.users.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
