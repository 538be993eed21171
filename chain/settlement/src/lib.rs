//! Settlement layer
//!
//! Everything downstream of a match: the user registry mapping participant
//! ids to signing keys and fund addresses, the custody vault holding
//! balances, and the [`settler::Settler`] capability that consumes match
//! amounts and moves funds between counterparties.
//!
//! Settlement is best-effort by design. The matching core is authoritative;
//! a failed transfer is logged by the caller and never rolls back a match.

pub mod errors;
pub mod registry;
pub mod settler;
pub mod vault;

pub use errors::SettlementError;
pub use registry::{Address, User, UserRegistry};
pub use settler::{Settler, TransferReceipt, VaultSettler};
pub use vault::Vault;
