//! Wallet session state, owned by the connection worker and read-only here

use alloy_primitives::Address;

/// Snapshot of the wallet connection. Can change at any time (endpoint switch,
/// disconnect); consumers re-resolve chain-derived data on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
    pub connected: bool,
}

impl Session {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(address: Address, chain_id: u64) -> Self {
        Self {
            address: Some(address),
            chain_id: Some(chain_id),
            connected: true,
        }
    }
}
