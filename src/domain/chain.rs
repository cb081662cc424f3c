//! Chain registry: chain id → network profile lookup
//!
//! Static per build. `resolve` is total: unrecognized chain ids fall back to a
//! generic profile so the UI degrades instead of crashing on an odd network.

use alloy_primitives::{address, Address};

/// What the client knows about a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainProfile {
    pub chain_id: u64,
    pub name: &'static str,
    pub native_symbol: &'static str,
    /// Credit gate contract; `Address::ZERO` where the protocol is not deployed.
    pub gate: Address,
}

impl ChainProfile {
    pub fn has_gate(&self) -> bool {
        !self.gate.is_zero()
    }
}

const PROFILES: &[ChainProfile] = &[
    ChainProfile {
        chain_id: 1,
        name: "Ethereum",
        native_symbol: "ETH",
        gate: Address::ZERO,
    },
    ChainProfile {
        chain_id: 11155111,
        name: "Sepolia",
        native_symbol: "ETH",
        gate: address!("7b3e2a9c41c2d8f05f14c3a9b14638d0e2a55c21"),
    },
    ChainProfile {
        chain_id: 43114,
        name: "Avalanche",
        native_symbol: "AVAX",
        gate: Address::ZERO,
    },
    ChainProfile {
        chain_id: 43113,
        name: "Avalanche Fuji",
        native_symbol: "AVAX",
        gate: address!("c94ad3ed3e623a8a8d066c0ae2803dca34e0ba39"),
    },
    ChainProfile {
        chain_id: 31337,
        name: "Anvil",
        native_symbol: "ETH",
        gate: address!("5fbdb2315678afecb367f032d93f642f64180aa3"),
    },
];

const FALLBACK: ChainProfile = ChainProfile {
    chain_id: 0,
    name: "unknown network",
    native_symbol: "ETH",
    gate: Address::ZERO,
};

/// Look up the profile for a chain id.
pub fn resolve(chain_id: u64) -> &'static ChainProfile {
    PROFILES
        .iter()
        .find(|profile| profile.chain_id == chain_id)
        .unwrap_or(&FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_chains() {
        assert_eq!(resolve(43113).name, "Avalanche Fuji");
        assert_eq!(resolve(43113).native_symbol, "AVAX");
        assert!(resolve(43113).has_gate());
        assert_eq!(resolve(11155111).native_symbol, "ETH");
        assert!(resolve(31337).has_gate());
    }

    #[test]
    fn unknown_chain_degrades_to_fallback() {
        let profile = resolve(987654);
        assert_eq!(profile.name, "unknown network");
        assert_eq!(profile.native_symbol, "ETH");
        assert!(!profile.has_gate());
    }

    #[test]
    fn mainnet_has_no_gate_yet() {
        assert!(!resolve(1).has_gate());
    }
}
